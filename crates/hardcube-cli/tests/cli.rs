//! End-to-end checks of the `hardcube-cli` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const REF_DIR: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../hardcube-sim/tests/fixtures/reference"
);

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    p.push(format!("hardcube_cli_{name}_{nanos}"));
    fs::create_dir_all(&p).unwrap();
    p
}

fn cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hardcube-cli"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn read(p: &Path) -> String {
    fs::read_to_string(p).unwrap()
}

fn reference(name: &str) -> String {
    read(&Path::new(REF_DIR).join(name))
}

#[test]
fn reference_flag_reproduces_fixture_files() {
    let dir = tmp_dir("reference");
    let out = cli(&["generate", "--reference", "--out-dir", dir.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    for name in [
        "synth-hardcube.txt",
        "synth-hardcube-data.txt",
        "synth-hardcube-time.txt",
    ] {
        assert_eq!(read(&dir.join(name)), reference(name), "{name} differs");
    }

    let manifest: serde_json::Value =
        serde_json::from_str(&read(&dir.join("synth-hardcube-run.json"))).unwrap();
    assert_eq!(manifest["config"]["seed"], 45);
    assert_eq!(manifest["config"]["generator"], "drand48");
    assert_eq!(manifest["config"]["stop"], "absorbed");
    assert_eq!(manifest["summary"]["trajectories"], 1000);
    assert_eq!(manifest["edge_rates"].as_array().unwrap().len(), 12);
    assert_eq!(manifest["rates_source"], "drawn");
    assert_eq!(manifest["records_written"], 1000);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn runs_are_deterministic_per_seed() {
    let a = tmp_dir("det_a");
    let b = tmp_dir("det_b");
    for d in [&a, &b] {
        let out = cli(&[
            "generate",
            "--seed",
            "9",
            "--trajectories",
            "40",
            "--no-manifest",
            "--out-dir",
            d.to_str().unwrap(),
        ]);
        assert!(out.status.success());
    }
    for name in [
        "synth-hardcube.txt",
        "synth-hardcube-data.txt",
        "synth-hardcube-time.txt",
    ] {
        assert_eq!(read(&a.join(name)), read(&b.join(name)));
    }
    assert!(!a.join("synth-hardcube-run.json").exists());
    assert_eq!(read(&a.join("synth-hardcube-data.txt")).lines().count(), 80);
    assert_eq!(read(&a.join("synth-hardcube-time.txt")).lines().count(), 40);

    let _ = fs::remove_dir_all(a);
    let _ = fs::remove_dir_all(b);
}

#[test]
fn profile_sets_count_and_file_names_and_flags_win() {
    let dir = tmp_dir("profile");
    let profile = dir.join("run.toml");
    fs::write(
        &profile,
        format!(
            "[simulation]\ntrajectories = 3\nseed = 1\ngenerator = \"drand48\"\n\n\
             [output]\ndir = \"{}\"\ndata = \"pairs.txt\"\n",
            dir.display()
        ),
    )
    .unwrap();

    let out = cli(&[
        "generate",
        "--config",
        profile.to_str().unwrap(),
        "--trajectories",
        "5",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(&dir.join("pairs.txt")).lines().count(), 10);
    assert_eq!(read(&dir.join("synth-hardcube-time.txt")).lines().count(), 5);

    let manifest: serde_json::Value =
        serde_json::from_str(&read(&dir.join("synth-hardcube-run.json"))).unwrap();
    assert_eq!(manifest["config"]["seed"], 1);
    assert_eq!(manifest["config"]["trajectories"], 5);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn rates_subcommand_writes_where_the_profile_says() {
    let dir = tmp_dir("rates_profile");
    let sub = dir.join("sub");
    let profile = dir.join("run.toml");
    fs::write(
        &profile,
        format!(
            "[simulation]\nseed = 3\n\n[output]\ndir = \"{}\"\nrates = \"truth.txt\"\n",
            sub.display()
        ),
    )
    .unwrap();

    let out = cli(&["rates", "--config", profile.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let written = read(&sub.join("truth.txt"));
    assert_eq!(written.lines().count(), 64);

    // Same seed through `generate` draws the same rates first.
    let gen_dir = tmp_dir("rates_profile_gen");
    let out = cli(&[
        "generate",
        "--seed",
        "3",
        "--trajectories",
        "1",
        "--no-manifest",
        "--out-dir",
        gen_dir.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    assert_eq!(written, read(&gen_dir.join("synth-hardcube.txt")));

    // An explicit --out still wins over the profile.
    let explicit = dir.join("explicit.txt");
    let out = cli(&[
        "rates",
        "--config",
        profile.to_str().unwrap(),
        "--out",
        explicit.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    assert_eq!(read(&explicit), written);

    let _ = fs::remove_dir_all(dir);
    let _ = fs::remove_dir_all(gen_dir);
}

#[test]
fn unknown_profile_keys_are_rejected() {
    let dir = tmp_dir("badprofile");
    let profile = dir.join("run.toml");
    fs::write(&profile, "[simulation]\nseeed = 3\n").unwrap();
    let out = cli(&["generate", "--config", profile.to_str().unwrap()]);
    assert!(!out.status.success());
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn rates_subcommand_matches_reference_listing() {
    let dir = tmp_dir("rates");
    let path = dir.join("rates.txt");
    let out = cli(&["rates", "--reference", "--out", path.to_str().unwrap()]);
    assert!(out.status.success());
    assert_eq!(read(&path), reference("synth-hardcube.txt"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn ground_truth_rates_are_reused_verbatim() {
    let dir = tmp_dir("reuse");
    let rates = Path::new(REF_DIR).join("synth-hardcube.txt");
    let out = cli(&[
        "generate",
        "--rates",
        rates.to_str().unwrap(),
        "--trajectories",
        "10",
        "--out-dir",
        dir.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read(&dir.join("synth-hardcube.txt")), reference("synth-hardcube.txt"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn malformed_rate_listing_fails_the_run() {
    let dir = tmp_dir("badrates");
    let rates = dir.join("bad.txt");
    fs::write(&rates, "0 1 0.5\n0 3 0.2\n").unwrap();
    let out = cli(&[
        "generate",
        "--rates",
        rates.to_str().unwrap(),
        "--out-dir",
        dir.to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(!dir.join("synth-hardcube-data.txt").exists());
    let _ = fs::remove_dir_all(dir);
}
