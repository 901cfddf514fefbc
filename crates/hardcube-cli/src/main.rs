// crates/hardcube-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hardcube_core::{
    io::{read_rate_listing_file, write_json_pretty, write_rate_listing_file, ObservationWriter},
    EdgeRate, GeneratorKind, RandomStream, RateOrder, RatedGraph,
};
use hardcube_sim::{ConfigOverlay, Run, RunSummary, SimulationConfig, StopRule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "hardcube-cli",
    about = "Synthetic CTMC data on the 3-cube",
    long_about = "Synthetic CTMC data on the 3-cube.\n\nDraws edge rates for the 000 -> 111 hypercube, simulates continuous-time trajectories, and writes censored two-point observations plus the ground-truth rates.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Draw rates, simulate trajectories, write the rate listing, state pairs and elapsed times.
    Generate {
        #[command(flatten)]
        sim: SimArgs,

        /// Reuse a ground-truth rate listing instead of drawing rates.
        #[arg(long)]
        rates: Option<PathBuf>,

        /// Output directory (overrides the profile).
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Skip the JSON run manifest.
        #[arg(long, default_value_t = false)]
        no_manifest: bool,
    },

    /// Only draw the edge rates and write the rate listing.
    Rates {
        #[command(flatten)]
        sim: SimArgs,

        /// Output path for the rate listing (defaults to the profile's `[output]` rates file).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Flags shared by every subcommand that seeds a stream.
#[derive(Args, Debug)]
struct SimArgs {
    /// TOML profile with `[simulation]` and `[output]` tables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from the drand48 reference settings (drand48, absorbed, target order).
    #[arg(long, default_value_t = false)]
    reference: bool,

    /// Seed of the shared stream.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of trajectories (>0).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    trajectories: Option<u32>,

    /// Upper bound of the first observation time.
    #[arg(long)]
    t1_span: Option<f64>,

    /// Upper bound of the gap between the two observation times.
    #[arg(long)]
    gap_span: Option<f64>,

    /// Pseudo-random generator.
    #[arg(long, value_enum)]
    generator: Option<GeneratorOpt>,

    /// When a trajectory stops drawing.
    #[arg(long, value_enum)]
    stop: Option<StopOpt>,

    /// Order of the twelve rate draws.
    #[arg(long, value_enum)]
    rate_order: Option<RateOrderOpt>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum GeneratorOpt {
    /// rand's StdRng
    Std,
    /// POSIX drand48
    Drand48,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum StopOpt {
    Resolved,
    Absorbed,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum RateOrderOpt {
    Popcount,
    Target,
}

impl SimArgs {
    fn overlay(&self) -> ConfigOverlay {
        ConfigOverlay {
            seed: self.seed,
            trajectories: self.trajectories,
            t1_span: self.t1_span,
            gap_span: self.gap_span,
            generator: self.generator.map(|g| match g {
                GeneratorOpt::Std => GeneratorKind::Std,
                GeneratorOpt::Drand48 => GeneratorKind::Drand48,
            }),
            stop: self.stop.map(|s| match s {
                StopOpt::Resolved => StopRule::Resolved,
                StopOpt::Absorbed => StopRule::Absorbed,
            }),
            rate_order: self.rate_order.map(|o| match o {
                RateOrderOpt::Popcount => RateOrder::Popcount,
                RateOrderOpt::Target => RateOrder::Target,
            }),
        }
    }

    /// Defaults (or the reference bundle), then the profile, then flags.
    fn resolve(&self) -> Result<(SimulationConfig, OutputProfile)> {
        let profile = match &self.config {
            Some(path) => read_profile(path)?,
            None => Profile::default(),
        };
        let base = if self.reference {
            SimulationConfig::reference()
        } else {
            SimulationConfig::default()
        };
        let config = base.with(&profile.simulation).with(&self.overlay());
        config.validate().context("invalid configuration")?;
        Ok((config, profile.output))
    }
}

/// On-disk profile. Both tables optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Profile {
    simulation: ConfigOverlay,
    output: OutputProfile,
}

/// Where the artifacts go.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
struct OutputProfile {
    dir: PathBuf,
    rates: PathBuf,
    data: PathBuf,
    time: PathBuf,
    manifest: PathBuf,
}

impl Default for OutputProfile {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            rates: PathBuf::from("synth-hardcube.txt"),
            data: PathBuf::from("synth-hardcube-data.txt"),
            time: PathBuf::from("synth-hardcube-time.txt"),
            manifest: PathBuf::from("synth-hardcube-run.json"),
        }
    }
}

impl OutputProfile {
    fn path(&self, name: &Path) -> PathBuf {
        self.dir.join(name)
    }
}

/// JSON record of what a run did and with which settings.
#[derive(Debug, Serialize)]
struct RunManifest<'a> {
    tool: &'static str,
    version: &'static str,
    config: &'a SimulationConfig,
    rates_source: String,
    edge_rates: Vec<EdgeRate>,
    files: &'a OutputProfile,
    records_written: u64,
    summary: RunSummary,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Generate {
            sim,
            rates,
            out_dir,
            no_manifest,
        } => generate(&sim, rates.as_deref(), out_dir, no_manifest),

        Cmd::Rates { sim, out } => rates_only(&sim, out),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn read_profile(path: &Path) -> Result<Profile> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("read profile {}", path.display()))?;
    toml::from_str(&src).with_context(|| format!("parse profile {}", path.display()))
}

fn generate(
    sim: &SimArgs,
    rates_path: Option<&Path>,
    out_dir: Option<PathBuf>,
    no_manifest: bool,
) -> Result<()> {
    let (config, mut output) = sim.resolve()?;
    if let Some(dir) = out_dir {
        output.dir = dir;
    }

    let mut run = Run::new(config)?;
    let (graph, rates_source) = match rates_path {
        Some(p) => {
            let g = read_rate_listing_file(p)
                .with_context(|| format!("loading ground-truth rates from {}", p.display()))?;
            info!(path = %p.display(), "rates loaded");
            (g, p.display().to_string())
        }
        None => (run.assign_rates(), String::from("drawn")),
    };

    let rates_out = output.path(&output.rates);
    write_rate_listing_file(&rates_out, &graph)
        .with_context(|| format!("writing rate listing to {}", rates_out.display()))?;
    info!(path = %rates_out.display(), "rate listing written");

    let data_out = output.path(&output.data);
    let time_out = output.path(&output.time);
    let mut writer = ObservationWriter::create(&data_out, &time_out)?;
    let summary = run.record(&graph, &mut writer)?;
    let records_written = writer.written();
    writer.finish()?;
    info!(data = %data_out.display(), time = %time_out.display(), "observations written");

    if !no_manifest {
        let manifest_out = output.path(&output.manifest);
        let manifest = RunManifest {
            tool: "hardcube-cli",
            version: env!("CARGO_PKG_VERSION"),
            config: run.config(),
            rates_source,
            edge_rates: graph.edge_rates(),
            files: &output,
            records_written,
            summary,
        };
        write_json_pretty(&manifest_out, &manifest)
            .with_context(|| format!("writing manifest to {}", manifest_out.display()))?;
    }

    println!(
        "Generated {} trajectories (seed={}, {}) → {}, {}, {}",
        summary.trajectories,
        config.seed,
        config.generator.as_str(),
        rates_out.display(),
        data_out.display(),
        time_out.display()
    );
    Ok(())
}

fn rates_only(sim: &SimArgs, out: Option<PathBuf>) -> Result<()> {
    let (config, output) = sim.resolve()?;
    let out = out.unwrap_or_else(|| output.path(&output.rates));
    let mut rng = RandomStream::seeded(config.generator, config.seed);
    let graph = RatedGraph::assign(&mut rng, config.rate_order);

    info!(seed = config.seed, out = %out.display(), "drawing rates");
    write_rate_listing_file(&out, &graph)
        .with_context(|| format!("writing rate listing to {}", out.display()))?;

    println!("Wrote 12 edge rates (seed={}) → {}", config.seed, out.display());
    Ok(())
}
