//! Plain-text artifacts of a run, plus a small JSON helper.
//!
//! Three newline-delimited text files make up a data set:
//! - the **rate listing**: `"<i> <j> <rate>"` for all 64 ordered pairs,
//!   row-major, non-edges as `0.000000`;
//! - the **state pairs**: two `"<b2> <b1> <b0>"` lines per trajectory;
//! - the **elapsed times**: one `t2 - t1` line per trajectory.
//!
//! Floats are written with six decimals. Writers never buffer more than a
//! `BufWriter` does, so records land on disk in the order they complete.

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::graph::{Hypercube, NodeId, NODE_COUNT};
use crate::observation::CensoredObservation;
use crate::rates::RatedGraph;

/// Ensure the parent directory for a file exists (no-op if none).
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", display(path)))?;
        }
    }
    Ok(())
}

/// Create `path` (and its parent directory) behind a `BufWriter`.
pub fn create_buffered(path: &Path) -> Result<BufWriter<File>> {
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", display(path)))?;
    Ok(BufWriter::new(f))
}

/* ---------------- Rate listing ---------------- */

/// Write the 8x8 rate listing.
pub fn write_rate_listing<W: Write>(mut w: W, graph: &RatedGraph) -> Result<()> {
    let m = graph.to_matrix();
    for (i, row) in m.iter().enumerate() {
        for (j, rate) in row.iter().enumerate() {
            writeln!(w, "{i} {j} {rate:.6}").context("write rate line")?;
        }
    }
    w.flush().context("flush rate listing")?;
    Ok(())
}

/// Write the rate listing to `path`.
pub fn write_rate_listing_file<P: AsRef<Path>>(path: P, graph: &RatedGraph) -> Result<()> {
    let path_ref = path.as_ref();
    let w = create_buffered(path_ref)?;
    write_rate_listing(w, graph).with_context(|| format!("writing {}", display(path_ref)))
}

/// Parse a rate listing back into a validated [`RatedGraph`].
///
/// Pairs that do not appear default to 0, but all 12 edges must be listed
/// with positive rates and no pair may appear twice. Blank lines are skipped.
pub fn read_rate_listing<R: BufRead>(r: R) -> Result<RatedGraph> {
    let mut m = [[0.0f64; NODE_COUNT]; NODE_COUNT];
    let mut seen = [[false; NODE_COUNT]; NODE_COUNT];

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [i, j, rate] = fields.as_slice() else {
            bail!(
                "line {line_no}: expected `<i> <j> <rate>`, got {} fields",
                fields.len()
            );
        };
        let from = parse_node(i).with_context(|| format!("line {line_no}: source node"))?;
        let to = parse_node(j).with_context(|| format!("line {line_no}: target node"))?;
        let rate: f64 = rate
            .parse()
            .with_context(|| format!("line {line_no}: rate {rate:?}"))?;

        let (a, b) = (from.index(), to.index());
        if seen[a][b] {
            bail!("line {line_no}: pair {a} {b} listed twice");
        }
        seen[a][b] = true;
        m[a][b] = rate;
    }

    for e in Hypercube.edges() {
        if !seen[e.from.index()][e.to.index()] {
            bail!("edge {e} missing from rate listing");
        }
    }
    RatedGraph::from_matrix(&m)
}

/// Read a rate listing from `path`.
pub fn read_rate_listing_file<P: AsRef<Path>>(path: P) -> Result<RatedGraph> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
    read_rate_listing(BufReader::new(f))
        .with_context(|| format!("parsing rate listing {}", display(path_ref)))
}

fn parse_node(s: &str) -> Result<NodeId> {
    let v: u8 = s.parse().with_context(|| format!("not a node index: {s:?}"))?;
    NodeId::new(v).ok_or_else(|| anyhow!("node index {v} out of range 0..{NODE_COUNT}"))
}

/* ---------------- Observations ---------------- */

/// Streams censored observations into the state-pair and elapsed-time files.
#[derive(Debug)]
pub struct ObservationWriter<D: Write, T: Write> {
    data: D,
    time: T,
    written: u64,
}

impl<D: Write, T: Write> ObservationWriter<D, T> {
    /// Wrap the two destinations.
    pub const fn new(data: D, time: T) -> Self {
        Self {
            data,
            time,
            written: 0,
        }
    }

    /// Append one record: two state lines and one elapsed-time line.
    pub fn write(&mut self, obs: &CensoredObservation) -> Result<()> {
        writeln!(self.data, "{}", obs.first).context("write first state")?;
        writeln!(self.data, "{}", obs.second).context("write second state")?;
        writeln!(self.time, "{:.6}", obs.elapsed).context("write elapsed time")?;
        self.written += 1;
        Ok(())
    }

    /// Records written so far.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Flush both destinations.
    pub fn flush(&mut self) -> Result<()> {
        self.data.flush().context("flush state pairs")?;
        self.time.flush().context("flush elapsed times")?;
        Ok(())
    }

    /// Flush and hand back the destinations.
    pub fn finish(mut self) -> Result<(D, T)> {
        self.flush()?;
        Ok((self.data, self.time))
    }
}

impl ObservationWriter<BufWriter<File>, BufWriter<File>> {
    /// Create both output files.
    pub fn create<P: AsRef<Path>, Q: AsRef<Path>>(data: P, time: Q) -> Result<Self> {
        let d = create_buffered(data.as_ref())?;
        let t = create_buffered(time.as_ref())?;
        Ok(Self::new(d, t))
    }
}

/* ---------------- JSON ---------------- */

/// Write any serializable value to **JSON** (pretty).
pub fn write_json_pretty<P: AsRef<Path>, V: Serialize>(path: P, v: &V) -> Result<()> {
    let path_ref = path.as_ref();
    let mut w = create_buffered(path_ref)?;
    serde_json::to_writer_pretty(&mut w, v).with_context(|| "serialize JSON")?;
    w.write_all(b"\n").context("write trailing newline")?;
    w.flush().with_context(|| "flush JSON writer")?;
    Ok(())
}

/// Human-friendly path display for error messages.
fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
