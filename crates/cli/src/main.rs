//! Cache hierarchy simulator CLI.
//!
//! This binary replays a memory access trace through a two-level cache hierarchy. It:
//! 1. **Configures:** Starts from built-in defaults, applies an optional JSON config file,
//!    then applies individual command-line overrides.
//! 2. **Runs:** Streams the trace through the hierarchy.
//! 3. **Reports:** Prints the one-line summary, or the full statistics with `--report`.
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` to see evictions.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cachesim_core::config::HierarchyConfig;
use cachesim_core::sim::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Two-level inclusive cache hierarchy simulator",
    long_about = "Replay a memory access trace through an L1/L2 cache hierarchy and report miss rates and average access time.\n\nTrace lines are `r <hex-address>` or `w <hex-address>`. Sizes, block sizes and associativities are log2 exponents.\n\nExamples:\n  cachesim trace.txt\n  cachesim trace.txt --bsize 5 --l1-size 12 --l1-assoc 2 --l2-size 16 --l2-assoc 3\n  cachesim trace.txt --config hierarchy.json --wr-alloc 0 --report"
)]
struct Cli {
    /// Trace file to replay.
    trace: PathBuf,

    /// JSON hierarchy configuration; command-line flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Main memory latency in cycles.
    #[arg(long = "mem-cyc")]
    mem_cyc: Option<u64>,

    /// Block size exponent applied to both levels.
    #[arg(long = "bsize", allow_negative_numbers = true)]
    bsize: Option<i32>,

    /// L1 write-miss policy: 1 = write-allocate, 0 = write-no-allocate.
    #[arg(long = "wr-alloc", value_parser = clap::value_parser!(u8).range(0..=1))]
    wr_alloc: Option<u8>,

    /// L1 size exponent.
    #[arg(long = "l1-size", allow_negative_numbers = true)]
    l1_size: Option<i32>,

    /// L1 associativity exponent.
    #[arg(long = "l1-assoc", allow_negative_numbers = true)]
    l1_assoc: Option<i32>,

    /// L1 latency in cycles.
    #[arg(long = "l1-cyc")]
    l1_cyc: Option<u64>,

    /// L2 size exponent.
    #[arg(long = "l2-size", allow_negative_numbers = true)]
    l2_size: Option<i32>,

    /// L2 associativity exponent.
    #[arg(long = "l2-assoc", allow_negative_numbers = true)]
    l2_assoc: Option<i32>,

    /// L2 latency in cycles.
    #[arg(long = "l2-cyc")]
    l2_cyc: Option<u64>,

    /// Print the full statistics report instead of the one-line summary.
    #[arg(long)]
    report: bool,
}

impl Cli {
    /// Resolves the hierarchy configuration: defaults, then config file, then flags.
    fn hierarchy_config(&self) -> Result<HierarchyConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                HierarchyConfig::from_json(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => HierarchyConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut HierarchyConfig) {
        if let Some(cycles) = self.mem_cyc {
            config.memory.latency = cycles;
        }
        if let Some(block) = self.bsize {
            config.l1.block_log2 = block;
            config.l2.block_log2 = block;
        }
        if let Some(flag) = self.wr_alloc {
            config.l1.write_allocate = flag == 1;
        }
        if let Some(size) = self.l1_size {
            config.l1.size_log2 = size;
        }
        if let Some(assoc) = self.l1_assoc {
            config.l1.assoc_log2 = assoc;
        }
        if let Some(cycles) = self.l1_cyc {
            config.l1.latency = cycles;
        }
        if let Some(size) = self.l2_size {
            config.l2.size_log2 = size;
        }
        if let Some(assoc) = self.l2_assoc {
            config.l2.assoc_log2 = assoc;
        }
        if let Some(cycles) = self.l2_cyc {
            config.l2.latency = cycles;
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the hierarchy, replays the trace and prints the results.
fn run(cli: &Cli) -> Result<()> {
    let config = cli.hierarchy_config()?;
    debug!(?config, "resolved configuration");
    let mut sim = Simulator::from_config(&config).context("invalid cache configuration")?;

    let file = File::open(&cli.trace)
        .with_context(|| format!("opening trace {}", cli.trace.display()))?;
    sim.run_reader(BufReader::new(file))
        .with_context(|| format!("replaying trace {}", cli.trace.display()))?;

    let stats = sim.finish();
    if cli.report {
        stats.print();
    } else {
        println!("{}", stats.summary());
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("[!] FATAL: {e:#}");
        process::exit(1);
    }
}
