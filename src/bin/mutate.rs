use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use mutate::{BatchController, BatchSettings, Chaos, FsImageStore, Operation};
use tracing::Level;

/// Produce randomly mutated variants of images.
#[derive(Parser, Debug)]
#[command(name = "mutate", version)]
struct Cli {
    /// Randomization magnitude; 0 makes chaos-aware operations neutral [default: 0.25].
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    chaos: Option<f64>,

    /// Variants to produce per input [default: 1].
    #[arg(short = 'n', long)]
    number: Option<u32>,

    /// Operations chained per variant [default: 10].
    #[arg(short = 'p', long)]
    operations: Option<u32>,

    /// Existing directory to write variants into [default: .].
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output extension, which also picks the encoder [default: jpg].
    #[arg(long)]
    ext: Option<String>,

    /// Seed for reproducible runs; printed when drawn at random.
    #[arg(long)]
    seed: Option<u64>,

    /// Comma-separated operation names to pick from (see --list-ops).
    #[arg(long, value_delimiter = ',')]
    ops: Option<Vec<String>>,

    /// Print the available operations and exit.
    #[arg(long)]
    list_ops: bool,

    /// Process inputs and variants on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// JSON settings file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON report of every chain to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// More log output (repeatable).
    #[arg(short = 'v', long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Images to mutate.
    #[arg(value_name = "INPUT-FILES", required_unless_present = "list_ops")]
    inputs: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    if cli.list_ops {
        list_ops();
        return Ok(());
    }

    let settings = build_settings(&cli)?;
    let controller = BatchController::new(settings).context("invalid settings")?;
    let store = FsImageStore::with_jpeg_quality(controller.settings().jpeg_quality)?;
    if controller.settings().seed.is_none() {
        eprintln!("seed: {}", controller.seed());
    }

    let report = controller
        .run(&cli.inputs, &store, |variant| println!("{variant}"))
        .context("batch aborted")?;

    if let Some(path) = &cli.report {
        let json = report.to_json_pretty()?;
        std::fs::write(path, json)
            .with_context(|| format!("write report '{}'", path.display()))?;
    }

    tracing::info!(
        written = report.written(),
        failed_inputs = report.failed_inputs(),
        write_failures = report.write_failures(),
        "done"
    );
    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn list_ops() {
    for op in Operation::STANDARD {
        println!("{op}");
    }
    for op in Operation::OPT_IN {
        println!("{op} (opt-in)");
    }
}

fn build_settings(cli: &Cli) -> anyhow::Result<BatchSettings> {
    let mut settings = match &cli.config {
        Some(path) => BatchSettings::from_json_file(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => BatchSettings::default(),
    };

    if let Some(c) = cli.chaos {
        settings.chaos = Chaos::new(c)?;
    }
    if let Some(n) = cli.number {
        settings.count = n;
    }
    if let Some(p) = cli.operations {
        settings.depth = p;
    }
    if let Some(out) = &cli.output {
        settings.output_dir = out.clone();
    }
    if let Some(ext) = &cli.ext {
        settings.extension = ext.clone();
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    if let Some(ops) = &cli.ops {
        settings.operations = Some(ops.clone());
    }
    if cli.parallel {
        settings.threading.parallel = true;
    }
    if cli.threads.is_some() {
        settings.threading.threads = cli.threads;
    }
    Ok(settings)
}
