mod config;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use expmatrix_core::{render, Catalog, MatrixExpander, OutputStyle, Selection};

#[derive(Parser)]
#[command(
    name = "expmatrix",
    version,
    about = "Expand benchmarks against memory presets into a fuzzing experiment matrix"
)]
struct Cli {
    /// TOML file with [[benchmarks]] and [[memory]] tables
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// List benchmarks and memory presets
    List,

    /// Show which tables are in use
    Config,
}

#[derive(Args)]
struct GenerateArgs {
    /// Output style
    #[arg(short, long, default_value = "spaced")]
    format: CliFormat,

    /// Include disabled benchmarks
    #[arg(long, conflicts_with = "benchmark")]
    all: bool,

    /// Only these benchmark ids, enabled or not (repeatable)
    #[arg(short, long, value_name = "ID")]
    benchmark: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliFormat {
    Spaced,
    Compact,
    Pretty,
}

impl From<CliFormat> for OutputStyle {
    fn from(f: CliFormat) -> Self {
        match f {
            CliFormat::Spaced => Self::Spaced,
            CliFormat::Compact => Self::Compact,
            CliFormat::Pretty => Self::Pretty,
        }
    }
}

impl GenerateArgs {
    fn selection(&self) -> Selection {
        if self.all {
            Selection::All
        } else if !self.benchmark.is_empty() {
            Selection::Ids(self.benchmark.clone())
        } else {
            Selection::Enabled
        }
    }
}

/// `RUST_LOG`-style directives, falling back to `warn` when none are given.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(
            &std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default(),
        ))
        .init();

    let cli = Cli::parse();
    let source = config::source_from_env(cli.tables);

    match cli.command {
        Some(Commands::List) => cmd_list(&config::load_catalog(&source)?),
        Some(Commands::Config) => cmd_config(&source),
        None => cmd_generate(&config::load_catalog(&source)?, &cli.generate),
    }
}

fn cmd_generate(catalog: &Catalog, args: &GenerateArgs) -> Result<()> {
    let matrix = generate(catalog, args)?;
    emit(&mut io::stdout().lock(), &matrix)
}

/// Write the document and a newline. A reader that hangs up early (`| head`)
/// is not an error.
fn emit(out: &mut impl Write, text: &str) -> Result<()> {
    match writeln!(out, "{text}").and_then(|()| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}

fn generate(catalog: &Catalog, args: &GenerateArgs) -> Result<String> {
    let expander = MatrixExpander::from_catalog(catalog, &args.selection())?;
    if expander.is_empty() {
        tracing::warn!("no benchmark/memory pairs selected; emitting an empty matrix");
    }
    Ok(render(&expander.expand(), args.format.into())?)
}

fn cmd_list(catalog: &Catalog) -> Result<()> {
    println!("Benchmarks:");
    if catalog.benchmarks.is_empty() {
        println!("  (none)");
    }
    let width = catalog
        .benchmarks
        .iter()
        .map(|e| e.descriptor.id.len())
        .max()
        .unwrap_or(0);
    for entry in &catalog.benchmarks {
        let mark = if entry.enabled { 'x' } else { ' ' };
        println!(
            "  [{mark}] {:<width$}  {}",
            entry.descriptor.id, entry.descriptor
        );
    }
    println!();
    println!("Memory presets:");
    if catalog.memory.is_empty() {
        println!("  (none)");
    }
    for (i, setting) in catalog.memory.iter().enumerate() {
        println!("  {}. {setting}", i + 1);
    }
    Ok(())
}

fn cmd_config(source: &config::TablesSource) -> Result<()> {
    println!("Tables: {}", config::show_tables_source(source));
    if source.path().is_some() {
        let catalog = config::load_catalog(source)?;
        println!(
            "  {} benchmarks ({} enabled), {} memory presets",
            catalog.benchmarks.len(),
            catalog.benchmarks.iter().filter(|e| e.enabled).count(),
            catalog.memory.len()
        );
    }
    Ok(())
}
