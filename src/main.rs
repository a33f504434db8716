//! Extends Chain CLI
//!
//! Usage:
//!   extends-chain [OPTIONS] <TEMPLATE>
//!
//! Options:
//!   -d, --data <FILE>       Render context (JSON, or TOML for `.toml` files)
//!   -c, --config <FILE>     Render configuration (TOML format)
//!   -o, --output <FILE>     Write output to a file instead of stdout
//!   -b, --base-path <DIR>   Resolve relative template names against DIR
//!   --chain                 Print the resolved chain and exit
//!   --lint                  Warn about near-miss directives
//!   --detect-cycles         Fail on directive cycles
//!   -v, --verbose           Debug logging
//!   -h, --help              Print help

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use extends_chain::{render_with_config, render_with_lint, RenderConfig, RenderError};

#[derive(Parser)]
#[command(name = "extends-chain")]
#[command(about = "Render templates that extend parents with <!-- USE parent --> directives")]
struct Cli {
    /// Leaf template to render
    template: PathBuf,

    /// Render context (JSON, or TOML when the file ends in .toml)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Render configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Resolve relative template names against this directory
    #[arg(short, long)]
    base_path: Option<PathBuf>,

    /// Print the resolved chain, root first, and exit
    #[arg(long)]
    chain: bool,

    /// Warn about first lines that almost form a directive
    #[arg(long)]
    lint: bool,

    /// Fail on directive cycles instead of looping forever
    #[arg(long)]
    detect_cycles: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "extends_chain=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    if let Err(message) = run(&cli) {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)
            .map_err(|e| format!("loading config '{}': {}", path.display(), e))?,
        None => RenderConfig::default(),
    };
    if let Some(base) = &cli.base_path {
        config = config.with_base_path(base);
    }
    if cli.detect_cycles {
        config = config.with_cycle_detection(true);
    }

    if cli.chain {
        let chain = config
            .resolver()
            .resolve(&cli.template)
            .map_err(|e| e.to_string())?;
        for path in chain {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let data = match &cli.data {
        Some(path) => load_data(path)?,
        None => serde_json::Value::Object(Default::default()),
    };

    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .map_err(|e| format!("creating output '{}': {}", path.display(), e))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    if cli.lint {
        let warnings = render_with_lint(&cli.template, &data, &mut output, &config)
            .map_err(|e| describe(&e))?;
        for warning in warnings {
            eprint!("{}", warning.report());
        }
    } else {
        render_with_config(&cli.template, &data, &mut output, &config)
            .map_err(|e| describe(&e))?;
    }

    output.flush().map_err(|e| format!("writing output: {}", e))
}

/// Name the pipeline stage a render error came from
fn describe(err: &RenderError) -> String {
    match err {
        RenderError::Chain(e) => format!("resolving template chain: {}", e),
        RenderError::Engine(e) if e.is_parse() => format!("parsing template chain: {}", e),
        RenderError::Engine(e) => format!("rendering: {}", e),
    }
}

/// Load the render context from JSON or TOML
fn load_data(path: &Path) -> Result<serde_json::Value, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("reading data '{}': {}", path.display(), e))?;

    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    if is_toml {
        let value: toml::Value = toml::from_str(&content)
            .map_err(|e| format!("parsing data '{}': {}", path.display(), e))?;
        serde_json::to_value(value).map_err(|e| format!("converting data: {}", e))
    } else {
        serde_json::from_str(&content)
            .map_err(|e| format!("parsing data '{}': {}", path.display(), e))
    }
}
