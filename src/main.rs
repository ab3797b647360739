//! convo-edit - view conversation documents with live highlighting and
//! token counts

use std::env;
use std::io;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;

use convo_edit::error::{EditorError, Result};
use convo_edit::{render, serializer, Analyzer, Config, Document};

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    count: bool,
    file: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("convo_edit=info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = match parse_args(env::args().skip(1))? {
        Some(args) => args,
        None => return Ok(()),
    };

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let analyzer = Rc::new(Analyzer::from_config(&config));

    let document = match &args.file {
        Some(path) => serializer::load_path(path, analyzer)?,
        None => Document::create_default(analyzer),
    };

    let mut out = io::stdout();
    render::render_document(&mut out, &document, &config.view)?;
    if args.count {
        render::render_counts(&mut out, &document.aggregate_tokens())?;
    }

    Ok(())
}

/// Parse arguments; `None` means the command was fully handled
fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut args = Args::default();

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                print_version();
                return Ok(None);
            }
            "--config" | "-c" => {
                let path = argv
                    .next()
                    .ok_or_else(|| EditorError::Config("--config needs a path".to_string()))?;
                args.config = Some(PathBuf::from(path));
            }
            "--count" | "-t" => args.count = true,
            other if other.starts_with('-') => {
                return Err(EditorError::Config(format!("unknown option: {other}")));
            }
            file => args.file = Some(PathBuf::from(file)),
        }
    }

    Ok(Some(args))
}

fn print_usage() {
    println!("convo-edit {} - conversation document viewer", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: convo-edit [OPTIONS] [FILE]");
    println!();
    println!("Options:");
    println!("  -c, --config PATH  Read settings from PATH instead of ~/.convo-edit.toml");
    println!("  -t, --count        Print token totals for every configured tokenizer");
    println!("  -h, --help         Show this help message");
    println!("  -V, --version      Show version information");
    println!();
    println!("Without FILE an empty system/human/gpt document is shown.");
    println!("Set RUST_LOG=convo_edit=debug for per-segment recompute logs.");
}

fn print_version() {
    println!("convo-edit {}", env!("CARGO_PKG_VERSION"));
}
