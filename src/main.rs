mod render;

use anyhow::{Context, Result};
use clap::Parser;
use keygraph_core::{Config, Controller, Feed, FetchFailure, ShellRunner, CONFIG_FILE};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keygraph", version)]
#[command(about = "Lay out a repository's commit graph around its key branches", long_about = None)]
struct Cli {
    /// Path to the repository
    #[arg(default_value = ".")]
    path: PathBuf,
    /// Key branch, in column order (repeat up to three times)
    #[arg(short, long = "branch", value_name = "NAME")]
    branches: Vec<String>,
    /// Maximum number of commits to load
    #[arg(short, long, value_name = "N")]
    limit: Option<u64>,
    /// Configuration file (defaults to .keygraph.toml in the repository)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the full layout as JSON
    #[arg(long)]
    json: bool,
    /// Vertical zoom factor
    #[arg(long, value_name = "F")]
    zoom: Option<f64>,
    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbosity: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("keygraph={level},keygraph_core={level},graph={level}"))
    };

    // stdout is reserved for the graph output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> (Config, Option<FetchFailure>) {
    let path = cli.config.clone().unwrap_or_else(|| cli.path.join(CONFIG_FILE));
    match Config::load_from_file(&path) {
        Ok(config) => {
            debug!(path = %path.display(), "configuration loaded");
            (config, None)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "using default configuration");
            let failure = FetchFailure {
                feed: Feed::Config,
                error: err.to_string(),
            };
            (Config::default(), Some(failure))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let (config, config_failure) = load_config(&cli);
    // --branch becomes an explicit selection below, so only the limit
    // overrides the file here
    let config = config
        .with_overrides(Vec::new(), cli.limit)
        .context("invalid command-line options")?;

    let mut controller = Controller::new(ShellRunner::new(&cli.path), config)
        .with_config_failure(config_failure);
    if !cli.branches.is_empty() {
        controller = controller.with_selection(cli.branches.iter().cloned());
    }
    controller
        .refresh()
        .await
        .with_context(|| format!("failed to load {}", cli.path.display()))?;

    if let Some(zoom) = cli.zoom {
        controller.zoom_to(zoom);
    }

    let snapshot = controller.snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render::render_text(&snapshot));
    }
    Ok(())
}
