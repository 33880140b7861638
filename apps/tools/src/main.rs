use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portfolio_core::{fixture_page, parse_settings, Harness, ReplayStep, Settings};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "portfolio-tools", about = "Inspect settings and replay page interactions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a settings file and print the effective values.
    Settings { path: PathBuf },
    /// Run a JSON interaction script against the fixture page.
    Replay {
        script: PathBuf,
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Settings { path } => {
            let settings = read_settings(&path)?;
            print!("{}", toml::to_string_pretty(&settings)?);
        }
        Command::Replay { script, settings } => {
            let settings = match settings {
                Some(path) => read_settings(&path)?,
                None => Settings::default(),
            };
            let raw = fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let steps = parse_script(&raw)?;
            println!("{}", replay(settings, &steps)?);
        }
    }

    Ok(())
}

fn read_settings(path: &PathBuf) -> Result<Settings> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_settings(&raw).with_context(|| format!("loading {}", path.display()))
}

fn parse_script(raw: &str) -> Result<Vec<ReplayStep>> {
    serde_json::from_str(raw).context("malformed replay script")
}

fn replay(settings: Settings, steps: &[ReplayStep]) -> Result<String> {
    let mut harness = Harness::start(settings, fixture_page()?)?;
    for (index, step) in steps.iter().enumerate() {
        harness
            .run_step(step)
            .with_context(|| format!("step {index} ({step:?})"))?;
    }
    info!(
        steps = steps.len(),
        notifications = harness.app().notifications().pending(),
        "replay finished"
    );
    Ok(harness.body_html()?)
}
