use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod workspace;

use commands::{
    ConfigCommand, CsvCommand, EventsCommand, ExtractCommand, InfoCommand, LinksCommand,
    ShareCommand, StoreCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "meet")]
#[command(version)]
#[command(about = "Turn swim meet announcements into a filterable, shareable event list", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract events from an announcement PDF or page images
    Extract(ExtractCommand),

    /// View and edit the meet name, dates, location and sessions
    Info(InfoCommand),

    /// View and edit the events of the working meet
    Events(EventsCommand),

    /// Export or import events as CSV
    Csv(CsvCommand),

    /// Create and open share links
    Share(ShareCommand),

    /// Save, list, open and publish meets in GitHub storage
    Store(StoreCommand),

    /// Manage the history of published links
    Links(LinksCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = Config::load(cli.config)?;

    execute_command(&cli.command, &config)
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "swim_meet=info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn execute_command(
    command: &Option<Commands>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Some(Commands::Extract(cmd)) => {
            cmd.run(config)?;
        }
        Some(Commands::Info(cmd)) => {
            cmd.run()?;
        }
        Some(Commands::Events(cmd)) => {
            cmd.run()?;
        }
        Some(Commands::Csv(cmd)) => {
            cmd.run()?;
        }
        Some(Commands::Share(cmd)) => {
            cmd.run(config)?;
        }
        Some(Commands::Store(cmd)) => {
            cmd.run(config)?;
        }
        Some(Commands::Links(cmd)) => {
            cmd.run(config)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
