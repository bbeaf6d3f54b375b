use clap::{Args, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use swim_meet_core::{GitHubStore, MeetLibrary, MeetStatus, PublishedLinks};
use tracing::info;

use super::{runtime, OutputFormat};
use crate::config::Config;
use crate::workspace::{load_session, save_session, DEFAULT_MEET_FILE};

#[derive(Args)]
pub struct StoreCommand {
    #[command(subcommand)]
    pub command: StoreSubcommand,
}

#[derive(Subcommand)]
pub enum StoreSubcommand {
    /// Save the working meet to the repository
    Save {
        /// Working meet file
        #[arg(long, default_value = DEFAULT_MEET_FILE)]
        file: PathBuf,

        /// Folder to save into (draft, published)
        #[arg(long, short, default_value = "draft")]
        status: MeetStatus,
    },

    /// List stored meets
    List {
        /// Which folder to list (draft, published)
        #[arg(long, short, default_value = "draft")]
        status: MeetStatus,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Download a stored meet into a working file
    Open {
        /// Meet ID
        id: String,

        /// Working meet file to write
        #[arg(long, short, default_value = DEFAULT_MEET_FILE)]
        output: PathBuf,
    },

    /// Delete a stored meet
    Delete {
        /// Meet ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Publish the working meet and print its share link
    Publish {
        /// Working meet file
        #[arg(long, default_value = DEFAULT_MEET_FILE)]
        file: PathBuf,
    },
}

impl StoreCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = runtime()?;
        let mut library = MeetLibrary::new(GitHubStore::new(), config.settings.storage.clone());

        match &self.command {
            StoreSubcommand::Save { file, status } => {
                let mut session = load_session(file)?;
                let metadata = rt.block_on(library.save(&mut session, *status))?;
                save_session(file, &session)?;

                println!("Saved meet:");
                println!("  {}", metadata);
                Ok(())
            }

            StoreSubcommand::List { status, format } => {
                let meets = rt.block_on(library.refresh(*status))?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&meets)?);
                    }
                    OutputFormat::Text => {
                        if !library.credentials().is_configured() {
                            println!(
                                "GitHub storage is not configured. Set github.owner, github.repo and github.token."
                            );
                            return Ok(());
                        }
                        if meets.is_empty() {
                            println!("No {} meets found", status);
                            return Ok(());
                        }
                        for meet in &meets {
                            println!("{}", meet);
                        }
                        println!("\nTotal: {} meet(s)", meets.len());
                    }
                }
                Ok(())
            }

            StoreSubcommand::Open { id, output } => {
                let session = rt.block_on(library.open(id))?;
                save_session(output, &session)?;

                let name = session
                    .meet_info()
                    .map(|info| info.display_name().to_string())
                    .unwrap_or_default();
                println!(
                    "Opened '{}' ({} events) into {}",
                    name,
                    session.events().len(),
                    output.display()
                );
                Ok(())
            }

            StoreSubcommand::Delete { id, force } => {
                let metadata = rt.block_on(library.find(id))?;

                if !force {
                    print!("Delete meet '{}' ({})? [y/N] ", metadata.meet_name, metadata.id);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                rt.block_on(library.delete(&metadata))?;
                println!("Deleted meet: {}", metadata.meet_name);
                Ok(())
            }

            StoreSubcommand::Publish { file } => {
                let mut session = load_session(file)?;
                let outcome =
                    rt.block_on(library.publish(&mut session, &config.settings.share_base_url))?;
                save_session(file, &session)?;

                let mut links = PublishedLinks::in_dir(&config.data_dir.value)?;
                links.add(outcome.link)?;
                info!(id = %outcome.metadata.id, "recorded published link");

                println!("Published meet:");
                println!("  {}", outcome.metadata);
                println!();
                println!("Share link: {}", outcome.url);
                Ok(())
            }
        }
    }
}
