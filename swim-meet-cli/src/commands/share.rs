use clap::{Args, Subcommand};
use std::path::PathBuf;
use swim_meet_core::{
    build_share_url, decode_share_payload, encode_share_payload, extract_share_token,
    resolve_shared, GitHubStore, MeetSession, SharedMeet,
};

use super::events::print_event_table;
use super::{runtime, OutputFormat};
use crate::config::Config;
use crate::workspace::{load_session, save_session, DEFAULT_MEET_FILE};

#[derive(Args)]
pub struct ShareCommand {
    #[command(subcommand)]
    pub command: ShareSubcommand,
}

#[derive(Subcommand)]
pub enum ShareSubcommand {
    /// Create a share link that embeds the whole meet
    Encode {
        /// Working meet file
        #[arg(long, default_value = DEFAULT_MEET_FILE)]
        file: PathBuf,

        /// Page the link opens (defaults to share_base_url)
        #[arg(long)]
        base_url: Option<String>,

        /// Print only the token
        #[arg(long)]
        token_only: bool,
    },

    /// Decode a share token or link without fetching anything
    Decode {
        /// Share token or full share URL
        input: String,
    },

    /// Open a shared meet, fetching it when the link points at a stored meet
    Open {
        /// Share token or full share URL
        input: String,

        /// Also write the meet to this working file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ShareCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ShareSubcommand::Encode {
                file,
                base_url,
                token_only,
            } => {
                let session = load_session(file)?;
                let token = encode_share_payload(&session.share_payload_inline())?;
                if *token_only {
                    println!("{}", token);
                } else {
                    let base = base_url
                        .as_deref()
                        .unwrap_or(&config.settings.share_base_url);
                    println!("{}", build_share_url(base, &token));
                }
                Ok(())
            }

            ShareSubcommand::Decode { input } => {
                let token = extract_share_token(input)?;
                let payload = decode_share_payload(&token)?;
                println!("{}", serde_json::to_string_pretty(&payload)?);
                Ok(())
            }

            ShareSubcommand::Open {
                input,
                output,
                format,
            } => {
                let token = extract_share_token(input)?;
                let rt = runtime()?;
                let shared = rt.block_on(resolve_shared(&GitHubStore::new(), &token))?;

                match format {
                    OutputFormat::Json => {
                        let session = shared_session(&shared);
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&session.share_payload_inline())?
                        );
                    }
                    OutputFormat::Text => print_shared(&shared),
                }

                if let Some(path) = output {
                    save_session(path, &shared_session(&shared))?;
                    println!("\nSaved shared meet to {}", path.display());
                }
                Ok(())
            }
        }
    }
}

fn shared_session(shared: &SharedMeet) -> MeetSession {
    let mut session = MeetSession::new();
    session.set_meet_info(shared.meet_info.clone());
    session.replace_events(shared.events.clone());
    session
}

fn print_shared(shared: &SharedMeet) {
    print!("{}", shared.meet_info);
    println!("Generated: {}", shared.generated_at.format("%Y-%m-%d %H:%M"));
    if let Some(storage) = &shared.storage {
        println!(
            "Source: {}/{} {}",
            storage.owner,
            storage.repo,
            storage.file_path()
        );
    }
    println!();

    let rows: Vec<_> = shared
        .events
        .iter()
        .enumerate()
        .map(|(index, event)| (index + 1, event))
        .collect();
    if rows.is_empty() {
        println!("No events");
    } else {
        print_event_table(&rows);
    }
}
