use clap::{Args, Subcommand};
use std::path::PathBuf;
use swim_meet_core::{MeetInfo, MeetSession, SessionDetail};

use super::OutputFormat;
use crate::workspace::{load_or_new_session, load_session, save_session, DEFAULT_MEET_FILE};

#[derive(Args)]
pub struct InfoCommand {
    /// Working meet file
    #[arg(long, global = true, default_value = DEFAULT_MEET_FILE)]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: InfoSubcommand,
}

#[derive(Subcommand)]
pub enum InfoSubcommand {
    /// Show the meet information
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change meet-level fields; omitted fields keep their value
    Set {
        /// Meet name
        #[arg(long)]
        name: Option<String>,

        /// Meet dates, e.g. "March 7-8, 2026"
        #[arg(long)]
        dates: Option<String>,

        /// Pool or venue
        #[arg(long)]
        location: Option<String>,

        /// Entry limits text
        #[arg(long)]
        entry_limits: Option<String>,

        /// Awards text
        #[arg(long)]
        awards: Option<String>,
    },

    /// Manage session details (warm-up and start times)
    Session {
        #[command(subcommand)]
        command: SessionSubcommand,
    },
}

/// Session detail fields; omitted fields keep their value.
#[derive(Args, Clone, Default)]
pub struct SessionFields {
    /// Session name, e.g. "Saturday AM"
    #[arg(long)]
    pub session: Option<String>,

    /// Warm-up time
    #[arg(long)]
    pub warm_up: Option<String>,

    /// Start time
    #[arg(long)]
    pub start_time: Option<String>,
}

impl SessionFields {
    fn apply(&self, detail: &mut SessionDetail) {
        if let Some(v) = &self.session {
            detail.session = v.clone();
        }
        if let Some(v) = &self.warm_up {
            detail.warm_up = v.clone();
        }
        if let Some(v) = &self.start_time {
            detail.start_time = v.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum SessionSubcommand {
    /// Append a session
    Add {
        #[command(flatten)]
        fields: SessionFields,
    },

    /// Update the session at a position shown by `info show`
    Update {
        /// Position (1-based)
        position: usize,

        #[command(flatten)]
        fields: SessionFields,
    },

    /// Remove the session at a position shown by `info show`
    Remove {
        /// Position (1-based)
        position: usize,
    },
}

impl InfoCommand {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            InfoSubcommand::Show { format } => {
                let session = load_session(&self.file)?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&session.meet_info())?);
                    }
                    OutputFormat::Text => print_info(&session),
                }
                Ok(())
            }

            InfoSubcommand::Set {
                name,
                dates,
                location,
                entry_limits,
                awards,
            } => {
                let mut session = load_or_new_session(&self.file)?;
                let mut info = current_info(&session);
                let updates = [
                    (&mut info.meet_name, name),
                    (&mut info.dates, dates),
                    (&mut info.location, location),
                    (&mut info.entry_limits, entry_limits),
                    (&mut info.awards, awards),
                ];
                for (field, value) in updates {
                    if let Some(v) = value {
                        *field = v.clone();
                    }
                }
                session.set_meet_info(info);
                save_session(&self.file, &session)?;

                println!("Updated meet information:");
                println!();
                print_info(&session);
                Ok(())
            }

            InfoSubcommand::Session { command } => {
                let mut session = load_session(&self.file)?;
                let mut info = current_info(&session);
                let message = edit_sessions(&mut info, command)?;
                session.set_meet_info(info);
                save_session(&self.file, &session)?;

                println!("{}", message);
                Ok(())
            }
        }
    }
}

fn current_info(session: &MeetSession) -> MeetInfo {
    session.meet_info().cloned().unwrap_or_default()
}

/// Applies one session-detail edit and returns the message to print.
fn edit_sessions(info: &mut MeetInfo, command: &SessionSubcommand) -> Result<String, String> {
    match command {
        SessionSubcommand::Add { fields } => {
            let mut detail = SessionDetail::default();
            fields.apply(&mut detail);
            info.session_details.push(detail);
            Ok(format!(
                "Added session {}",
                info.session_details.len()
            ))
        }
        SessionSubcommand::Update { position, fields } => {
            let detail = session_at(info, *position)?;
            fields.apply(detail);
            Ok(format!("Updated session {}", position))
        }
        SessionSubcommand::Remove { position } => {
            session_at(info, *position)?;
            let removed = info.session_details.remove(position - 1);
            Ok(format!("Removed session {}: {}", position, removed.session))
        }
    }
}

fn session_at(info: &mut MeetInfo, position: usize) -> Result<&mut SessionDetail, String> {
    let count = info.session_details.len();
    position
        .checked_sub(1)
        .and_then(|index| info.session_details.get_mut(index))
        .ok_or_else(|| {
            format!(
                "No session at position {} (the meet has {} session(s))",
                position, count
            )
        })
}

fn print_info(session: &MeetSession) {
    match session.meet_info() {
        Some(info) => {
            print!("{}", info);
            for (index, detail) in info.session_details.iter().enumerate() {
                if index == 0 {
                    println!("\nSession positions:");
                }
                println!("  {}. {}", index + 1, detail.session);
            }
        }
        None => println!("No meet information"),
    }
    println!("\nEvents: {}", session.events().len());
    if let Some(remote) = session.remote() {
        println!("Stored as: {}", remote);
    }
}
