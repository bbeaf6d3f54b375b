use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

use super::events::FilterArgs;
use crate::workspace::{load_or_new_session, load_session, save_session, DEFAULT_MEET_FILE};

#[derive(Args)]
pub struct CsvCommand {
    /// Working meet file
    #[arg(long, global = true, default_value = DEFAULT_MEET_FILE)]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: CsvSubcommand,
}

#[derive(Subcommand)]
pub enum CsvSubcommand {
    /// Export events as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Export every event, ignoring filters
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Replace the event table with the rows of a CSV file
    Import {
        /// CSV file to read
        input: PathBuf,
    },
}

impl CsvCommand {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CsvSubcommand::Export {
                output,
                all,
                filters,
            } => {
                let mut session = load_session(&self.file)?;
                session.set_filters(filters.to_state());
                let csv = session.export_csv(*all);

                match output {
                    Some(path) => {
                        fs::write(path, format!("{}\n", csv)).map_err(|e| {
                            format!("Failed to write '{}': {}", path.display(), e)
                        })?;
                        let rows = csv.lines().count().saturating_sub(1);
                        println!("Exported {} event(s) to {}", rows, path.display());
                    }
                    None => println!("{}", csv),
                }
                Ok(())
            }

            CsvSubcommand::Import { input } => {
                let text = fs::read_to_string(input)
                    .map_err(|e| format!("Failed to read '{}': {}", input.display(), e))?;

                let mut session = load_or_new_session(&self.file)?;
                let count = session.import_csv(&text);
                save_session(&self.file, &session)?;

                println!(
                    "Imported {} event(s) into {}",
                    count,
                    self.file.display()
                );
                Ok(())
            }
        }
    }
}
