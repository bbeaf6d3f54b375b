use clap::ValueEnum;

mod config_cmd;
mod csv_cmd;
mod events;
mod extract;
mod info;
mod links;
mod share;
mod store;

pub use config_cmd::ConfigCommand;
pub use csv_cmd::CsvCommand;
pub use events::EventsCommand;
pub use extract::ExtractCommand;
pub use info::InfoCommand;
pub use links::LinksCommand;
pub use share::ShareCommand;
pub use store::StoreCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Builds the tokio runtime async commands block on.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    tokio::runtime::Runtime::new().map_err(|e| format!("Failed to start runtime: {}", e).into())
}
