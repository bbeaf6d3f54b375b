use clap::{Args, Subcommand};
use swim_meet_core::PublishedLinks;

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct LinksCommand {
    #[command(subcommand)]
    pub command: LinksSubcommand,
}

#[derive(Subcommand)]
pub enum LinksSubcommand {
    /// List share links you have published
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Forget a published link (the stored meet is kept)
    Remove {
        /// Meet ID of the link
        id: String,
    },
}

impl LinksCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut links = PublishedLinks::in_dir(&config.data_dir.value)?;

        match &self.command {
            LinksSubcommand::List { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(links.list())?);
                    }
                    OutputFormat::Text => {
                        if links.list().is_empty() {
                            println!("No published links");
                            return Ok(());
                        }
                        for link in links.list() {
                            println!(
                                "{}  {} ({} events, {})",
                                link.id,
                                link.meet_name,
                                link.events_count,
                                link.created_at.format("%Y-%m-%d %H:%M")
                            );
                            println!("    {}", link.url);
                        }
                        println!("\nTotal: {} link(s)", links.list().len());
                    }
                }
                Ok(())
            }

            LinksSubcommand::Remove { id } => {
                if links.remove(id)? {
                    println!("Removed link: {}", id);
                    Ok(())
                } else {
                    Err(format!("No published link for meet: {}", id).into())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, ConfigValue};
    use chrono::Utc;
    use clap::Parser;
    use swim_meet_core::PublishedLink;
    use tempfile::tempdir;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Links(LinksCommand),
    }

    fn parse(args: &[&str]) -> LinksCommand {
        let mut argv = vec!["meet", "links"];
        argv.extend_from_slice(args);
        match TestCli::try_parse_from(argv).unwrap().command {
            TestCommands::Links(cmd) => cmd,
        }
    }

    #[test]
    fn test_remove_link_from_history() {
        let temp_dir = tempdir().unwrap();
        let mut config = Config::load(Some(temp_dir.path().join("config.yaml"))).unwrap();
        config.data_dir = ConfigValue::new(temp_dir.path().to_path_buf(), ConfigSource::File);

        let mut links = PublishedLinks::in_dir(temp_dir.path()).unwrap();
        links
            .add(PublishedLink {
                id: "meet-1".into(),
                meet_name: "Winter Classic".into(),
                created_at: Utc::now(),
                url: "https://swim-meet.app/?shared=abc".into(),
                events_count: 12,
                storage: None,
            })
            .unwrap();

        parse(&["list"]).run(&config).unwrap();
        parse(&["remove", "meet-1"]).run(&config).unwrap();
        assert!(parse(&["remove", "meet-1"]).run(&config).is_err());

        let reloaded = PublishedLinks::in_dir(temp_dir.path()).unwrap();
        assert!(reloaded.list().is_empty());
    }
}
