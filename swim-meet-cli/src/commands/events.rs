use clap::{Args, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use swim_meet_core::{Event, FilterState, Gender, MeetSession, ShareableEvent};

use super::OutputFormat;
use crate::workspace::{load_session, save_session, DEFAULT_MEET_FILE};

#[derive(Args)]
pub struct EventsCommand {
    /// Working meet file
    #[arg(long, global = true, default_value = DEFAULT_MEET_FILE)]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: EventsSubcommand,
}

/// Column filters; an omitted filter matches everything.
#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    /// Only events on this day
    #[arg(long)]
    pub day: Option<String>,

    /// Only events for this age group
    #[arg(long)]
    pub age_group: Option<String>,

    /// Only events with this stroke
    #[arg(long)]
    pub stroke: Option<String>,

    /// Only events of this distance
    #[arg(long)]
    pub distance: Option<String>,

    /// Only events for this gender (Girls, Boys, Mixed)
    #[arg(long)]
    pub gender: Option<String>,
}

impl FilterArgs {
    pub fn to_state(&self) -> FilterState {
        let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);
        let all = FilterState::default();
        FilterState {
            day: pick(&self.day, all.day),
            age_group: pick(&self.age_group, all.age_group),
            stroke: pick(&self.stroke, all.stroke),
            distance: pick(&self.distance, all.distance),
            gender: pick(&self.gender, all.gender),
        }
    }
}

/// Editable event fields; omitted fields keep their value.
#[derive(Args, Clone, Default)]
pub struct EventFields {
    /// Event number, e.g. 15 or R1
    #[arg(long = "number", value_name = "NUMBER")]
    pub event_number: Option<String>,

    /// Day or session, e.g. "Saturday AM"
    #[arg(long)]
    pub day: Option<String>,

    /// Age group, e.g. "11-12"
    #[arg(long)]
    pub age_group: Option<String>,

    /// Girls, Boys or Mixed
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Distance in yards or meters
    #[arg(long)]
    pub distance: Option<u32>,

    /// Stroke, e.g. Freestyle
    #[arg(long)]
    pub stroke: Option<String>,

    /// Description text
    #[arg(long)]
    pub description: Option<String>,
}

impl EventFields {
    fn apply(&self, event: &mut Event) {
        if let Some(v) = &self.event_number {
            event.event_number = v.clone();
        }
        if let Some(v) = &self.day {
            event.day = v.clone();
        }
        if let Some(v) = &self.age_group {
            event.age_group = v.clone();
        }
        if let Some(v) = self.gender {
            event.gender = v;
        }
        if let Some(v) = self.distance {
            event.distance = v;
        }
        if let Some(v) = &self.stroke {
            event.stroke = v.clone();
        }
        if let Some(v) = &self.description {
            event.description = v.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum EventsSubcommand {
    /// List events, optionally filtered
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the values available for each filter
    Filters {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add an event at the top of the table
    Add {
        #[command(flatten)]
        fields: EventFields,
    },

    /// Update the event at a position shown by `events list`
    Update {
        /// Position (1-based)
        position: usize,

        #[command(flatten)]
        fields: EventFields,
    },

    /// Delete the event at a position shown by `events list`
    Delete {
        /// Position (1-based)
        position: usize,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl EventsCommand {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut session = load_session(&self.file)?;

        match &self.command {
            EventsSubcommand::List { filters, format } => {
                session.set_filters(filters.to_state());
                let rows = positioned(&session);

                match format {
                    OutputFormat::Json => {
                        let events: Vec<ShareableEvent> =
                            rows.iter().map(|(_, e)| e.to_shareable()).collect();
                        println!("{}", serde_json::to_string_pretty(&events)?);
                    }
                    OutputFormat::Text => {
                        if rows.is_empty() {
                            println!("No events found");
                            return Ok(());
                        }
                        print_event_table(&rows);
                        println!(
                            "\nShowing {} of {} event(s)",
                            rows.len(),
                            session.events().len()
                        );
                    }
                }
                Ok(())
            }

            EventsSubcommand::Filters { format } => {
                let options = session.filter_options();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&options)?);
                    }
                    OutputFormat::Text => {
                        println!("day:       {}", options.days.join(", "));
                        println!("age-group: {}", options.age_groups.join(", "));
                        println!("stroke:    {}", options.strokes.join(", "));
                        println!("distance:  {}", options.distances.join(", "));
                        println!("gender:    {}", options.genders.join(", "));
                    }
                }
                Ok(())
            }

            EventsSubcommand::Add { fields } => {
                let mut event = session.add_event().clone();
                fields.apply(&mut event);
                session.update_event(event.clone())?;
                save_session(&self.file, &session)?;

                println!("Added event:");
                println!("  {}", event);
                Ok(())
            }

            EventsSubcommand::Update { position, fields } => {
                let mut event = event_at(&session, *position)?.clone();
                fields.apply(&mut event);
                session.update_event(event.clone())?;
                save_session(&self.file, &session)?;

                println!("Updated event {}:", position);
                println!("  {}", event);
                Ok(())
            }

            EventsSubcommand::Delete { position, force } => {
                let event = event_at(&session, *position)?;
                let id = event.id;

                if !force {
                    print!("Delete event {} ({})? [y/N] ", position, event);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                let removed = session.delete_event(id)?;
                save_session(&self.file, &session)?;

                println!("Deleted event: {}", removed);
                Ok(())
            }
        }
    }
}

/// Filtered events paired with their 1-based position in the full table.
fn positioned(session: &MeetSession) -> Vec<(usize, &Event)> {
    let filters = session.filters();
    session
        .events()
        .iter()
        .enumerate()
        .filter(|(_, event)| filters.matches(event))
        .map(|(index, event)| (index + 1, event))
        .collect()
}

fn event_at(session: &MeetSession, position: usize) -> Result<&Event, String> {
    position
        .checked_sub(1)
        .and_then(|index| session.events().get(index))
        .ok_or_else(|| {
            format!(
                "No event at position {} (the meet has {} event(s))",
                position,
                session.events().len()
            )
        })
}

pub(crate) fn print_event_table(rows: &[(usize, &Event)]) {
    println!(
        "{:>4}  {:<7} {:<14} {:<12} {:<6} {:>5}  {}",
        "#", "Event", "Day", "Age", "Gender", "Dist", "Stroke"
    );
    println!("{}", "-".repeat(70));
    for (position, event) in rows {
        println!(
            "{:>4}  {:<7} {:<14} {:<12} {:<6} {:>5}  {}",
            position,
            event.event_number,
            event.day,
            event.age_group,
            event.gender,
            event.distance,
            event.stroke
        );
    }
}
