//! Medminder command-line interface.
//!
//! Thin presentation layer over `medminder-core`: extracts prescription text,
//! runs the parse/resolve pipeline, and manages a JSON schedule store.

use clap::{Parser, Subcommand};
use medminder_core::{
    reminder_plan, toggle_taken, CoreConfig, ExplicitTimeScope, MedicationRecord,
    PrescriptionService, ScheduleStore,
};
use medminder_extract::ExtractionService;
use medminder_types::ClockTime;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medminder")]
#[command(about = "Medication schedule CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a prescription document into a daily schedule
    Parse {
        /// Path to the prescription document
        file: PathBuf,
        /// Save the resolved schedule to this store file
        #[arg(long)]
        store: Option<PathBuf>,
        /// Let a literal "at HH:MM AM/PM" bind only its own medication
        #[arg(long)]
        per_record_times: bool,
    },
    /// Show the stored schedule
    Show {
        /// Path to the schedule store file
        #[arg(long)]
        store: PathBuf,
    },
    /// Toggle a medication's taken flag
    Take {
        /// Record index as printed by parse and show
        index: usize,
        /// Path to the schedule store file
        #[arg(long)]
        store: PathBuf,
    },
    /// Print the reminder plan for the stored schedule
    Plan {
        /// Path to the schedule store file
        #[arg(long)]
        store: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medminder=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Parse {
            file,
            store,
            per_record_times,
        }) => {
            tracing::info!("-- Parsing prescription {}", file.display());

            let extraction = ExtractionService::new();
            let text = extraction.extract_path(&file)?;

            let config = if per_record_times {
                let canonical = CoreConfig::default();
                CoreConfig::new(
                    canonical.default_times().to_vec(),
                    ExplicitTimeScope::PerRecord,
                )?
            } else {
                CoreConfig::default()
            };

            let service = PrescriptionService::new(Arc::new(config));
            let records = service.parse_text(&text);

            print_records(&records);

            if let Some(store_path) = store {
                let schedule_store = ScheduleStore::new(store_path);
                schedule_store.save(&records)?;
                println!("Saved schedule to: {}", schedule_store.path().display());
            }
        }
        Some(Commands::Show { store }) => {
            let schedule_store = ScheduleStore::new(store);
            let records = schedule_store.load();
            print_records(&records);
        }
        Some(Commands::Take { index, store }) => {
            let schedule_store = ScheduleStore::new(store);
            let mut records = schedule_store.load();
            let taken = toggle_taken(&mut records, index)?;
            schedule_store.save(&records)?;
            println!("Marked medication {} taken: {}", index, taken);
        }
        Some(Commands::Plan { store }) => {
            let schedule_store = ScheduleStore::new(store);
            let records = schedule_store.load();
            let plan = reminder_plan(&records);
            if plan.is_empty() {
                println!("No reminders planned.");
            } else {
                for entry in plan {
                    println!("{}: {}", entry.time, entry.message);
                }
            }
        }
        None => {
            println!("Use 'medminder --help' for commands");
        }
    }

    Ok(())
}

fn print_records(records: &[MedicationRecord]) {
    if records.is_empty() {
        println!("No medications found.");
        return;
    }

    for (index, record) in records.iter().enumerate() {
        println!(
            "{}: {}, Dosage: {}, Times: {}, Taken: {}",
            index,
            record.name,
            record.dosage,
            format_times(&record.times),
            record.taken
        );
    }
}

fn format_times(times: &[ClockTime]) -> String {
    times
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" / ")
}
