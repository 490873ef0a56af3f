use clap::Subcommand;
use mindbank_core::scoring::ScoringEngine;
use mindbank_core::storage::Database;
use mindbank_core::RoutineKey;

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Mark a routine done for today
    Done { routine: String },
    /// List all routine checks, newest first
    List,
    /// Show the known routine keys
    Keys,
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RoutineAction::Done { routine } => {
            let db = Database::open()?;
            let routine: RoutineKey = routine.parse()?;
            let logged = ScoringEngine::new(&db).mark_routine_done(routine)?;
            println!("{}", serde_json::to_string_pretty(&logged)?);
            if !logged.counted {
                eprintln!(
                    "note: {} was already counted today; entry kept for history",
                    routine.as_str()
                );
            }
        }
        RoutineAction::List => {
            let db = Database::open()?;
            let checks = db.list_routine_checks()?;
            println!("{}", serde_json::to_string_pretty(&checks)?);
        }
        RoutineAction::Keys => {
            for key in RoutineKey::ALL {
                println!("{}", key.as_str());
            }
        }
    }
    Ok(())
}
