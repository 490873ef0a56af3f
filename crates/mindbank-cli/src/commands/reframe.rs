use clap::Subcommand;
use mindbank_core::scoring::ScoringEngine;
use mindbank_core::storage::Database;

#[derive(Subcommand)]
pub enum ReframeAction {
    /// Log a negative thought and its constructive reframing
    Add { original: String, reframed: String },
    /// List all reframes, newest first
    List,
}

pub fn run(action: ReframeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ReframeAction::Add { original, reframed } => {
            let logged = ScoringEngine::new(&db).log_reframe(&original, &reframed)?;
            println!("{}", serde_json::to_string_pretty(&logged)?);
            if !logged.counted {
                eprintln!("note: a reframe was already counted today; entry kept for history");
            }
        }
        ReframeAction::List => {
            let reframes = db.list_reframes()?;
            println!("{}", serde_json::to_string_pretty(&reframes)?);
        }
    }
    Ok(())
}
