use clap::Subcommand;
use mindbank_core::scoring::ScoringEngine;
use mindbank_core::storage::{Database, UserSettings};
use mindbank_core::LocalDay;

#[derive(Subcommand)]
pub enum ScoreAction {
    /// Today's score (derived from the trailing week)
    Today,
    /// The trailing 7-day series, oldest first
    Week,
}

pub fn run(action: ScoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let settings = UserSettings::load(&db)?;
    let engine = ScoringEngine::new(&db);

    match action {
        ScoreAction::Today => {
            let score = engine.today_score(&settings);
            println!("{}", serde_json::to_string_pretty(&score)?);
        }
        ScoreAction::Week => {
            let series = engine.weekly_series(&settings, LocalDay::today());
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
    }
    Ok(())
}
