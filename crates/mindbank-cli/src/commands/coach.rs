use chrono::Utc;
use clap::Subcommand;
use mindbank_core::coach::CoachClient;
use mindbank_core::storage::{Config, Database};

#[derive(Subcommand)]
pub enum CoachAction {
    /// Structured digest of the last 7x24 hours
    Digest,
    /// Ask the coach for suggestions (offline fallback without an API key)
    Suggest {
        /// Weekly goal to steer the suggestions
        #[arg(long)]
        goal: Option<String>,
    },
}

pub fn run(action: CoachAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        CoachAction::Digest => {
            let digest = mindbank_core::digest(&db, Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&digest)?);
        }
        CoachAction::Suggest { goal } => {
            let digest = mindbank_core::digest(&db, Utc::now())?;
            let client = CoachClient::new(config.coach.clone());
            let runtime = tokio::runtime::Runtime::new()?;
            let suggestions = runtime.block_on(client.suggest(&digest, goal.as_deref()))?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
    }
    Ok(())
}
