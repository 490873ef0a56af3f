use clap::Subcommand;
use mindbank_core::scoring::ScoringEngine;
use mindbank_core::storage::Database;
use mindbank_core::DepositKind;

#[derive(Subcommand)]
pub enum DepositAction {
    /// Log a deposit (success | progress | effort)
    Add { kind: String, text: String },
    /// List all deposits, newest first
    List,
}

pub fn run(action: DepositAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        DepositAction::Add { kind, text } => {
            let kind: DepositKind = kind.parse()?;
            let logged = ScoringEngine::new(&db).log_deposit(kind, &text)?;
            println!("{}", serde_json::to_string_pretty(&logged)?);
            if !logged.counted {
                eprintln!("note: {} was already counted today; entry kept for history", kind.as_str());
            }
        }
        DepositAction::List => {
            let deposits = db.list_deposits()?;
            println!("{}", serde_json::to_string_pretty(&deposits)?);
        }
    }
    Ok(())
}
