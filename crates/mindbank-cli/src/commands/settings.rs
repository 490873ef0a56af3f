use clap::Subcommand;
use mindbank_core::storage::{Database, UserSettings};
use mindbank_core::RoutineKey;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the current settings
    Show,
    /// Replace the set of active routines
    Routines { routines: Vec<String> },
    /// Include or exclude the three deposit checks
    DepositChecks {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Include or exclude the reframe check
    ReframeCheck {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut settings = UserSettings::load(&db)?;

    match action {
        SettingsAction::Show => {}
        SettingsAction::Routines { routines } => {
            let mut keys = Vec::with_capacity(routines.len());
            for routine in &routines {
                keys.push(routine.parse::<RoutineKey>()?);
            }
            keys.dedup();
            settings.active_routines = keys;
            settings.save(&db)?;
        }
        SettingsAction::DepositChecks { enabled } => {
            settings.include_deposit_checks = enabled;
            settings.save(&db)?;
        }
        SettingsAction::ReframeCheck { enabled } => {
            settings.include_reframe_check = enabled;
            settings.save(&db)?;
        }
    }

    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
