//! User settings: which questions are eligible to be scored.
//!
//! Settings are user data, not app preferences, so they live in the database
//! kv store (as JSON) and are cleared together with the event log by the full
//! reset. Scoring always receives a settings snapshot explicitly; nothing in
//! the engine reads these behind the caller's back.

use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::journal::RoutineKey;

use super::database::Database;

/// kv-store key the settings JSON is stored under.
pub const SETTINGS_KEY: &str = "settings.user";

/// Which questions currently count toward the score.
///
/// Changing these changes eligibility for all days, past and future, the
/// next time scores are recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default = "default_active_routines")]
    pub active_routines: Vec<RoutineKey>,
    #[serde(default = "default_true")]
    pub include_deposit_checks: bool,
    #[serde(default = "default_true")]
    pub include_reframe_check: bool,
}

fn default_active_routines() -> Vec<RoutineKey> {
    vec![
        RoutineKey::Affirmations,
        RoutineKey::Nightcap,
        RoutineKey::OpenDoorway,
    ]
}

fn default_true() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            active_routines: default_active_routines(),
            include_deposit_checks: true,
            include_reframe_check: true,
        }
    }
}

impl UserSettings {
    /// Load the stored settings, applying documented defaults when nothing
    /// has ever been saved. Unreadable stored settings fall back to defaults
    /// with a warning rather than failing the caller.
    pub fn load(db: &Database) -> Result<Self, DatabaseError> {
        match db.kv_get(SETTINGS_KEY)? {
            None => Ok(Self::default()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => Ok(settings),
                Err(e) => {
                    log::warn!("stored settings unreadable, using defaults: {e}");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Persist these settings.
    pub fn save(&self, db: &Database) -> Result<(), DatabaseError> {
        let raw = serde_json::to_string(self)
            .map_err(|e| DatabaseError::QueryFailed(format!("settings encode: {e}")))?;
        db.kv_set(SETTINGS_KEY, &raw)
    }
}
