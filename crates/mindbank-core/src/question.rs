//! The closed set of scoreable questions.
//!
//! Deposits, the reframe check, and routines are all treated uniformly as
//! "questions": each is scored at most once per local day, and settings
//! decide which of them are eligible at all.

use serde::{Deserialize, Serialize};

use crate::journal::{DepositKind, RoutineKey};
use crate::storage::settings::UserSettings;

/// A scoreable question. The variant set is closed; there is no string-keyed
/// escape hatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    Deposit(DepositKind),
    Reframe,
    Routine(RoutineKey),
}

impl Question {
    /// Stable flag-ledger key for this question.
    pub fn key(&self) -> String {
        match self {
            Question::Deposit(kind) => kind.as_str().to_string(),
            Question::Reframe => "reframe".to_string(),
            Question::Routine(routine) => format!("routine:{}", routine.as_str()),
        }
    }

    /// The questions eligible under a settings snapshot, in scoring order:
    /// deposit checks, then the reframe check, then active routines.
    ///
    /// Eligibility is settings-as-of-now; recomputing a past day against a
    /// changed snapshot changes that day's eligible set too.
    pub fn eligible(settings: &UserSettings) -> Vec<Question> {
        let mut questions = Vec::new();
        if settings.include_deposit_checks {
            questions.extend(DepositKind::ALL.iter().copied().map(Question::Deposit));
        }
        if settings.include_reframe_check {
            questions.push(Question::Reframe);
        }
        questions.extend(
            settings
                .active_routines
                .iter()
                .copied()
                .map(Question::Routine),
        );
        questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable() {
        assert_eq!(Question::Deposit(DepositKind::Success).key(), "success");
        assert_eq!(Question::Reframe.key(), "reframe");
        assert_eq!(
            Question::Routine(RoutineKey::OpenDoorway).key(),
            "routine:open_doorway"
        );
    }

    #[test]
    fn default_settings_yield_seven_questions() {
        let settings = UserSettings::default();
        let eligible = Question::eligible(&settings);
        // 3 deposit checks + reframe + 3 default routines.
        assert_eq!(eligible.len(), 7);
    }

    #[test]
    fn toggles_prune_the_eligible_set() {
        let settings = UserSettings {
            active_routines: vec![RoutineKey::Affirmations],
            include_deposit_checks: false,
            include_reframe_check: false,
        };
        let eligible = Question::eligible(&settings);
        assert_eq!(eligible, vec![Question::Routine(RoutineKey::Affirmations)]);
    }

    #[test]
    fn no_settings_entries_means_no_questions() {
        let settings = UserSettings {
            active_routines: vec![],
            include_deposit_checks: false,
            include_reframe_check: false,
        };
        assert!(Question::eligible(&settings).is_empty());
    }
}
