//! Daily flag ledger: the authoritative "already counted today" record.
//!
//! A flag is set exactly once per (day, question), on the first event of that
//! kind for the day. Scoring consults flags before falling back to an event
//! log scan, so the ledger is what makes repeated logging idempotent.
//!
//! The check-and-set is a single `INSERT ... ON CONFLICT DO NOTHING`
//! statement. SQLite executes it atomically, so two callers racing on the
//! same (day, question) see exactly one first-set outcome; no in-process
//! locking is layered on top.

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::day::LocalDay;
use crate::error::DatabaseError;
use crate::journal::RoutineKey;
use crate::question::Question;

use super::database::Database;

/// Snapshot of one day's flags. Absent entries mean "not counted yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFlags {
    pub success: bool,
    pub progress: bool,
    pub effort: bool,
    pub reframe: bool,
    pub routines: BTreeMap<RoutineKey, bool>,
}

impl DailyFlags {
    /// Whether the flag for `question` is set.
    pub fn is_set(&self, question: &Question) -> bool {
        use crate::journal::DepositKind;
        match question {
            Question::Deposit(DepositKind::Success) => self.success,
            Question::Deposit(DepositKind::Progress) => self.progress,
            Question::Deposit(DepositKind::Effort) => self.effort,
            Question::Reframe => self.reframe,
            Question::Routine(key) => self.routines.get(key).copied().unwrap_or(false),
        }
    }
}

/// Result of a check-and-set on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOutcome {
    /// True when the flag was already set and nothing was mutated.
    pub was_already_set: bool,
}

impl Database {
    /// The flag snapshot for `day`; default (all unset) when none recorded.
    pub fn flags_for(&self, day: &LocalDay) -> Result<DailyFlags, DatabaseError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT question FROM daily_flags WHERE day = ?1")?;
        let rows = stmt.query_map(params![day.key()], |row| row.get::<_, String>(0))?;

        let mut flags = DailyFlags::default();
        for row in rows {
            let question = row?;
            match question.as_str() {
                "success" => flags.success = true,
                "progress" => flags.progress = true,
                "effort" => flags.effort = true,
                "reframe" => flags.reframe = true,
                other => match other
                    .strip_prefix("routine:")
                    .and_then(RoutineKey::parse)
                {
                    Some(key) => {
                        flags.routines.insert(key, true);
                    }
                    None => log::warn!("ignoring unknown flag '{other}' for day {day}"),
                },
            }
        }
        Ok(flags)
    }

    /// Atomically set the flag for (day, question) if it is not already set.
    ///
    /// Exactly one caller per (day, question) ever observes
    /// `was_already_set = false`; every later call is a no-op report.
    pub fn set_flag_if_unset(
        &self,
        day: &LocalDay,
        question: &Question,
    ) -> Result<SetOutcome, DatabaseError> {
        let inserted = self.conn().execute(
            "INSERT INTO daily_flags (day, question, set_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(day, question) DO NOTHING",
            params![day.key(), question.key(), Utc::now().to_rfc3339()],
        )?;
        Ok(SetOutcome {
            was_already_set: inserted == 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::DepositKind;

    #[test]
    fn flags_default_to_unset() {
        let db = Database::open_memory().unwrap();
        let day: LocalDay = "2025-03-01".parse().unwrap();
        let flags = db.flags_for(&day).unwrap();
        assert_eq!(flags, DailyFlags::default());
        assert!(!flags.is_set(&Question::Reframe));
    }

    #[test]
    fn set_if_unset_reports_first_set_exactly_once() {
        let db = Database::open_memory().unwrap();
        let day: LocalDay = "2025-03-01".parse().unwrap();
        let question = Question::Deposit(DepositKind::Success);

        let first = db.set_flag_if_unset(&day, &question).unwrap();
        let second = db.set_flag_if_unset(&day, &question).unwrap();

        assert!(!first.was_already_set);
        assert!(second.was_already_set);
        assert!(db.flags_for(&day).unwrap().success);
    }

    #[test]
    fn flags_are_scoped_to_their_day() {
        let db = Database::open_memory().unwrap();
        let monday: LocalDay = "2025-03-03".parse().unwrap();
        let tuesday: LocalDay = "2025-03-04".parse().unwrap();

        db.set_flag_if_unset(&monday, &Question::Reframe).unwrap();

        assert!(db.flags_for(&monday).unwrap().reframe);
        assert!(!db.flags_for(&tuesday).unwrap().reframe);
        // The same question on a new day counts again.
        let outcome = db.set_flag_if_unset(&tuesday, &Question::Reframe).unwrap();
        assert!(!outcome.was_already_set);
    }

    #[test]
    fn routine_flags_union_rather_than_overwrite() {
        let db = Database::open_memory().unwrap();
        let day: LocalDay = "2025-03-01".parse().unwrap();

        db.set_flag_if_unset(&day, &Question::Routine(RoutineKey::Nightcap))
            .unwrap();
        db.set_flag_if_unset(&day, &Question::Routine(RoutineKey::Affirmations))
            .unwrap();

        let flags = db.flags_for(&day).unwrap();
        assert!(flags.is_set(&Question::Routine(RoutineKey::Nightcap)));
        assert!(flags.is_set(&Question::Routine(RoutineKey::Affirmations)));
        assert!(!flags.is_set(&Question::Routine(RoutineKey::LastWord)));
    }
}
