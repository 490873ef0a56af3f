//! Per-day scoring and count-once logging.
//!
//! The engine never reads settings on its own: every scoring call takes the
//! settings snapshot as an explicit parameter, so recomputing a past day is
//! reproducible. Answered-ness consults the daily flag ledger first; the
//! event-log scan only backs up days logged before the ledger existed, and is
//! never consulted once the flag is set.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::day::LocalDay;
use crate::error::DatabaseError;
use crate::journal::{Deposit, DepositKind, Reframe, RoutineCheck, RoutineKey};
use crate::question::Question;
use crate::storage::flags::DailyFlags;
use crate::storage::settings::UserSettings;
use crate::storage::Database;

/// Points per answered question, and per eligible-but-unanswered question.
/// Fixed by design, not configurable.
pub const POINTS_PER_QUESTION: i64 = 10;

/// Eligible/answered tallies for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCounts {
    pub eligible: usize,
    pub answered: usize,
    pub map: BTreeMap<Question, bool>,
}

/// A freshly appended event plus whether it counted toward today's score.
///
/// `counted` is false when the same question had already been answered that
/// day; the event is still in the log for history, it just scores nothing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Logged<T> {
    pub record: T,
    pub counted: bool,
}

/// The scoring engine. Borrows the database; holds no state of its own.
pub struct ScoringEngine<'a> {
    db: &'a Database,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Whether `question` is answered on `day`: ledger flag first, event-log
    /// scan only as the legacy fallback when the flag is unset.
    fn question_answered(
        &self,
        question: &Question,
        day: &LocalDay,
        flags: &DailyFlags,
    ) -> Result<bool, DatabaseError> {
        if flags.is_set(question) {
            return Ok(true);
        }
        match question {
            Question::Deposit(kind) => self.db.has_deposit_on(day, *kind),
            Question::Reframe => self.db.has_reframe_on(day),
            Question::Routine(routine) => self.db.has_routine_check_on(day, *routine),
        }
    }

    /// The answered map for `day` under `settings`: one entry per eligible
    /// question, nothing else.
    pub fn answered_map(
        &self,
        day: &LocalDay,
        settings: &UserSettings,
    ) -> Result<BTreeMap<Question, bool>, DatabaseError> {
        let flags = self.db.flags_for(day)?;
        let mut map = BTreeMap::new();
        for question in Question::eligible(settings) {
            let answered = self.question_answered(&question, day, &flags)?;
            map.insert(question, answered);
        }
        Ok(map)
    }

    /// Eligible/answered counts for `day` under `settings`.
    pub fn day_counts(
        &self,
        day: &LocalDay,
        settings: &UserSettings,
    ) -> Result<DayCounts, DatabaseError> {
        let map = self.answered_map(day, settings)?;
        let eligible = map.len();
        let answered = map.values().filter(|answered| **answered).count();
        Ok(DayCounts {
            eligible,
            answered,
            map,
        })
    }

    // === Count-once logging ===

    /// Log a deposit now.
    pub fn log_deposit(&self, kind: DepositKind, text: &str) -> Result<Logged<Deposit>, DatabaseError> {
        self.log_deposit_at(kind, text, Utc::now())
    }

    /// Log a deposit with an explicit timestamp (backdated entries).
    ///
    /// The event append and the flag check-and-set happen in one transaction:
    /// if either write fails, neither is applied.
    pub fn log_deposit_at(
        &self,
        kind: DepositKind,
        text: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<Logged<Deposit>, DatabaseError> {
        let day = LocalDay::of(recorded_at);
        let deposit = Deposit {
            id: Uuid::new_v4().to_string(),
            recorded_at,
            day,
            kind,
            text: text.to_string(),
        };
        let counted = self.in_transaction(|| {
            self.db.insert_deposit(&deposit)?;
            let outcome = self.db.set_flag_if_unset(&day, &Question::Deposit(kind))?;
            Ok(!outcome.was_already_set)
        })?;
        Ok(Logged {
            record: deposit,
            counted,
        })
    }

    /// Log a reframe now.
    pub fn log_reframe(
        &self,
        original: &str,
        reframed: &str,
    ) -> Result<Logged<Reframe>, DatabaseError> {
        self.log_reframe_at(original, reframed, Utc::now())
    }

    /// Log a reframe with an explicit timestamp.
    pub fn log_reframe_at(
        &self,
        original: &str,
        reframed: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<Logged<Reframe>, DatabaseError> {
        let day = LocalDay::of(recorded_at);
        let reframe = Reframe {
            id: Uuid::new_v4().to_string(),
            recorded_at,
            day,
            original: original.to_string(),
            reframed: reframed.to_string(),
        };
        let counted = self.in_transaction(|| {
            self.db.insert_reframe(&reframe)?;
            let outcome = self.db.set_flag_if_unset(&day, &Question::Reframe)?;
            Ok(!outcome.was_already_set)
        })?;
        Ok(Logged {
            record: reframe,
            counted,
        })
    }

    /// Mark a routine done now.
    pub fn mark_routine_done(
        &self,
        routine: RoutineKey,
    ) -> Result<Logged<RoutineCheck>, DatabaseError> {
        self.mark_routine_done_at(routine, Utc::now())
    }

    /// Mark a routine done with an explicit timestamp.
    pub fn mark_routine_done_at(
        &self,
        routine: RoutineKey,
        recorded_at: DateTime<Utc>,
    ) -> Result<Logged<RoutineCheck>, DatabaseError> {
        let day = LocalDay::of(recorded_at);
        let check = RoutineCheck {
            id: Uuid::new_v4().to_string(),
            recorded_at,
            day,
            routine,
            done: true,
        };
        let counted = self.in_transaction(|| {
            self.db.insert_routine_check(&check)?;
            let outcome = self
                .db
                .set_flag_if_unset(&day, &Question::Routine(routine))?;
            Ok(!outcome.was_already_set)
        })?;
        Ok(Logged {
            record: check,
            counted,
        })
    }

    /// Run `op` inside a single immediate transaction, rolling back on error.
    fn in_transaction<T>(
        &self,
        op: impl FnOnce() -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let conn = self.db.conn();
        conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        match op() {
            Ok(value) => {
                conn.execute_batch("COMMIT;")?;
                Ok(value)
            }
            Err(err) => {
                let _ = conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }
}
