//! Journal event records: deposits, reframes, and routine checks.
//!
//! All three are append-only. The local day is derived once when the record
//! is created and stored alongside the timestamp, so later scoring never has
//! to re-derive it with potentially different timezone math.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::day::LocalDay;
use crate::error::ValidationError;

/// Kind of a confidence deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositKind {
    Success,
    Progress,
    Effort,
}

impl DepositKind {
    pub const ALL: [DepositKind; 3] = [
        DepositKind::Success,
        DepositKind::Progress,
        DepositKind::Effort,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DepositKind::Success => "success",
            DepositKind::Progress => "progress",
            DepositKind::Effort => "effort",
        }
    }

    /// Parse a storage/CLI string. Returns `None` for unknown kinds so that
    /// malformed rows can be skipped instead of aborting a scoring pass.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(DepositKind::Success),
            "progress" => Some(DepositKind::Progress),
            "effort" => Some(DepositKind::Effort),
            _ => None,
        }
    }
}

impl std::str::FromStr for DepositKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DepositKind::parse(s).ok_or_else(|| ValidationError::UnknownDepositKind(s.to_string()))
    }
}

/// A user-configurable recurring daily habit question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineKey {
    Affirmations,
    Nightcap,
    OpenDoorway,
    Visualization,
    FlatTire,
    MentalSanctuary,
    BreathingReset,
    AttitudeLockdown,
    LastWord,
}

impl RoutineKey {
    pub const ALL: [RoutineKey; 9] = [
        RoutineKey::Affirmations,
        RoutineKey::Nightcap,
        RoutineKey::OpenDoorway,
        RoutineKey::Visualization,
        RoutineKey::FlatTire,
        RoutineKey::MentalSanctuary,
        RoutineKey::BreathingReset,
        RoutineKey::AttitudeLockdown,
        RoutineKey::LastWord,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutineKey::Affirmations => "affirmations",
            RoutineKey::Nightcap => "nightcap",
            RoutineKey::OpenDoorway => "open_doorway",
            RoutineKey::Visualization => "visualization",
            RoutineKey::FlatTire => "flat_tire",
            RoutineKey::MentalSanctuary => "mental_sanctuary",
            RoutineKey::BreathingReset => "breathing_reset",
            RoutineKey::AttitudeLockdown => "attitude_lockdown",
            RoutineKey::LastWord => "last_word",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        RoutineKey::ALL.iter().copied().find(|key| key.as_str() == s)
    }
}

impl std::str::FromStr for RoutineKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoutineKey::parse(s).ok_or_else(|| ValidationError::UnknownRoutine(s.to_string()))
    }
}

/// A logged success/progress/effort entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub day: LocalDay,
    pub kind: DepositKind,
    pub text: String,
}

/// A logged negative-thought to constructive-thought pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reframe {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub day: LocalDay,
    pub original: String,
    pub reframed: String,
}

/// One "mark done" action for a routine. A routine may be marked done several
/// times in a day; scoring only cares that at least one record exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineCheck {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub day: LocalDay,
    pub routine: RoutineKey,
    pub done: bool,
}
