//! # Mindbank Core Library
//!
//! Core business logic for Mindbank, a CLI-first confidence journal. Users
//! log small daily deposits (success, progress, effort entries), reframe
//! negative thoughts, and check off daily routines; the scoring engine turns
//! those into daily point scores and a rolling 7-day trend.
//!
//! ## Architecture
//!
//! - **Journal**: append-only event log of deposits, reframes, and routine
//!   checks, bucketed by local calendar day at creation time
//! - **Daily flag ledger**: idempotent once-per-day counting, independent of
//!   event log scans
//! - **Scoring engine**: eligible/answered question maps and point math,
//!   always against an explicit settings snapshot
//! - **Weekly series**: trailing 7-day scores with the inactivity
//!   suppression rule
//! - **Coach**: rolling 168-hour content digest and a suggestion client
//!
//! ## Key Components
//!
//! - [`ScoringEngine`]: count-once logging and per-day scoring
//! - [`Database`]: event log, flag ledger, and settings persistence
//! - [`UserSettings`]: which questions are eligible to score
//! - [`CoachClient`]: digest-driven suggestions

pub mod coach;
pub mod day;
pub mod digest;
pub mod error;
pub mod journal;
pub mod logging;
pub mod project;
pub mod question;
pub mod scoring;
pub mod storage;

pub use coach::{CoachClient, CoachSuggestions};
pub use day::LocalDay;
pub use digest::{digest, digest_text, CoachDigest};
pub use error::{CoachError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use journal::{Deposit, DepositKind, Reframe, RoutineCheck, RoutineKey};
pub use project::Project;
pub use question::Question;
pub use scoring::{DayCounts, DayScore, Logged, ScoringEngine, POINTS_PER_QUESTION};
pub use storage::{Config, DailyFlags, Database, ResetSummary, UserSettings};
