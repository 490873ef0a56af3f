//! Daily engagement scoring.
//!
//! [`engine`] answers "which questions were answered on day D" and performs
//! count-once logging; [`series`] runs the engine over the trailing week and
//! applies the inactivity suppression rule.

pub mod engine;
pub mod series;

pub use engine::{DayCounts, Logged, ScoringEngine, POINTS_PER_QUESTION};
pub use series::{apply_inactivity_suppression, DayScore, INACTIVITY_STREAK_DAYS};
