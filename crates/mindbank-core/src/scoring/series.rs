//! Trailing 7-day score series and the inactivity suppression rule.
//!
//! Withdrawal penalties stop on the third consecutive zero-answered day and
//! stay off while the dry spell continues; the first two zero days still pay
//! full withdrawals, and any answered day re-arms the penalty. Because the
//! rule depends on the preceding days, today's score is always derived from
//! the whole series, never computed in isolation.

use serde::{Deserialize, Serialize};

use crate::day::LocalDay;
use crate::scoring::engine::{DayCounts, ScoringEngine, POINTS_PER_QUESTION};
use crate::storage::settings::UserSettings;

/// Consecutive zero-answered days before withdrawals are suppressed.
pub const INACTIVITY_STREAK_DAYS: usize = 3;

/// Days covered by the weekly series.
pub const SERIES_DAYS: usize = 7;

/// One day's derived score. Never persisted; recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayScore {
    pub day: LocalDay,
    pub eligible: usize,
    pub answered: usize,
    pub deposit_points: i64,
    pub withdrawal_points: i64,
    pub total_points: i64,
}

impl DayScore {
    fn from_counts(day: LocalDay, counts: &DayCounts) -> Self {
        let deposit_points = counts.answered as i64 * POINTS_PER_QUESTION;
        let withdrawal_points =
            ((counts.eligible as i64 - counts.answered as i64) * POINTS_PER_QUESTION).max(0);
        Self {
            day,
            eligible: counts.eligible,
            answered: counts.answered,
            deposit_points,
            withdrawal_points,
            total_points: deposit_points - withdrawal_points,
        }
    }

    fn zeroed(day: LocalDay) -> Self {
        Self {
            day,
            eligible: 0,
            answered: 0,
            deposit_points: 0,
            withdrawal_points: 0,
            total_points: 0,
        }
    }
}

/// Apply the inactivity rule across a chronologically ordered series,
/// recomputing totals.
///
/// A `zero_streak` counter increments on each zero-answered day and resets on
/// any answered day. From the day the streak reaches
/// [`INACTIVITY_STREAK_DAYS`] onward (that day itself, not retroactively),
/// withdrawals are forced to zero until the streak breaks.
pub fn apply_inactivity_suppression(scores: &mut [DayScore]) {
    let mut zero_streak = 0usize;
    for score in scores.iter_mut() {
        if score.answered == 0 {
            zero_streak += 1;
            if zero_streak >= INACTIVITY_STREAK_DAYS {
                score.withdrawal_points = 0;
            }
        } else {
            zero_streak = 0;
        }
        score.total_points = score.deposit_points - score.withdrawal_points;
    }
}

impl ScoringEngine<'_> {
    /// Score the 7 local days ending at `today` inclusive, oldest first, with
    /// the inactivity rule applied across the window.
    ///
    /// A failure scoring one day yields a zeroed entry for that day and a
    /// warning; the rest of the window still scores.
    pub fn weekly_series(&self, settings: &UserSettings, today: LocalDay) -> Vec<DayScore> {
        let mut scores: Vec<DayScore> = LocalDay::trailing_window(today, SERIES_DAYS)
            .into_iter()
            .map(|day| match self.day_counts(&day, settings) {
                Ok(counts) => DayScore::from_counts(day, &counts),
                Err(e) => {
                    log::warn!("scoring {day} failed, reporting zeroes: {e}");
                    DayScore::zeroed(day)
                }
            })
            .collect();
        apply_inactivity_suppression(&mut scores);
        scores
    }

    /// Today's score, derived from the full trailing series.
    pub fn today_score(&self, settings: &UserSettings) -> DayScore {
        let today = LocalDay::today();
        self.weekly_series(settings, today)
            .pop()
            .unwrap_or_else(|| DayScore::zeroed(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn score(day: &str, eligible: usize, answered: usize) -> DayScore {
        DayScore::from_counts(
            day.parse().unwrap(),
            &DayCounts {
                eligible,
                answered,
                map: Default::default(),
            },
        )
    }

    #[test]
    fn raw_points_follow_the_fixed_mapping() {
        let s = score("2025-03-01", 5, 2);
        assert_eq!(s.deposit_points, 20);
        assert_eq!(s.withdrawal_points, 30);
        assert_eq!(s.total_points, -10);
    }

    #[test]
    fn third_consecutive_zero_day_stops_withdrawals() {
        let mut scores = vec![
            score("2025-03-01", 5, 0),
            score("2025-03-02", 5, 0),
            score("2025-03-03", 5, 0),
            score("2025-03-04", 5, 0),
        ];
        apply_inactivity_suppression(&mut scores);

        // Days 1 and 2 of the dry spell still pay in full.
        assert_eq!(scores[0].withdrawal_points, 50);
        assert_eq!(scores[1].withdrawal_points, 50);
        // Day 3 and every consecutive zero day after it are spared.
        assert_eq!(scores[2].withdrawal_points, 0);
        assert_eq!(scores[3].withdrawal_points, 0);
        assert_eq!(scores[2].total_points, 0);
    }

    #[test]
    fn answered_day_resets_the_streak() {
        let mut scores = vec![
            score("2025-03-01", 5, 0),
            score("2025-03-02", 5, 0),
            score("2025-03-03", 5, 1),
            score("2025-03-04", 5, 0),
            score("2025-03-05", 5, 0),
            score("2025-03-06", 5, 0),
        ];
        apply_inactivity_suppression(&mut scores);

        // The answered day broke the streak; the next dry spell starts over.
        assert_eq!(scores[3].withdrawal_points, 50);
        assert_eq!(scores[4].withdrawal_points, 50);
        assert_eq!(scores[5].withdrawal_points, 0);
    }

    #[test]
    fn suppression_is_not_retroactive() {
        let mut scores = vec![
            score("2025-03-01", 3, 0),
            score("2025-03-02", 3, 0),
            score("2025-03-03", 3, 0),
        ];
        apply_inactivity_suppression(&mut scores);
        assert_eq!(scores[0].withdrawal_points, 30);
        assert_eq!(scores[1].withdrawal_points, 30);
        assert_eq!(scores[2].withdrawal_points, 0);
    }

    #[test]
    fn weekly_series_is_seven_days_ending_today() {
        let db = crate::storage::Database::open_memory().unwrap();
        let engine = ScoringEngine::new(&db);
        let settings = UserSettings::default();
        let today: LocalDay = "2025-03-09".parse().unwrap();

        let series = engine.weekly_series(&settings, today);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].day.key(), "2025-03-03");
        assert_eq!(series[6].day.key(), "2025-03-09");
        // Empty database: eligible stays at the settings' question count.
        for day in &series {
            assert_eq!(day.eligible, 7);
            assert_eq!(day.answered, 0);
        }
        // With seven zero days, only the first two pay withdrawals.
        assert_eq!(series[0].withdrawal_points, 70);
        assert_eq!(series[1].withdrawal_points, 70);
        for day in &series[2..] {
            assert_eq!(day.withdrawal_points, 0);
        }
    }

    proptest! {
        #[test]
        fn suppression_invariants(
            days in proptest::collection::vec((0usize..9, 0usize..9), 1..14)
        ) {
            let mut scores: Vec<DayScore> = days
                .iter()
                .enumerate()
                .map(|(i, (eligible, answered))| {
                    let eligible = (*eligible).max(*answered);
                    let day = LocalDay(
                        chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                            .unwrap()
                            .checked_add_days(chrono::Days::new(i as u64))
                            .unwrap(),
                    );
                    score(&day.key(), eligible, *answered)
                })
                .collect();
            let raw = scores.clone();
            apply_inactivity_suppression(&mut scores);

            let mut streak = 0usize;
            for (suppressed, original) in scores.iter().zip(raw.iter()) {
                if suppressed.answered == 0 {
                    streak += 1;
                } else {
                    streak = 0;
                }
                // Deposits are never touched by suppression.
                prop_assert_eq!(suppressed.deposit_points, original.deposit_points);
                if streak >= INACTIVITY_STREAK_DAYS {
                    prop_assert_eq!(suppressed.withdrawal_points, 0);
                } else {
                    prop_assert_eq!(suppressed.withdrawal_points, original.withdrawal_points);
                }
                prop_assert_eq!(
                    suppressed.total_points,
                    suppressed.deposit_points - suppressed.withdrawal_points
                );
            }
        }
    }
}
