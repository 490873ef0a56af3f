//! Digest of recent journal content for the coach feature.
//!
//! The digest covers a strict rolling 168-hour window from "now", unlike the
//! scoring engine's local-calendar-day buckets. The two windows look similar
//! and are easy to conflate; they are intentionally different and must stay
//! that way.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::journal::DepositKind;
use crate::storage::Database;

/// Hours covered by the digest window.
pub const DIGEST_WINDOW_HOURS: i64 = 168;

/// How many of the newest items of each kind the digest carries.
const RECENT_ITEM_CAP: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestTotals {
    pub success: usize,
    pub progress: usize,
    pub effort: usize,
    pub reframes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentDeposit {
    pub kind: DepositKind,
    pub text: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentReframe {
    pub original: String,
    pub reframed: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentItems {
    pub deposits: Vec<RecentDeposit>,
    pub reframes: Vec<RecentReframe>,
}

/// Structured summary of the last 7x24h of journal content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachDigest {
    pub totals: DigestTotals,
    pub recent: RecentItems,
    pub summary: String,
}

/// Build the digest over the 168 hours before `now`.
pub fn digest(db: &Database, now: DateTime<Utc>) -> Result<CoachDigest, DatabaseError> {
    let cutoff = now - Duration::hours(DIGEST_WINDOW_HOURS);

    let deposits: Vec<_> = db
        .list_deposits()?
        .into_iter()
        .filter(|d| d.recorded_at > cutoff)
        .collect();
    let reframes: Vec<_> = db
        .list_reframes()?
        .into_iter()
        .filter(|r| r.recorded_at > cutoff)
        .collect();

    let totals = DigestTotals {
        success: deposits
            .iter()
            .filter(|d| d.kind == DepositKind::Success)
            .count(),
        progress: deposits
            .iter()
            .filter(|d| d.kind == DepositKind::Progress)
            .count(),
        effort: deposits
            .iter()
            .filter(|d| d.kind == DepositKind::Effort)
            .count(),
        reframes: reframes.len(),
    };

    // list_* return newest first, so the head is the most recent.
    let recent = RecentItems {
        deposits: deposits
            .iter()
            .take(RECENT_ITEM_CAP)
            .map(|d| RecentDeposit {
                kind: d.kind,
                text: d.text.clone(),
                recorded_at: d.recorded_at,
            })
            .collect(),
        reframes: reframes
            .iter()
            .take(RECENT_ITEM_CAP)
            .map(|r| RecentReframe {
                original: r.original.clone(),
                reframed: r.reframed.clone(),
                recorded_at: r.recorded_at,
            })
            .collect(),
    };

    let summary = format!(
        "Last 7d: success={}, progress={}, effort={}, reframes={}",
        totals.success, totals.progress, totals.effort, totals.reframes
    );

    Ok(CoachDigest {
        totals,
        recent,
        summary,
    })
}

/// The plain-text digest line.
pub fn digest_text(db: &Database, now: DateTime<Utc>) -> Result<String, DatabaseError> {
    Ok(digest(db, now)?.summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::LocalDay;
    use crate::journal::{Deposit, Reframe};
    use uuid::Uuid;

    fn deposit_at(db: &Database, kind: DepositKind, recorded_at: DateTime<Utc>, text: &str) {
        db.insert_deposit(&Deposit {
            id: Uuid::new_v4().to_string(),
            recorded_at,
            day: LocalDay::of(recorded_at),
            kind,
            text: text.to_string(),
        })
        .unwrap();
    }

    #[test]
    fn window_is_rolling_hours_not_calendar_days() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();

        deposit_at(&db, DepositKind::Success, now - Duration::hours(167), "in");
        deposit_at(&db, DepositKind::Success, now - Duration::hours(169), "out");

        let digest = digest(&db, now).unwrap();
        assert_eq!(digest.totals.success, 1);
        assert_eq!(digest.recent.deposits.len(), 1);
        assert_eq!(digest.recent.deposits[0].text, "in");
    }

    #[test]
    fn recent_items_are_newest_first_and_capped_at_three() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();

        for i in 0..5 {
            deposit_at(
                &db,
                DepositKind::Effort,
                now - Duration::hours(i),
                &format!("entry {i}"),
            );
        }

        let digest = digest(&db, now + Duration::seconds(1)).unwrap();
        assert_eq!(digest.totals.effort, 5);
        assert_eq!(digest.recent.deposits.len(), 3);
        assert_eq!(digest.recent.deposits[0].text, "entry 0");
        assert_eq!(digest.recent.deposits[2].text, "entry 2");
    }

    #[test]
    fn summary_line_reports_all_totals() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        deposit_at(&db, DepositKind::Progress, now - Duration::hours(1), "step");
        db.insert_reframe(&Reframe {
            id: Uuid::new_v4().to_string(),
            recorded_at: now - Duration::hours(2),
            day: LocalDay::of(now - Duration::hours(2)),
            original: "I always fail".to_string(),
            reframed: "I am still learning".to_string(),
        })
        .unwrap();

        let text = digest_text(&db, now).unwrap();
        assert_eq!(text, "Last 7d: success=0, progress=1, effort=0, reframes=1");
    }
}
