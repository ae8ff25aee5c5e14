//! Repetition ledger
//!
//! Each site record carries an opaque ledger field recording which review
//! templates were used recently: `id|YYYY-MM-DD` entries joined by commas.
//! Entries older than the retention window are treated as absent on read and
//! pruned on the next write, so long-expired templates become eligible again
//! by design.
//!
//! Everything here is pure — persistence of the rewritten string is the
//! scheduler's job via the record store.

use chrono::NaiveDate;
use std::collections::HashSet;

/// Days a used template stays blocked for a site
pub const RETENTION_DAYS: i64 = 30;

const ENTRY_SEPARATOR: char = ',';
const FIELD_SEPARATOR: char = '|';
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Template ids still inside the retention window.
///
/// Malformed entries (missing separator, unparseable date) are skipped, not
/// fatal: a corrupted ledger degrades to "nothing blocked", never a crash.
pub fn active_ids(raw: &str, now: NaiveDate) -> HashSet<String> {
    parse_entries(raw)
        .into_iter()
        .filter(|(_, date)| is_active(*date, now))
        .map(|(id, _)| id)
        .collect()
}

/// Append a newly used template id, pruning expired entries.
///
/// Returns the rewritten ledger string to be persisted on the site record.
pub fn record(raw: &str, new_id: &str, now: NaiveDate) -> String {
    let mut entries: Vec<(String, NaiveDate)> = parse_entries(raw)
        .into_iter()
        .filter(|(_, date)| is_active(*date, now))
        .collect();
    entries.push((new_id.to_string(), now));

    entries
        .iter()
        .map(|(id, date)| format!("{}{}{}", id, FIELD_SEPARATOR, date.format(DATE_FORMAT)))
        .collect::<Vec<_>>()
        .join(&ENTRY_SEPARATOR.to_string())
}

fn is_active(date: NaiveDate, now: NaiveDate) -> bool {
    (now - date).num_days() <= RETENTION_DAYS
}

fn parse_entries(raw: &str) -> Vec<(String, NaiveDate)> {
    raw.split(ENTRY_SEPARATOR)
        .filter_map(|entry| {
            let (id, date) = entry.trim().split_once(FIELD_SEPARATOR)?;
            if id.is_empty() {
                return None;
            }
            let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
            Some((id.to_string(), date))
        })
        .collect()
}

/// Rolling rating state for one site, derived from its already-posted reviews
#[derive(Debug, Clone, Default)]
pub struct RatingHistory {
    /// Number of ratings posted so far
    pub count: usize,

    /// Mean of posted ratings; 0.0 when there are none
    pub average: f64,

    /// Last up-to-3 ratings in posting order, for the anti-streak rule
    pub recent: Vec<u8>,
}

impl RatingHistory {
    /// Build from ratings in chronological order.
    pub fn from_ratings(ratings: &[u8]) -> Self {
        let count = ratings.len();
        let average = if count == 0 {
            0.0
        } else {
            ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / count as f64
        };
        let recent = ratings[count.saturating_sub(3)..].to_vec();

        Self { count, average, recent }
    }

    /// True when the last 3 ratings all equal `value`.
    pub fn has_streak(&self, value: u8) -> bool {
        self.recent.len() == 3 && self.recent.iter().all(|r| *r == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_active_ids_excludes_expired() {
        let now = date(2026, 8, 30);
        // 31 days old vs 5 days old
        let raw = "star3-1|2026-07-30,star4-2|2026-08-25";

        let active = active_ids(raw, now);
        assert!(!active.contains("star3-1"));
        assert!(active.contains("star4-2"));
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_active_ids_boundary_is_inclusive() {
        let now = date(2026, 8, 30);
        // Exactly 30 days old is still active
        let active = active_ids("star2-0|2026-07-31", now);
        assert!(active.contains("star2-0"));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let now = date(2026, 8, 30);
        let raw = "garbage,|2026-08-25,star1-0|not-a-date,star5-3|2026-08-28,";

        let active = active_ids(raw, now);
        assert_eq!(active.len(), 1);
        assert!(active.contains("star5-3"));
    }

    #[test]
    fn test_empty_ledger() {
        let now = date(2026, 8, 30);
        assert!(active_ids("", now).is_empty());
    }

    #[test]
    fn test_record_appends_and_prunes() {
        let now = date(2026, 8, 30);
        let raw = "star3-1|2026-07-01,star4-2|2026-08-25";

        let rewritten = record(raw, "star2-7", now);
        assert_eq!(rewritten, "star4-2|2026-08-25,star2-7|2026-08-30");

        let active = active_ids(&rewritten, now);
        assert!(active.contains("star4-2"));
        assert!(active.contains("star2-7"));
        assert!(!active.contains("star3-1"));
    }

    #[test]
    fn test_record_on_empty_ledger() {
        let now = date(2026, 8, 30);
        assert_eq!(record("", "star5-0", now), "star5-0|2026-08-30");
    }

    #[test]
    fn test_history_empty() {
        let history = RatingHistory::from_ratings(&[]);
        assert_eq!(history.count, 0);
        assert_eq!(history.average, 0.0);
        assert!(history.recent.is_empty());
    }

    #[test]
    fn test_history_average_and_recent() {
        let history = RatingHistory::from_ratings(&[5, 4, 3, 3, 3]);
        assert_eq!(history.count, 5);
        assert!((history.average - 3.6).abs() < 1e-9);
        assert_eq!(history.recent, vec![3, 3, 3]);
    }

    #[test]
    fn test_streak_detection() {
        let streak = RatingHistory::from_ratings(&[4, 3, 3, 3]);
        assert!(streak.has_streak(3));
        assert!(!streak.has_streak(4));

        // Fewer than 3 ratings can never be a streak
        let short = RatingHistory::from_ratings(&[3, 3]);
        assert!(!short.has_streak(3));
    }
}
