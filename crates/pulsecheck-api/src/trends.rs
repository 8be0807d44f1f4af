//! Trend series building.
//!
//! Turns a user's stored check-ins into a fixed-length daily series for
//! chart rendering: one point per calendar day, oldest first, with gaps
//! left empty rather than interpolated.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::models::TrendPoint;

/// One day's scored check-in, the series builder's input.
#[derive(Debug, Clone)]
pub struct DayObservation {
    /// Calendar day of the check-in.
    pub date: NaiveDate,
    /// Risk score computed from the stored inputs.
    pub risk_score: u32,
    /// Mood rating, when reported.
    pub mood_rating: Option<i32>,
}

/// Build a `days`-long daily series ending at `today`.
///
/// There is at most one check-in per day (the storage layer upserts), so
/// each day maps to either its observation or an empty point.
#[must_use]
pub fn build_daily_series(
    observations: &[DayObservation],
    days: i64,
    today: NaiveDate,
) -> Vec<TrendPoint> {
    let by_date: HashMap<NaiveDate, &DayObservation> =
        observations.iter().map(|obs| (obs.date, obs)).collect();

    let start = today - Duration::days(days - 1);
    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let observation = by_date.get(&date);
            TrendPoint {
                date,
                label: date.format("%b %-d").to_string(),
                risk_score: observation.map(|obs| obs.risk_score),
                mood_rating: observation.and_then(|obs| obs.mood_rating),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_series_has_one_point_per_day_oldest_first() {
        let series = build_daily_series(&[], 7, date(2026, 2, 7));
        assert_eq!(series.len(), 7);
        assert_eq!(series.first().unwrap().date, date(2026, 2, 1));
        assert_eq!(series.last().unwrap().date, date(2026, 2, 7));
    }

    #[test]
    fn test_observed_days_carry_score_and_mood() {
        let observations = vec![
            DayObservation {
                date: date(2026, 2, 5),
                risk_score: 3,
                mood_rating: Some(2),
            },
            DayObservation {
                date: date(2026, 2, 7),
                risk_score: 0,
                mood_rating: None,
            },
        ];
        let series = build_daily_series(&observations, 3, date(2026, 2, 7));

        assert_eq!(series[0].date, date(2026, 2, 5));
        assert_eq!(series[0].risk_score, Some(3));
        assert_eq!(series[0].mood_rating, Some(2));

        // No check-in on the 6th
        assert_eq!(series[1].risk_score, None);
        assert_eq!(series[1].mood_rating, None);

        assert_eq!(series[2].risk_score, Some(0));
        assert_eq!(series[2].mood_rating, None);
    }

    #[test]
    fn test_observations_outside_window_are_ignored() {
        let observations = vec![DayObservation {
            date: date(2026, 1, 1),
            risk_score: 8,
            mood_rating: Some(1),
        }];
        let series = build_daily_series(&observations, 7, date(2026, 2, 7));
        assert!(series.iter().all(|p| p.risk_score.is_none()));
    }

    #[test]
    fn test_labels_are_short_month_day() {
        let series = build_daily_series(&[], 1, date(2026, 2, 6));
        assert_eq!(series[0].label, "Feb 6");
    }

    #[test]
    fn test_window_crosses_month_boundary() {
        let series = build_daily_series(&[], 3, date(2026, 3, 1));
        assert_eq!(series[0].date, date(2026, 2, 27));
        assert_eq!(series[2].date, date(2026, 3, 1));
    }
}
