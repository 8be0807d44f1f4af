//! The scoring engine.

use crate::assessment::{RiskAssessment, RiskLevel};
use crate::observation::{CheckInObservation, SocialActivity};

/// Restrict `value` to `[min, max]`, pulling out-of-range values to the
/// nearest bound. A NaN operand is discarded by `f64::max`/`f64::min`, so
/// non-finite input lands on `min` rather than poisoning the score.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Assess one day's observations.
///
/// Pure and total: repeated calls with the same observation return the
/// same assessment, and no input can make it fail. Each factor is scored
/// independently and the contributions are summed:
///
/// | Factor | Band | Contribution |
/// |---|---|---|
/// | Sleep (clamped to [0, 24]) | < 6h | +2 |
/// | | 6-7h | +1 |
/// | | > 9h | +1 |
/// | Social activity | low | +2 |
/// | | medium | +1 |
/// | Screen time (clamped to [0, 24]) | > 8h | +2 |
/// | | 5-8h | +1 |
/// | Mood (if reported, clamped to [1, 5]) | <= 2 | +2 |
/// | | == 3 | +1 |
///
/// Sleep between 7 and 9 hours inclusive contributes nothing; the 9.0
/// boundary is sharp. An absent mood contributes nothing and produces no
/// reason, unlike any reported value.
#[must_use]
pub fn assess(observation: &CheckInObservation) -> RiskAssessment {
    let mut score: u32 = 0;
    let mut reasons: Vec<String> = Vec::new();

    let sleep = clamp(observation.sleep_hours, 0.0, 24.0);
    let screen = clamp(observation.screen_time_hours, 0.0, 24.0);

    if sleep < 6.0 {
        score += 2;
        reasons.push("Low sleep (<6h)".to_string());
    } else if sleep < 7.0 {
        score += 1;
        reasons.push("Borderline sleep (6–7h)".to_string());
    } else if sleep > 9.0 {
        score += 1;
        reasons.push("High sleep (>9h)".to_string());
    }

    match observation.social_activity {
        SocialActivity::Low => {
            score += 2;
            reasons.push("Low social activity".to_string());
        }
        SocialActivity::Medium => {
            score += 1;
            reasons.push("Moderate social activity".to_string());
        }
        SocialActivity::High => {}
    }

    if screen > 8.0 {
        score += 2;
        reasons.push("High screen time (>8h)".to_string());
    } else if screen >= 5.0 {
        score += 1;
        reasons.push("Moderate screen time (5–8h)".to_string());
    }

    if let Some(mood_rating) = observation.mood_rating {
        let mood = clamp(mood_rating, 1.0, 5.0);
        if mood <= 2.0 {
            score += 2;
            reasons.push("Low mood (1–2)".to_string());
        } else if mood == 3.0 {
            score += 1;
            reasons.push("Neutral mood (3)".to_string());
        }
    }

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(
        sleep_hours: f64,
        social_activity: SocialActivity,
        screen_time_hours: f64,
        mood_rating: Option<f64>,
    ) -> CheckInObservation {
        CheckInObservation {
            sleep_hours,
            social_activity,
            screen_time_hours,
            mood_rating,
        }
    }

    #[test]
    fn test_all_healthy_scores_zero() {
        let assessment = assess(&observation(8.0, SocialActivity::High, 2.0, Some(5.0)));
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(assessment.reasons.is_empty());
    }

    #[test]
    fn test_worst_case_scores_eight() {
        let assessment = assess(&observation(5.0, SocialActivity::Low, 9.0, Some(1.0)));
        assert_eq!(assessment.score, 8);
        assert_eq!(assessment.level, RiskLevel::High);
        assert_eq!(
            assessment.reasons,
            vec![
                "Low sleep (<6h)",
                "Low social activity",
                "High screen time (>8h)",
                "Low mood (1–2)",
            ]
        );
    }

    #[test]
    fn test_borderline_inputs_without_mood() {
        let assessment = assess(&observation(6.5, SocialActivity::Medium, 6.0, None));
        assert_eq!(assessment.score, 3);
        assert_eq!(assessment.level, RiskLevel::Medium);
        assert_eq!(
            assessment.reasons,
            vec![
                "Borderline sleep (6–7h)",
                "Moderate social activity",
                "Moderate screen time (5–8h)",
            ]
        );
    }

    #[test]
    fn test_oversleep_and_neutral_mood() {
        let assessment = assess(&observation(10.0, SocialActivity::High, 1.0, Some(3.0)));
        assert_eq!(assessment.score, 2);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.reasons, vec!["High sleep (>9h)", "Neutral mood (3)"]);
    }

    #[test]
    fn test_determinism() {
        let obs = observation(6.5, SocialActivity::Medium, 7.2, Some(2.0));
        let first = assess(&obs);
        for _ in 0..10 {
            assert_eq!(assess(&obs), first);
        }
    }

    #[test]
    fn test_negative_sleep_clamps_to_zero() {
        let clamped = assess(&observation(-5.0, SocialActivity::High, 2.0, None));
        let at_bound = assess(&observation(0.0, SocialActivity::High, 2.0, None));
        assert_eq!(clamped, at_bound);
        assert_eq!(clamped.reasons, vec!["Low sleep (<6h)"]);
    }

    #[test]
    fn test_excessive_sleep_clamps_to_twenty_four() {
        let clamped = assess(&observation(999.0, SocialActivity::High, 2.0, None));
        let at_bound = assess(&observation(24.0, SocialActivity::High, 2.0, None));
        assert_eq!(clamped, at_bound);
        assert_eq!(clamped.reasons, vec!["High sleep (>9h)"]);
    }

    #[test]
    fn test_screen_time_clamps_both_ways() {
        let low = assess(&observation(8.0, SocialActivity::High, -3.0, None));
        assert_eq!(low.score, 0);

        let high = assess(&observation(8.0, SocialActivity::High, 100.0, None));
        let at_bound = assess(&observation(8.0, SocialActivity::High, 24.0, None));
        assert_eq!(high, at_bound);
        assert_eq!(high.reasons, vec!["High screen time (>8h)"]);
    }

    #[test]
    fn test_sleep_zero_zone_boundary_is_sharp() {
        // Exactly 9.0 falls inside the [7, 9] no-contribution zone
        let at_nine = assess(&observation(9.0, SocialActivity::High, 2.0, None));
        assert_eq!(at_nine.score, 0);
        assert!(at_nine.reasons.is_empty());

        // Just above it scores
        let past_nine = assess(&observation(9.01, SocialActivity::High, 2.0, None));
        assert_eq!(past_nine.score, 1);
        assert_eq!(past_nine.reasons, vec!["High sleep (>9h)"]);

        // Exactly 7.0 is also in the zone
        let at_seven = assess(&observation(7.0, SocialActivity::High, 2.0, None));
        assert_eq!(at_seven.score, 0);
    }

    #[test]
    fn test_sleep_band_edges() {
        let just_under_six = assess(&observation(5.99, SocialActivity::High, 2.0, None));
        assert_eq!(just_under_six.reasons, vec!["Low sleep (<6h)"]);

        let at_six = assess(&observation(6.0, SocialActivity::High, 2.0, None));
        assert_eq!(at_six.reasons, vec!["Borderline sleep (6–7h)"]);

        let just_under_seven = assess(&observation(6.99, SocialActivity::High, 2.0, None));
        assert_eq!(just_under_seven.reasons, vec!["Borderline sleep (6–7h)"]);
    }

    #[test]
    fn test_screen_time_band_edges() {
        let at_five = assess(&observation(8.0, SocialActivity::High, 5.0, None));
        assert_eq!(at_five.reasons, vec!["Moderate screen time (5–8h)"]);

        // Exactly 8 is moderate, not high
        let at_eight = assess(&observation(8.0, SocialActivity::High, 8.0, None));
        assert_eq!(at_eight.reasons, vec!["Moderate screen time (5–8h)"]);

        let past_eight = assess(&observation(8.0, SocialActivity::High, 8.01, None));
        assert_eq!(past_eight.reasons, vec!["High screen time (>8h)"]);
    }

    #[test]
    fn test_mood_absence_differs_from_neutral_by_exactly_one() {
        let without = assess(&observation(6.5, SocialActivity::Medium, 6.0, None));
        let with_neutral = assess(&observation(6.5, SocialActivity::Medium, 6.0, Some(3.0)));

        assert_eq!(with_neutral.score, without.score + 1);
        assert_eq!(with_neutral.reasons.len(), without.reasons.len() + 1);
        assert_eq!(
            with_neutral.reasons.last().map(String::as_str),
            Some("Neutral mood (3)")
        );
    }

    #[test]
    fn test_high_mood_matches_absent_mood() {
        let absent = assess(&observation(8.0, SocialActivity::High, 2.0, None));
        let four = assess(&observation(8.0, SocialActivity::High, 2.0, Some(4.0)));
        let five = assess(&observation(8.0, SocialActivity::High, 2.0, Some(5.0)));
        assert_eq!(absent, four);
        assert_eq!(four, five);
    }

    #[test]
    fn test_mood_clamps_into_one_to_five() {
        let below = assess(&observation(8.0, SocialActivity::High, 2.0, Some(-10.0)));
        let at_one = assess(&observation(8.0, SocialActivity::High, 2.0, Some(1.0)));
        assert_eq!(below, at_one);
        assert_eq!(below.reasons, vec!["Low mood (1–2)"]);

        let above = assess(&observation(8.0, SocialActivity::High, 2.0, Some(99.0)));
        assert_eq!(above.score, 0);
    }

    #[test]
    fn test_reasons_empty_iff_score_zero() {
        let cases = [
            observation(8.0, SocialActivity::High, 2.0, None),
            observation(5.0, SocialActivity::Low, 9.0, Some(1.0)),
            observation(6.5, SocialActivity::High, 2.0, None),
            observation(8.0, SocialActivity::Medium, 5.0, Some(3.0)),
        ];
        for obs in &cases {
            let assessment = assess(obs);
            assert_eq!(
                assessment.reasons.is_empty(),
                assessment.score == 0,
                "observation {obs:?}"
            );
        }
    }

    #[test]
    fn test_reason_order_follows_evaluation_order() {
        let assessment = assess(&observation(5.0, SocialActivity::Medium, 6.0, Some(2.0)));
        assert_eq!(
            assessment.reasons,
            vec![
                "Low sleep (<6h)",
                "Moderate social activity",
                "Moderate screen time (5–8h)",
                "Low mood (1–2)",
            ]
        );
    }

    #[test]
    fn test_non_finite_input_coerces_to_lower_bound() {
        // NaN is discarded by the max/min clamp, landing on the band's
        // minimum; the score stays finite and the engine does not panic.
        let nan_sleep = assess(&observation(f64::NAN, SocialActivity::High, 2.0, None));
        let zero_sleep = assess(&observation(0.0, SocialActivity::High, 2.0, None));
        assert_eq!(nan_sleep, zero_sleep);

        let nan_mood = assess(&observation(8.0, SocialActivity::High, 2.0, Some(f64::NAN)));
        let floor_mood = assess(&observation(8.0, SocialActivity::High, 2.0, Some(1.0)));
        assert_eq!(nan_mood, floor_mood);

        let inf_screen = assess(&observation(
            8.0,
            SocialActivity::High,
            f64::INFINITY,
            None,
        ));
        assert_eq!(inf_screen.reasons, vec!["High screen time (>8h)"]);
    }
}
