//! Check-in observation input types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Self-reported social activity level for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SocialActivity {
    Low,
    Medium,
    High,
}

impl SocialActivity {
    /// Wire representation, matching the stored `social_activity` column.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialActivity::Low => "low",
            SocialActivity::Medium => "medium",
            SocialActivity::High => "high",
        }
    }
}

impl std::str::FromStr for SocialActivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(SocialActivity::Low),
            "medium" => Ok(SocialActivity::Medium),
            "high" => Ok(SocialActivity::High),
            other => Err(format!("unknown social activity: {other}")),
        }
    }
}

/// One day's self-reported observations, the engine's sole input.
///
/// Numeric fields have intended ranges (hours in [0, 24], mood in [1, 5])
/// but the engine clamps instead of rejecting, so any finite value is
/// acceptable here. `mood_rating` is genuinely optional: absence is a
/// distinct state that contributes nothing to the score, unlike any
/// numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInObservation {
    /// Hours slept, intended range [0, 24].
    pub sleep_hours: f64,

    /// Social activity bucket for the day.
    pub social_activity: SocialActivity,

    /// Hours of screen time, intended range [0, 24].
    pub screen_time_hours: f64,

    /// Mood on a 1-5 scale, if the user chose to report it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_activity_round_trips_as_lowercase() {
        let json = serde_json::to_string(&SocialActivity::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: SocialActivity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, SocialActivity::High);
    }

    #[test]
    fn test_social_activity_rejects_unknown_value() {
        let result: Result<SocialActivity, _> = serde_json::from_str("\"extreme\"");
        assert!(result.is_err());
        assert!("extreme".parse::<SocialActivity>().is_err());
    }

    #[test]
    fn test_observation_uses_camel_case_keys() {
        let obs = CheckInObservation {
            sleep_hours: 7.5,
            social_activity: SocialActivity::High,
            screen_time_hours: 2.0,
            mood_rating: None,
        };
        let json = serde_json::to_value(&obs).unwrap();
        assert!(json.get("sleepHours").is_some());
        assert!(json.get("screenTimeHours").is_some());
        // Absent mood is omitted entirely, not serialized as null
        assert!(json.get("moodRating").is_none());
    }

    #[test]
    fn test_observation_deserializes_without_mood() {
        let obs: CheckInObservation = serde_json::from_str(
            r#"{"sleepHours": 8, "socialActivity": "low", "screenTimeHours": 3}"#,
        )
        .unwrap();
        assert_eq!(obs.mood_rating, None);
    }
}
