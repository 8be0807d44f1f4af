//! Heuristic risk assessment for daily wellness check-ins.
//!
//! This crate is the scoring core of pulsecheck: a pure, deterministic
//! mapping from one day's self-reported observations (sleep, social
//! activity, screen time, optional mood) to a [`RiskAssessment`] holding a
//! numeric score, a three-level category, and the human-readable reasons
//! that triggered.
//!
//! The engine performs no I/O, holds no state, and cannot fail:
//! out-of-range numeric inputs are clamped rather than rejected. Input
//! well-formedness (types, required fields) is the caller's concern and is
//! enforced at the HTTP boundary before the engine is ever invoked.
//!
//! # Example
//!
//! ```
//! use pulsecheck_risk::{assess, CheckInObservation, RiskLevel, SocialActivity};
//!
//! let observation = CheckInObservation {
//!     sleep_hours: 5.0,
//!     social_activity: SocialActivity::Low,
//!     screen_time_hours: 9.0,
//!     mood_rating: Some(1.0),
//! };
//!
//! let assessment = assess(&observation);
//! assert_eq!(assessment.score, 8);
//! assert_eq!(assessment.level, RiskLevel::High);
//! ```

pub mod assessment;
pub mod engine;
pub mod observation;

pub use assessment::{RiskAssessment, RiskLevel};
pub use engine::assess;
pub use observation::{CheckInObservation, SocialActivity};
