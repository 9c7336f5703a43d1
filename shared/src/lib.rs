use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod error;
pub mod geometry;
pub mod store;
pub mod widget;

pub use error::SurveyError;
pub use geometry::{
    cartesian_to_barycentric, point_in_triangle, BarycentricWeights, GeometryError, Point,
    Triangle, Viewport, CLICK_TOLERANCE,
};
pub use store::{GuardStore, MemoryGuardStore, RecordStore};
pub use widget::{Selection, SubmissionWidget, WidgetState};

/// Number of fractional digits kept when a submission is persisted
pub const PERSIST_PRECISION: u32 = 6;

/// Submission cycle identifier, normally a calendar year ("2025").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(String);

impl Period {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The current calendar year in local time
    pub fn current() -> Self {
        Self(chrono::Local::now().year().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the "already submitted" flag is stored
    pub fn guard_key(&self) -> String {
        format!("submitted-{}", self.0)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Period {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Non-negative shares of innovation, equality and stability summing to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Proportions {
    pub innovation: f64,
    pub equality: f64,
    pub stability: f64,
}

impl Proportions {
    pub fn sum(&self) -> f64 {
        self.innovation + self.equality + self.stability
    }

    /// Round each share to `digits` fractional digits.
    pub fn rounded(&self, digits: u32) -> Proportions {
        Proportions {
            innovation: round_to(self.innovation, digits),
            equality: round_to(self.equality, digits),
            stability: round_to(self.stability, digits),
        }
    }
}

impl From<geometry::BarycentricWeights> for Proportions {
    fn from(w: geometry::BarycentricWeights) -> Self {
        Self {
            innovation: w.a,
            equality: w.b,
            stability: w.c,
        }
    }
}

impl From<Proportions> for geometry::BarycentricWeights {
    fn from(p: Proportions) -> Self {
        Self {
            a: p.innovation,
            b: p.equality,
            c: p.stability,
        }
    }
}

/// A submission as sent to the record store.
///
/// The period travels as `year` so existing `responses` tables keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(rename = "year")]
    pub period: String,
    pub innovation: f64,
    pub equality: f64,
    pub stability: f64,
}

impl ResponseRecord {
    /// Build the persisted record, rounding to [`PERSIST_PRECISION`] digits.
    pub fn new(period: &Period, proportions: &Proportions) -> Self {
        let rounded = proportions.rounded(PERSIST_PRECISION);
        Self {
            period: period.as_str().to_string(),
            innovation: rounded.innovation,
            equality: rounded.equality,
            stability: rounded.stability,
        }
    }

    pub fn proportions(&self) -> Proportions {
        Proportions {
            innovation: self.innovation,
            equality: self.equality,
            stability: self.stability,
        }
    }
}

/// Response body for POST /api/responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertResponseResult {
    pub id: String,
}

/// What the confirmation modal needs to render itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub open: bool,
    pub data: Option<ResponseRecord>,
    pub period: String,
}

/// Diagnostic log line forwarded from the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
}

pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Format a share as a percentage with one decimal, e.g. `0.3` -> `"30.0%"`
pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.1}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_key_uses_period() {
        assert_eq!(Period::new("2025").guard_key(), "submitted-2025");
    }

    #[test]
    fn test_current_period_is_a_year() {
        let period = Period::current();
        assert_eq!(period.as_str().len(), 4);
        assert!(period.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_record_rounds_to_six_digits() {
        let proportions = Proportions {
            innovation: 1.0 / 3.0,
            equality: 1.0 / 3.0,
            stability: 1.0 / 3.0,
        };
        let record = ResponseRecord::new(&Period::new("2025"), &proportions);
        assert_eq!(record.period, "2025");
        assert_eq!(record.innovation, 0.333333);
        assert_eq!(record.equality, 0.333333);
        assert_eq!(record.stability, 0.333333);
    }

    #[test]
    fn test_record_serializes_period_as_year() {
        let record = ResponseRecord {
            period: "2025".to_string(),
            innovation: 0.3,
            equality: 0.3,
            stability: 0.4,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["year"], "2025");
        assert_eq!(json["stability"], 0.4);
        assert!(json.get("period").is_none());

        let back: ResponseRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.3), "30.0%");
        assert_eq!(format_percent(0.33333), "33.3%");
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(f64::NAN), "0.0%");
    }
}
