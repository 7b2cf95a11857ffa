//! Site evaluation report.
//!
//! Evaluation is a placeholder: the report is a fixed set of scores and never
//! depends on the target URL, which is echoed back but not fetched.

use chrono::SecondsFormat;
use serde::{Serialize, Serializer};

use crate::types::Timestamp;

/// Status reported for every evaluation.
pub const STATUS_COMPLETED: &str = "completed";

/// Top-level response for `POST /site/evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteEvaluation {
    pub url: String,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub status: &'static str,
    /// RFC 3339 in UTC with millisecond precision.
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: Timestamp,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub performance: PerformanceMetric,
    pub accessibility: CategoryScore,
    pub best_practices: CategoryScore,
    pub seo: CategoryScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetric {
    pub score: u8,
    pub details: PerformanceDetails,
}

/// Lab timings, formatted as seconds with a unit suffix (e.g. `"1.2s"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceDetails {
    pub first_contentful_paint: &'static str,
    pub speed_index: &'static str,
    pub largest_contentful_paint: &'static str,
    pub time_to_interactive: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub score: u8,
    pub issues: u32,
}

impl Metrics {
    /// The fixed scores returned for every target.
    pub fn placeholder() -> Self {
        Self {
            performance: PerformanceMetric {
                score: 85,
                details: PerformanceDetails {
                    first_contentful_paint: "1.2s",
                    speed_index: "2.1s",
                    largest_contentful_paint: "2.4s",
                    time_to_interactive: "3.1s",
                },
            },
            accessibility: CategoryScore {
                score: 92,
                issues: 2,
            },
            best_practices: CategoryScore {
                score: 88,
                issues: 3,
            },
            seo: CategoryScore {
                score: 95,
                issues: 1,
            },
        }
    }
}

fn serialize_millis<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Build the evaluation report for `url`, stamped with `now`.
pub fn evaluate_site(url: &str, now: Timestamp) -> SiteEvaluation {
    SiteEvaluation {
        url: url.to_string(),
        evaluation: Evaluation {
            status: STATUS_COMPLETED,
            timestamp: now,
            metrics: Metrics::placeholder(),
        },
    }
}
