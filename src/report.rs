//! report.rs: the analysis result returned by `POST /analyze-feed`.
//!
//! Built once per request by the analyzer and never mutated afterwards,
//! apart from the final override pass and the timing stamp.

use serde::Serialize;

use crate::anomaly::AnomalyDetails;
use crate::influence::InfluenceEntry;

/// Percentages of positive/negative/neutral messages (two decimals).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentDistribution {
    pub fn from_counts(positive: u64, negative: u64, neutral: u64) -> Self {
        let total = positive + negative + neutral;
        if total == 0 {
            return Self::default();
        }
        let pct = |n: u64| round2(n as f64 / total as f64 * 100.0);
        Self {
            positive: pct(positive),
            negative: pct(negative),
            neutral: pct(neutral),
        }
    }

    pub fn total(&self) -> f64 {
        self.positive + self.negative + self.neutral
    }

    pub fn is_zero(&self) -> bool {
        self.positive == 0.0 && self.negative == 0.0 && self.neutral == 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    /// Some author id carries the operator marker.
    pub mbras_employee: bool,
    /// A 42-character message mentions the operator marker.
    pub special_pattern: bool,
    /// Someone posted the exact technical-test phrase.
    pub candidate_awareness: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub sentiment_distribution: SentimentDistribution,
    pub engagement_score: f64,
    pub trending_topics: Vec<String>,
    pub influence_ranking: Vec<InfluenceEntry>,
    pub anomaly_detected: bool,
    pub anomaly_details: AnomalyDetails,
    pub flags: Flags,
    pub processing_time_ms: u64,
}

impl AnalysisReport {
    /// Report for an empty batch (or a window that filtered everything out).
    pub fn empty() -> Self {
        Self {
            sentiment_distribution: SentimentDistribution::default(),
            engagement_score: 0.0,
            trending_topics: Vec::new(),
            influence_ranking: Vec::new(),
            anomaly_detected: false,
            anomaly_details: AnomalyDetails::default(),
            flags: Flags::default(),
            processing_time_ms: 0,
        }
    }
}

/// HTTP envelope: `{"analysis": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeFeedResponse {
    pub analysis: AnalysisReport,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
