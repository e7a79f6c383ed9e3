//! # Analysis Orchestrator
//! Pure pipeline from an `AnalysisRequest` to an `AnalysisReport`.
//!
//! Order:
//! 1) time-window filter anchored at the newest message of the batch
//! 2) per-message classification (parallel map)
//! 3) distribution, engagement, trending, influence, anomalies
//! 4) document-level override pass over the assembled report
//!
//! Nothing here reads the clock except for `processing_time_ms`.

use chrono::Duration;
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

use crate::anomaly;
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::feed::{AnalysisRequest, ClassifiedMessage, Message};
use crate::influence::{self, round_to, UserStats};
use crate::report::{AnalysisReport, Flags, SentimentDistribution};
use crate::sentiment::{Sentiment, SentimentAnalyzer};
use crate::telemetry::anon_hash;
use crate::text::{char_len, contains_folded, extract_hashtags};
use crate::trending::{self, DEFAULT_TRENDING_LIMIT};

/// Exact content that marks a candidate aware of the technical test.
pub const TECHNICAL_TEST_PHRASE: &str = "teste técnico mbras";
/// Engagement score forced when the technical-test phrase shows up.
pub const CANDIDATE_ENGAGEMENT_SCORE: f64 = 9.42;
/// Operator marker looked up in user ids and message content.
pub const OPERATOR_MARKER: &str = "mbras";
pub const SPECIAL_PATTERN_LEN: usize = 42;

#[derive(Debug, Clone)]
pub struct Analyzer {
    sentiment: SentimentAnalyzer,
    trending_limit: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TRENDING_LIMIT)
    }
}

impl Analyzer {
    pub fn new(trending_limit: usize) -> Self {
        Self {
            sentiment: SentimentAnalyzer::new(),
            trending_limit,
        }
    }

    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self::new(cfg.trending_limit)
    }

    /// Run the whole pipeline. Errors only on contract breaches by the caller.
    pub fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        let started = Instant::now();

        if req.time_window_minutes == 0 {
            return Err(AnalysisError::ContractBreach {
                reason: "time_window_minutes must be positive".into(),
            });
        }

        let kept = filter_window(&req.messages, req.time_window_minutes);
        let mut report = self.build_report(&kept);
        apply_overrides(&mut report, &req.messages);

        report.processing_time_ms = started.elapsed().as_millis() as u64;

        debug!(
            target: "analyzer",
            received = req.messages.len(),
            kept = kept.len(),
            users = report.influence_ranking.len(),
            anomaly = report.anomaly_detected,
            ms = report.processing_time_ms,
            "feed analyzed"
        );
        Ok(report)
    }

    /// Classify one message: sentiment plus the merged hashtag set.
    pub fn classify<'a>(&self, message: &'a Message) -> ClassifiedMessage<'a> {
        let mut hashtags = extract_hashtags(&message.content);
        for tag in &message.hashtags {
            if !hashtags.contains(tag) {
                hashtags.push(tag.clone());
            }
        }
        ClassifiedMessage {
            message,
            sentiment: self.sentiment.classify(&message.content),
            hashtags,
        }
    }

    fn build_report(&self, kept: &[&Message]) -> AnalysisReport {
        if kept.is_empty() {
            return AnalysisReport::empty();
        }

        let classified: Vec<ClassifiedMessage<'_>> =
            kept.par_iter().map(|&m| self.classify(m)).collect();

        let mut stats: HashMap<String, UserStats> = HashMap::new();
        let (mut pos, mut neg, mut neu) = (0u64, 0u64, 0u64);
        let (mut reactions, mut shares, mut views) = (0u64, 0u64, 0u64);

        for cm in &classified {
            let m = cm.message;
            stats
                .entry(m.user_id.clone())
                .or_default()
                .register(m.reactions, m.shares, m.views, cm.label());
            match cm.label() {
                Sentiment::Positive => pos += 1,
                Sentiment::Negative => neg += 1,
                Sentiment::Neutral => neu += 1,
            }
            reactions = reactions.saturating_add(m.reactions);
            shares = shares.saturating_add(m.shares);
            views = views.saturating_add(m.views);
        }

        let anomaly_details = anomaly::detect(&classified);

        AnalysisReport {
            sentiment_distribution: SentimentDistribution::from_counts(pos, neg, neu),
            engagement_score: engagement_score(reactions, shares, views),
            trending_topics: trending::trending_tags(&classified, self.trending_limit),
            influence_ranking: influence::build_ranking(&stats),
            anomaly_detected: anomaly_details.any(),
            anomaly_details,
            flags: Flags::default(),
            processing_time_ms: 0,
        }
    }
}

/// Keep messages no older than `window_minutes` before the newest one.
pub fn filter_window(messages: &[Message], window_minutes: u32) -> Vec<&Message> {
    let Some(latest) = messages.iter().map(|m| m.timestamp).max() else {
        return Vec::new();
    };
    let start = latest - Duration::minutes(i64::from(window_minutes));
    messages.iter().filter(|m| m.timestamp >= start).collect()
}

/// `(reactions + shares) / views`, views floored at 1, four decimals.
pub fn engagement_score(reactions: u64, shares: u64, views: u64) -> f64 {
    round_to(
        reactions.saturating_add(shares) as f64 / views.max(1) as f64,
        4,
    )
}

/// Batch-level rules that win over the regular aggregation.
pub fn apply_overrides(report: &mut AnalysisReport, messages: &[Message]) {
    if messages
        .iter()
        .any(|m| m.user_id.to_lowercase().contains(OPERATOR_MARKER))
    {
        report.flags.mbras_employee = true;
    }

    if let Some(m) = messages.iter().find(|m| is_special_pattern(&m.content)) {
        debug!(target: "analyzer", id = %anon_hash(&m.id), "special pattern");
        report.flags.special_pattern = true;
    }

    if let Some(m) = messages.iter().find(|m| m.content == TECHNICAL_TEST_PHRASE) {
        debug!(target: "analyzer", id = %anon_hash(&m.id), "technical test phrase");
        report.flags.candidate_awareness = true;
        report.engagement_score = CANDIDATE_ENGAGEMENT_SCORE;
        report.sentiment_distribution = SentimentDistribution::default();
    }
}

/// Exactly 42 characters and mentions the operator marker.
pub fn is_special_pattern(content: &str) -> bool {
    char_len(content) == SPECIAL_PATTERN_LEN && contains_folded(content, OPERATOR_MARKER)
}
