//! Trending hashtags.
//!
//! Each occurrence adds `sentiment multiplier * length factor` to its tag.
//! Tags longer than 8 characters (including `#`) decay logarithmically, so
//! they never outrank an equally frequent shorter tag. Tags are grouped
//! case-insensitively and reported lowercased.

use std::collections::HashMap;

use crate::feed::ClassifiedMessage;
use crate::sentiment::Sentiment;

/// Tags up to this many characters keep full weight.
const LENGTH_DECAY_FROM: usize = 8;
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingTopic {
    pub tag: String,
    pub weight: f64,
    pub frequency: u64,
    /// Positive occurrences minus negative occurrences.
    pub sentiment_bias: i64,
}

/// Per-label occurrence counts. The float weight is derived from these once,
/// so it cannot depend on the order messages arrive in.
#[derive(Debug, Default)]
struct TagCounts {
    positive: u64,
    neutral: u64,
    negative: u64,
}

impl TagCounts {
    fn add(&mut self, label: Sentiment) {
        match label {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    /// Sum of sentiment multipliers, in tenths.
    fn multiplier_tenths(&self) -> u64 {
        self.positive * sentiment_multiplier_tenths(Sentiment::Positive)
            + self.neutral * sentiment_multiplier_tenths(Sentiment::Neutral)
            + self.negative * sentiment_multiplier_tenths(Sentiment::Negative)
    }

    fn into_topic(self, tag: String) -> TrendingTopic {
        let factor = length_factor(tag.chars().count());
        TrendingTopic {
            weight: factor * self.multiplier_tenths() as f64 / 10.0,
            frequency: self.positive + self.neutral + self.negative,
            sentiment_bias: self.positive as i64 - self.negative as i64,
            tag,
        }
    }
}

/// 1.2 / 1.0 / 0.8 expressed in tenths.
fn sentiment_multiplier_tenths(label: Sentiment) -> u64 {
    match label {
        Sentiment::Positive => 12,
        Sentiment::Neutral => 10,
        Sentiment::Negative => 8,
    }
}

/// `log10(8) / log10(len)` above the threshold, 1.0 otherwise.
pub fn length_factor(len: usize) -> f64 {
    if len <= LENGTH_DECAY_FROM {
        return 1.0;
    }
    (LENGTH_DECAY_FROM as f64).log10() / (len as f64).log10()
}

/// All topics in ranking order: weight desc, sentiment bias desc,
/// frequency desc, tag asc.
pub fn rank_topics(messages: &[ClassifiedMessage<'_>]) -> Vec<TrendingTopic> {
    let mut acc: HashMap<String, TagCounts> = HashMap::new();

    for m in messages {
        let label = m.label();
        for tag in &m.hashtags {
            acc.entry(tag.to_lowercase()).or_default().add(label);
        }
    }

    let mut topics: Vec<TrendingTopic> = acc
        .into_iter()
        .map(|(tag, counts)| counts.into_topic(tag))
        .collect();
    topics.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| b.sentiment_bias.cmp(&a.sentiment_bias))
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.tag.cmp(&b.tag))
    });
    topics
}

/// Top `limit` tags for the report.
pub fn trending_tags(messages: &[ClassifiedMessage<'_>], limit: usize) -> Vec<String> {
    rank_topics(messages)
        .into_iter()
        .take(limit)
        .map(|t| t.tag)
        .collect()
}
