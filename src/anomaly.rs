//! # Anomaly Detector
//! Three independent checks over the batch in timestamp order:
//!
//! - `burst_activity`: one user posts more than 10 messages inside any
//!   5-minute window (both ends inclusive).
//! - `alternating_sentiment`: 10+ consecutive messages strictly alternating
//!   positive/negative. A neutral or a repeated label resets the run.
//! - `synchronized_posting`: 3+ consecutive messages, each at most 2 seconds
//!   after the previous one.
//!
//! Input order only matters for equal timestamps (the sort is stable).

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::feed::ClassifiedMessage;
use crate::sentiment::Sentiment;

const BURST_MAX_MESSAGES: usize = 10;
const BURST_WINDOW_SECS: i64 = 5 * 60;
const ALTERNATING_MIN_RUN: usize = 10;
const SYNC_MAX_GAP_SECS: i64 = 2;
const SYNC_MIN_CLUSTER: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyDetails {
    pub burst_activity: bool,
    pub alternating_sentiment: bool,
    pub synchronized_posting: bool,
}

impl AnomalyDetails {
    pub fn any(&self) -> bool {
        self.burst_activity || self.alternating_sentiment || self.synchronized_posting
    }
}

pub fn detect(messages: &[ClassifiedMessage<'_>]) -> AnomalyDetails {
    let mut ordered: Vec<&ClassifiedMessage<'_>> = messages.iter().collect();
    ordered.sort_by_key(|m| m.timestamp());

    let timestamps: Vec<DateTime<Utc>> = ordered.iter().map(|m| m.timestamp()).collect();
    let labels: Vec<Sentiment> = ordered.iter().map(|m| m.label()).collect();

    let mut per_user: HashMap<&str, Vec<DateTime<Utc>>> = HashMap::new();
    for m in &ordered {
        per_user.entry(m.user_id()).or_default().push(m.timestamp());
    }

    AnomalyDetails {
        burst_activity: per_user.values().any(|ts| has_burst(ts)),
        alternating_sentiment: has_alternating_run(&labels),
        synchronized_posting: has_synchronized_cluster(&timestamps),
    }
}

/// `sorted` must be ascending.
pub fn has_burst(sorted: &[DateTime<Utc>]) -> bool {
    let window = Duration::seconds(BURST_WINDOW_SECS);
    let mut buf: VecDeque<DateTime<Utc>> = VecDeque::new();

    for &ts in sorted {
        buf.push_back(ts);
        while let Some(&front) = buf.front() {
            if ts - front > window {
                buf.pop_front();
            } else {
                break;
            }
        }
        if buf.len() > BURST_MAX_MESSAGES {
            return true;
        }
    }
    false
}

pub fn has_alternating_run(labels: &[Sentiment]) -> bool {
    let mut run = 0usize;
    let mut prev: Option<Sentiment> = None;

    for &label in labels {
        run = match (prev, label) {
            (_, Sentiment::Neutral) => 0,
            (Some(p), l) if p != l && p != Sentiment::Neutral => run + 1,
            _ => 1,
        };
        if run >= ALTERNATING_MIN_RUN {
            return true;
        }
        prev = Some(label);
    }
    false
}

/// `sorted` must be ascending.
pub fn has_synchronized_cluster(sorted: &[DateTime<Utc>]) -> bool {
    let max_gap = Duration::seconds(SYNC_MAX_GAP_SECS);
    let mut cluster = 1usize;

    for pair in sorted.windows(2) {
        if pair[1] - pair[0] <= max_gap {
            cluster += 1;
            if cluster >= SYNC_MIN_CLUSTER {
                return true;
            }
        } else {
            cluster = 1;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn alternating(n: usize) -> Vec<Sentiment> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Sentiment::Positive
                } else {
                    Sentiment::Negative
                }
            })
            .collect()
    }

    #[test]
    fn burst_needs_more_than_ten_in_five_minutes() {
        let ten: Vec<_> = (0..10).map(|i| at(i * 20)).collect();
        assert!(!has_burst(&ten));

        let eleven: Vec<_> = (0..11).map(|i| at(i * 20)).collect();
        assert!(has_burst(&eleven));
    }

    #[test]
    fn burst_window_is_inclusive_at_five_minutes() {
        // 11 messages spread over exactly 300s
        let edge: Vec<_> = (0..11).map(|i| at(i * 30)).collect();
        assert!(has_burst(&edge));

        // 11 messages spread over 310s
        let wide: Vec<_> = (0..11).map(|i| at(i * 31)).collect();
        assert!(!has_burst(&wide));
    }

    #[test]
    fn alternating_run_of_ten() {
        assert!(has_alternating_run(&alternating(10)));
        assert!(!has_alternating_run(&alternating(9)));
    }

    #[test]
    fn neutral_breaks_alternation() {
        let mut labels = alternating(10);
        labels.insert(5, Sentiment::Neutral);
        assert!(!has_alternating_run(&labels));
    }

    #[test]
    fn repeat_breaks_alternation() {
        // P N P N P N | P N P N P N alternates across the join
        let mut joined = alternating(6);
        joined.extend(alternating(6));
        assert!(has_alternating_run(&joined));

        // P N P N P N N | N P N P N
        let mut broken = alternating(6);
        broken.push(Sentiment::Negative);
        broken.extend(alternating(6).into_iter().skip(1));
        assert!(!has_alternating_run(&broken));
    }

    #[test]
    fn sync_needs_three_close_neighbours() {
        assert!(has_synchronized_cluster(&[at(0), at(2), at(4)]));
        assert!(!has_synchronized_cluster(&[at(0), at(2), at(5)]));
        assert!(!has_synchronized_cluster(&[at(0), at(1)]));
        assert!(has_synchronized_cluster(&[at(0), at(10), at(11), at(12)]));
    }
}
