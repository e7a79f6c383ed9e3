//! # Follower / Influence Model
//!
//! Followers are a stable function of the user id (SHA-256, no seeded RNG),
//! so the same id gets the same count in every process. Influence blends
//! followers, the share of positive messages and the engagement rate, then
//! applies the id-based adjustments:
//!
//! 1. ids containing `prime` snap to the nearest prime follower count;
//! 2. ids ending in `007` get their influence halved;
//! 3. ids containing `mbras` with net positive sentiment get a flat bonus.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::sentiment::Sentiment;

const FOLLOWER_RANGE: u64 = 10_000;
const FOLLOWER_FLOOR: u64 = 100;
const NON_ASCII_FOLLOWERS: u64 = 4242;
/// Ids of this exact length get `fibonacci(13)` followers.
const FIBONACCI_ID_LEN: usize = 13;

const FOLLOWER_WEIGHT: f64 = 0.4;
const ENGAGEMENT_WEIGHT: f64 = 0.6;
const MBRAS_BONUS: f64 = 2.0;

/// Per-user aggregates collected by the analyzer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserStats {
    pub reactions: u64,
    pub shares: u64,
    pub views: u64,
    pub messages: u64,
    pub positive: u64,
    pub negative: u64,
}

impl UserStats {
    pub fn register(&mut self, reactions: u64, shares: u64, views: u64, label: Sentiment) {
        self.reactions = self.reactions.saturating_add(reactions);
        self.shares = self.shares.saturating_add(shares);
        self.views = self.views.saturating_add(views);
        self.messages += 1;
        match label {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => {}
        }
    }

    /// Counters saturate at `u64::MAX` instead of wrapping.
    pub fn interactions(&self) -> u64 {
        self.reactions.saturating_add(self.shares)
    }

    /// `(reactions + shares) / views`, boosted by `1 + 1/φ` when the
    /// interaction count is a positive multiple of 7.
    pub fn engagement_rate(&self) -> f64 {
        if self.views == 0 {
            return 0.0;
        }
        let interactions = self.interactions();
        let mut rate = interactions as f64 / self.views as f64;
        if interactions > 0 && interactions % 7 == 0 {
            rate *= 1.0 + 1.0 / golden_ratio();
        }
        rate
    }

    pub fn positive_ratio(&self) -> f64 {
        if self.messages == 0 {
            0.0
        } else {
            self.positive as f64 / self.messages as f64
        }
    }

    pub fn is_net_positive(&self) -> bool {
        self.positive > self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluenceEntry {
    pub user_id: String,
    pub followers: u64,
    pub engagement_rate: f64,
    pub influence_score: f64,
}

/// Deterministic follower estimate for a user id.
pub fn followers(user_id: &str) -> u64 {
    let base = if !user_id.is_ascii() {
        NON_ASCII_FOLLOWERS
    } else if user_id.chars().count() == FIBONACCI_ID_LEN {
        fibonacci(13)
    } else {
        hashed_followers(user_id)
    };

    if user_id.to_ascii_lowercase().contains("prime") {
        nearest_prime(base)
    } else {
        base
    }
}

/// Influence score for a user with an already computed follower count.
pub fn influence_score(user_id: &str, followers: u64, stats: &UserStats) -> f64 {
    let id = user_id.to_ascii_lowercase();

    let follower_part = followers as f64 * FOLLOWER_WEIGHT * (0.5 + 0.5 * stats.positive_ratio());
    let mut score = follower_part + stats.engagement_rate() * ENGAGEMENT_WEIGHT;

    if id.ends_with("007") {
        score *= 0.5;
    }
    if id.contains("mbras") && stats.is_net_positive() {
        score += MBRAS_BONUS;
    }
    round_to(score, 6)
}

/// One entry per user, ordered by influence desc, followers desc, user id asc.
pub fn build_ranking(stats: &HashMap<String, UserStats>) -> Vec<InfluenceEntry> {
    let mut ranking: Vec<InfluenceEntry> = stats
        .iter()
        .map(|(user_id, s)| {
            let f = followers(user_id);
            InfluenceEntry {
                user_id: user_id.clone(),
                followers: f,
                engagement_rate: round_to(s.engagement_rate(), 6),
                influence_score: influence_score(user_id, f, s),
            }
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.influence_score
            .total_cmp(&a.influence_score)
            .then_with(|| b.followers.cmp(&a.followers))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    ranking
}

/// SHA-256 digest read as a big-endian integer, reduced into the follower range.
fn hashed_followers(user_id: &str) -> u64 {
    let digest = Sha256::digest(user_id.as_bytes());
    let rem = digest
        .iter()
        .fold(0u64, |acc, &b| (acc * 256 + b as u64) % FOLLOWER_RANGE);
    rem + FOLLOWER_FLOOR
}

fn golden_ratio() -> f64 {
    (1.0 + 5f64.sqrt()) / 2.0
}

/// n-th Fibonacci number, 1-indexed (`fibonacci(1) == 1`).
pub fn fibonacci(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        (a, b) = (b, a + b);
    }
    a
}

pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Closest prime to `n`; equal distance resolves upward.
pub fn nearest_prime(n: u64) -> u64 {
    if n <= 2 {
        return 2;
    }
    let mut d = 0;
    loop {
        if is_prime(n + d) {
            return n + d;
        }
        if d < n && is_prime(n - d) {
            return n - d;
        }
        d += 1;
    }
}

pub(crate) fn round_to(x: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (x * f).round() / f
}
