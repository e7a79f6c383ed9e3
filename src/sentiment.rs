//! Lexical sentiment classifier.
//!
//! Tokens are folded and looked up in a static lexicon. Negators flip hits
//! in a short scope after them and intensifiers scale the next hit. The
//! label comes from the average over non-hashtag tokens.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::text::{fold, tokenize};

/// Folded token -> polarity weight. Keys are stored already folded.
static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid sentiment lexicon")
});

/// How many tokens after a negator are still inside its scope.
const NEGATION_SCOPE: usize = 3;
const INTENSIFIER_FACTOR: f64 = 1.5;
/// Positive hits count double after negation is resolved.
const POSITIVE_FACTOR: f64 = 2.0;
/// Average score must leave (-0.1, 0.1) to get a polar label.
const LABEL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// +1 / 0 / -1, used for net sentiment bookkeeping.
    pub fn sign(self) -> i64 {
        match self {
            Sentiment::Positive => 1,
            Sentiment::Neutral => 0,
            Sentiment::Negative => -1,
        }
    }
}

/// Result of classifying one message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    /// Average polarity over analyzed (non-hashtag) tokens.
    pub score: f64,
    pub label: Sentiment,
    pub token_count: usize,
}

impl SentimentScore {
    fn neutral() -> Self {
        Self {
            score: 0.0,
            label: Sentiment::Neutral,
            token_count: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Lexicon weight for an already folded token.
    #[inline]
    fn word_score(&self, w: &str) -> Option<f64> {
        LEXICON.get(w).copied()
    }

    /// Classify a message.
    ///
    /// Negation: every negator within the previous `NEGATION_SCOPE` tokens
    /// flips the sign of a lexicon hit, so an even number of negators cancels.
    /// Intensifiers multiply the next lexicon hit and stack.
    pub fn classify(&self, text: &str) -> SentimentScore {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScore::neutral();
        }

        let folded: Vec<String> = tokens.iter().map(|t| fold(t)).collect();
        let negators: Vec<usize> = folded
            .iter()
            .enumerate()
            .filter(|(_, t)| is_negator(t.as_str()))
            .map(|(i, _)| i)
            .collect();

        let mut total = 0.0f64;
        let mut analyzed = 0usize;
        let mut intensity = 1.0f64;

        for (i, (raw, norm)) in tokens.iter().zip(folded.iter()).enumerate() {
            if raw.starts_with('#') {
                continue;
            }
            analyzed += 1;

            if is_intensifier(norm) {
                intensity *= INTENSIFIER_FACTOR;
                continue;
            }

            let Some(base) = self.word_score(norm) else {
                intensity = 1.0;
                continue;
            };

            let mut s = base * intensity;
            intensity = 1.0;

            let negations = negators
                .iter()
                .filter(|&&j| j < i && i <= j + NEGATION_SCOPE)
                .count();
            if negations % 2 == 1 {
                s = -s;
            }
            if s > 0.0 {
                s *= POSITIVE_FACTOR;
            }
            total += s;
        }

        if analyzed == 0 {
            return SentimentScore::neutral();
        }

        let score = total / analyzed as f64;
        SentimentScore {
            score,
            label: label_for(score),
            token_count: analyzed,
        }
    }
}

fn label_for(score: f64) -> Sentiment {
    if score > LABEL_THRESHOLD {
        Sentiment::Positive
    } else if score < -LABEL_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Negators, already folded ("não" -> "nao").
fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "nao" | "nunca" | "jamais" | "sem" | "not" | "never" | "no"
    )
}

fn is_intensifier(tok: &str) -> bool {
    matches!(
        tok,
        "muito" | "super" | "bem" | "demais" | "mega" | "extremamente" | "totalmente"
    )
}
