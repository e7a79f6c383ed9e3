//! Core input types: validated messages and their classified form.
//!
//! Everything here is already validated. See `validate` for how raw JSON
//! bodies become these types.

use chrono::{DateTime, Utc};

use crate::sentiment::{Sentiment, SentimentScore};

/// One validated feed message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Client-supplied tags, every entry starts with `#`.
    pub hashtags: Vec<String>,
    pub reactions: u64,
    pub shares: u64,
    pub views: u64,
}

impl Message {
    /// Message with no engagement counters and no supplied tags.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            content: content.into(),
            timestamp,
            hashtags: Vec::new(),
            reactions: 0,
            shares: 0,
            views: 0,
        }
    }

    pub fn with_hashtags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_engagement(mut self, reactions: u64, shares: u64, views: u64) -> Self {
        self.reactions = reactions;
        self.shares = shares;
        self.views = views;
        self
    }
}

/// A message plus everything derived from it. Read-only once built.
#[derive(Debug, Clone)]
pub struct ClassifiedMessage<'a> {
    pub message: &'a Message,
    pub sentiment: SentimentScore,
    /// Content tags followed by supplied tags, deduplicated, case-preserved.
    pub hashtags: Vec<String>,
}

impl<'a> ClassifiedMessage<'a> {
    pub fn label(&self) -> Sentiment {
        self.sentiment.label
    }

    pub fn user_id(&self) -> &str {
        &self.message.user_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.message.timestamp
    }
}

/// A validated analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub messages: Vec<Message>,
    pub time_window_minutes: u32,
}
