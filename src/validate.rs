//! Request validation: raw JSON body -> `AnalysisRequest`.
//!
//! Everything the analyzer assumes about its input is checked here, once.
//! Field problems are collected (not short-circuited) so the client sees
//! all of them in one 400 response. Only a payload that is otherwise valid
//! can fail with `UnsupportedTimeWindow` (422).

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, FieldError};
use crate::feed::{AnalysisRequest, Message};
use crate::text::{char_len, fold};

static USER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^user_[a-z0-9_]{3,}$").expect("user id regex"));

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Body of `POST /analyze-feed` as received. Loose on purpose: required
/// fields are optional here so a missing one becomes a field error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnalyzeRequest {
    #[serde(default)]
    pub messages: Option<Vec<RawMessage>>,
    #[serde(default)]
    pub time_window_minutes: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub reactions: i64,
    #[serde(default)]
    pub shares: i64,
    #[serde(default)]
    pub views: i64,
}

pub fn validate_request(
    raw: RawAnalyzeRequest,
    cfg: &AnalyzerConfig,
) -> Result<AnalysisRequest, AnalysisError> {
    let mut errors = Vec::new();

    let window = match raw.time_window_minutes {
        None => {
            errors.push(FieldError::new("time_window_minutes", "field required"));
            None
        }
        Some(w) if w <= 0 => {
            errors.push(FieldError::new(
                "time_window_minutes",
                "must be greater than 0",
            ));
            None
        }
        Some(w) => match u32::try_from(w) {
            Ok(w) => Some(w),
            Err(_) => {
                errors.push(FieldError::new("time_window_minutes", "value too large"));
                None
            }
        },
    };

    let raw_messages = raw.messages.unwrap_or_default();
    if raw_messages.is_empty() {
        errors.push(FieldError::new(
            "messages",
            "must contain at least 1 message",
        ));
    }

    let mut messages = Vec::with_capacity(raw_messages.len());
    for (i, rm) in raw_messages.into_iter().enumerate() {
        if let Some(m) = validate_message(i, rm, cfg, &mut errors) {
            messages.push(m);
        }
    }

    if !errors.is_empty() {
        return Err(AnalysisError::InvalidPayload(errors));
    }

    // errors is empty, so the window parsed
    let Some(minutes) = window else {
        return Err(AnalysisError::InvalidPayload(vec![FieldError::new(
            "time_window_minutes",
            "field required",
        )]));
    };
    if !cfg.is_window_allowed(minutes) {
        return Err(AnalysisError::UnsupportedTimeWindow { minutes });
    }

    Ok(AnalysisRequest {
        messages,
        time_window_minutes: minutes,
    })
}

fn validate_message(
    i: usize,
    rm: RawMessage,
    cfg: &AnalyzerConfig,
    errors: &mut Vec<FieldError>,
) -> Option<Message> {
    let before = errors.len();
    let loc = |field: &str| format!("messages.{i}.{field}");

    let id = rm.id.unwrap_or_default();
    if id.is_empty() {
        errors.push(FieldError::new(loc("id"), "must not be empty"));
    }

    let content = rm.content.unwrap_or_default();
    let len = char_len(&content);
    if len == 0 {
        errors.push(FieldError::new(loc("content"), "must not be empty"));
    } else if len > cfg.max_content_chars {
        errors.push(FieldError::new(
            loc("content"),
            format!("must be at most {} characters", cfg.max_content_chars),
        ));
    }

    let user_id = rm.user_id.unwrap_or_default();
    if !is_valid_user_id(&user_id) {
        errors.push(FieldError::new(
            loc("user_id"),
            "must match pattern ^user_[a-z0-9_]{3,}$",
        ));
    }

    let timestamp = match rm.timestamp.as_deref().map(parse_timestamp) {
        Some(Ok(ts)) => Some(ts),
        Some(Err(msg)) => {
            errors.push(FieldError::new(loc("timestamp"), msg));
            None
        }
        None => {
            errors.push(FieldError::new(loc("timestamp"), "field required"));
            None
        }
    };

    for (j, tag) in rm.hashtags.iter().enumerate() {
        if !tag.starts_with('#') {
            errors.push(FieldError::new(
                format!("messages.{i}.hashtags.{j}"),
                "hashtags must start with '#'",
            ));
        }
    }

    for (field, value) in [
        ("reactions", rm.reactions),
        ("shares", rm.shares),
        ("views", rm.views),
    ] {
        if value < 0 {
            errors.push(FieldError::new(loc(field), "must be greater than or equal to 0"));
        }
    }

    if errors.len() != before {
        return None;
    }

    Some(Message {
        id,
        user_id,
        content,
        timestamp: timestamp?,
        hashtags: rm.hashtags,
        reactions: rm.reactions.unsigned_abs(),
        shares: rm.shares.unsigned_abs(),
        views: rm.views.unsigned_abs(),
    })
}

/// `user_` prefix plus at least 3 of `[a-z0-9_]`, checked after accent folding.
pub fn is_valid_user_id(user_id: &str) -> bool {
    USER_ID_RE.is_match(&fold(user_id))
}

/// RFC 3339 with a literal `Z` suffix and second precision only.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, &'static str> {
    if !raw.ends_with('Z') {
        return Err("timestamp must be an RFC 3339 string with UTC suffix 'Z'");
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| "timestamp must follow RFC3339 format YYYY-MM-DDTHH:MM:SSZ")
}
