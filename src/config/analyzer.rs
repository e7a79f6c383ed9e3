// src/config/analyzer.rs
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::info;

use crate::trending::DEFAULT_TRENDING_LIMIT;

pub const DEFAULT_ANALYZER_CONFIG_PATH: &str = "config/analyzer.toml";
pub const ENV_ANALYZER_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const ENV_TRENDING_LIMIT: &str = "ANALYZER_TRENDING_LIMIT";

fn default_allowed_time_windows() -> Vec<u32> {
    vec![5, 15, 30, 60, 120, 240, 360, 720, 1440]
}
fn default_trending_limit() -> usize {
    DEFAULT_TRENDING_LIMIT
}
fn default_max_content_chars() -> usize {
    280
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Window sizes in minutes accepted by the API.
    #[serde(default = "default_allowed_time_windows")]
    pub allowed_time_windows: Vec<u32>,
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            allowed_time_windows: default_allowed_time_windows(),
            trending_limit: default_trending_limit(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl AnalyzerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config from {}", path.display()))?;
        let cfg: AnalyzerConfig = toml::from_str(&data)
            .with_context(|| format!("parsing analyzer config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Resolution order:
    /// 1) $ANALYZER_CONFIG_PATH (must exist and parse)
    /// 2) config/analyzer.toml (must parse if present)
    /// 3) built-in defaults
    ///
    /// $ANALYZER_TRENDING_LIMIT is applied on top.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut cfg = match env::var(ENV_ANALYZER_CONFIG_PATH) {
            Ok(p) => Self::load_from_file(&p)?,
            Err(_) if Path::new(DEFAULT_ANALYZER_CONFIG_PATH).exists() => {
                Self::load_from_file(DEFAULT_ANALYZER_CONFIG_PATH)?
            }
            Err(_) => {
                info!(target: "config", "no analyzer config file, using defaults");
                Self::default()
            }
        };

        if let Some(limit) = parse_limit_env(env::var(ENV_TRENDING_LIMIT).ok()) {
            cfg.trending_limit = limit;
        }
        Ok(cfg)
    }

    pub fn is_window_allowed(&self, minutes: u32) -> bool {
        self.allowed_time_windows.contains(&minutes)
    }

    fn sanitized(mut self) -> Self {
        self.allowed_time_windows.retain(|&w| w > 0);
        self.allowed_time_windows.sort_unstable();
        self.allowed_time_windows.dedup();
        if self.allowed_time_windows.is_empty() {
            self.allowed_time_windows = default_allowed_time_windows();
        }
        if self.trending_limit == 0 {
            self.trending_limit = default_trending_limit();
        }
        if self.max_content_chars == 0 {
            self.max_content_chars = default_max_content_chars();
        }
        self
    }
}

fn parse_limit_env(raw: Option<String>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}
