pub mod analyzer;

pub use analyzer::{
    AnalyzerConfig, DEFAULT_ANALYZER_CONFIG_PATH, ENV_ANALYZER_CONFIG_PATH, ENV_TRENDING_LIMIT,
};
