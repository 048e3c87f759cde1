// src/config/mod.rs
//! Pipeline configuration.
//!
//! Every key is optional; missing keys take the documented defaults
//! (`min_title_length = 10`, `min_engagement_floor = 1`,
//! `trending_window_days = 2`, `top_n = 10`).

pub mod weights;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use weights::ScoreWeights;

use crate::report::ReportOptions;
use crate::scoring::Scorer;
use crate::validate::ValidationRules;

pub const ENV_CONFIG_PATH: &str = "PIPELINE_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/pipeline.toml";
pub const DEFAULT_JSON_PATH: &str = "config/pipeline.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    #[serde(alias = "minTitleLength")]
    pub min_title_length: usize,
    #[serde(alias = "minEngagementFloor")]
    pub min_engagement_floor: u64,
    #[serde(alias = "trendingWindowDays")]
    pub trending_window_days: u32,
    #[serde(alias = "topN")]
    pub top_n: usize,
    pub weights: ScoreWeights,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_title_length: 10,
            min_engagement_floor: 1,
            trending_window_days: 2,
            top_n: 10,
            weights: ScoreWeights::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            min_title_length: self.min_title_length,
            min_engagement_floor: self.min_engagement_floor,
        }
    }

    pub fn scorer(&self) -> Scorer {
        Scorer::new(self.weights, self.trending_window_days)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_n: self.top_n,
            trending_window_days: self.trending_window_days,
        }
    }

    /// Load from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading pipeline config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing pipeline config {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $PIPELINE_CONFIG_PATH
    /// 2) config/pipeline.toml
    /// 3) config/pipeline.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        for p in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default())
    }

    fn sanitized(mut self) -> Self {
        self.weights = self.weights.sanitized();
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<PipelineConfig> {
    let cfg = match hint_ext {
        "toml" => toml::from_str::<PipelineConfig>(s)?,
        "json" => serde_json::from_str::<PipelineConfig>(s)?,
        _ => match serde_json::from_str::<PipelineConfig>(s) {
            Ok(c) => c,
            Err(_) => toml::from_str::<PipelineConfig>(s)
                .map_err(|e| anyhow!("unsupported pipeline config format: {e}"))?,
        },
    };
    Ok(cfg.sanitized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_formats_work() {
        let toml = r#"
            min_title_length = 5
            top_n = 3

            [weights]
            comment = 4.0
        "#;
        let c = parse_config(toml, "toml").unwrap();
        assert_eq!(c.min_title_length, 5);
        assert_eq!(c.top_n, 3);
        assert_eq!(c.min_engagement_floor, 1);
        assert_eq!(c.trending_window_days, 2);
        assert_eq!(c.weights.comment, 4.0);
        assert_eq!(c.weights.upvote, 2.0);

        let json = r#"{"minEngagementFloor": 5, "trendingWindowDays": 7}"#;
        let c = parse_config(json, "").unwrap();
        assert_eq!(c.min_engagement_floor, 5);
        assert_eq!(c.trending_window_days, 7);
        assert_eq!(c.min_title_length, 10);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_config("not = [valid", "").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // isolate CWD so the repo's own config/ does not interfere
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CONFIG_PATH);

        assert_eq!(PipelineConfig::load_default().unwrap(), PipelineConfig::default());

        fs::create_dir_all("config").unwrap();
        fs::write(DEFAULT_JSON_PATH, r#"{"top_n": 4}"#).unwrap();
        assert_eq!(PipelineConfig::load_default().unwrap().top_n, 4);

        fs::write(DEFAULT_TOML_PATH, "top_n = 6").unwrap();
        assert_eq!(PipelineConfig::load_default().unwrap().top_n, 6);

        // env wins
        let p = tmp.path().join("custom.json");
        fs::write(&p, r#"{"top_n": 9}"#).unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        assert_eq!(PipelineConfig::load_default().unwrap().top_n, 9);

        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml"));
        assert!(PipelineConfig::load_default().is_err());
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
