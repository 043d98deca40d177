use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Scoring weights for the five compatibility sub-scores
///
/// Weights need not sum to 1; the final score divides by the weight sum.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScoringWeights {
    #[serde(rename = "hostPreference", default = "default_host_preference_weight")]
    pub host_preference: f64,
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(rename = "careerGoals", default = "default_career_goals_weight")]
    pub career_goals: f64,
    #[serde(default = "default_gpa_weight")]
    pub gpa: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.host_preference + self.skills + self.career_goals + self.gpa + self.experience
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            host_preference: default_host_preference_weight(),
            skills: default_skills_weight(),
            career_goals: default_career_goals_weight(),
            gpa: default_gpa_weight(),
            experience: default_experience_weight(),
        }
    }
}

fn default_host_preference_weight() -> f64 { 0.35 }
fn default_skills_weight() -> f64 { 0.25 }
fn default_career_goals_weight() -> f64 { 0.15 }
fn default_gpa_weight() -> f64 { 0.15 }
fn default_experience_weight() -> f64 { 0.10 }

/// Engine configuration value object
///
/// This is the only configuration surface the engine sees; file and environment
/// loading below exists for the binary's convenience.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchConfig {
    #[serde(default)]
    pub weights: ScoringWeights,
    /// GPA normalization ceiling for the gpa sub-score
    #[serde(rename = "gpaCeiling", default = "default_gpa_ceiling")]
    pub gpa_ceiling: f64,
    /// A host counts as an "application" when ranked within this many top preferences
    #[serde(rename = "popularityRankWindow", default = "default_popularity_rank_window")]
    pub popularity_rank_window: usize,
    /// Minimum application count for a host to be treated as popular in round 1
    #[serde(rename = "popularMinApplications", default = "default_popular_min_applications")]
    pub popular_min_applications: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            gpa_ceiling: default_gpa_ceiling(),
            popularity_rank_window: default_popularity_rank_window(),
            popular_min_applications: default_popular_min_applications(),
        }
    }
}

fn default_gpa_ceiling() -> f64 { 4.0 }
fn default_popularity_rank_window() -> usize { 3 }
fn default_popular_min_applications() -> usize { 5 }

/// Application configuration for the CLI binary
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with SHADOW_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SHADOW_MATCHING__GPACEILING -> matching.gpaCeiling
            .add_source(
                Environment::with_prefix("SHADOW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SHADOW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.host_preference, 0.35);
        assert_eq!(weights.skills, 0.25);
        assert_eq!(weights.career_goals, 0.15);
        assert_eq!(weights.gpa, 0.15);
        assert_eq!(weights.experience, 0.10);
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_match_config() {
        let config = MatchConfig::default();
        assert_eq!(config.gpa_ceiling, 4.0);
        assert_eq!(config.popularity_rank_window, 3);
        assert_eq!(config.popular_min_applications, 5);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
