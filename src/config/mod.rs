// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for the editor.
//!
//! This module provides data structures for loading validation limits,
//! publish defaults, remote simulator tuning and backend timeouts.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Root editor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Remote simulator tuning
    #[serde(default)]
    pub simulator: SimulatorConfig,
    /// Content validation thresholds
    #[serde(default)]
    pub limits: ValidationLimits,
    /// Values applied to songs when the author omitted them
    #[serde(default)]
    pub song_defaults: SongDefaults,
    /// Timeout for each backend call, in milliseconds (None = wait forever)
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: Option<u64>,
}

fn default_operation_timeout() -> Option<u64> {
    Some(30_000)
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            limits: ValidationLimits::default(),
            song_defaults: SongDefaults::default(),
            operation_timeout_ms: default_operation_timeout(),
        }
    }
}

impl EditorConfig {
    /// Load a configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Backend call timeout, if enabled
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

/// Remote simulator tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulatorConfig {
    /// Length of one delay unit in milliseconds
    #[serde(default = "default_delay_unit_ms")]
    pub delay_unit_ms: u64,
    /// Minimum delay in units
    #[serde(default = "default_min_delay_units")]
    pub min_delay_units: u32,
    /// Maximum delay in units (inclusive)
    #[serde(default = "default_max_delay_units")]
    pub max_delay_units: u32,
    /// Probability of a failed round trip (0.0 - 1.0)
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    /// RNG seed (None = seeded from entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_delay_unit_ms() -> u64 {
    1000
}
fn default_min_delay_units() -> u32 {
    1
}
fn default_max_delay_units() -> u32 {
    3
}
fn default_failure_rate() -> f64 {
    0.1
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            delay_unit_ms: default_delay_unit_ms(),
            min_delay_units: default_min_delay_units(),
            max_delay_units: default_max_delay_units(),
            failure_rate: default_failure_rate(),
            seed: None,
        }
    }
}

/// Content validation thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationLimits {
    /// Largest accepted audio upload in bytes
    #[serde(default = "default_audio_max_bytes")]
    pub audio_max_bytes: u64,
    /// Longest accepted audio in seconds
    #[serde(default = "default_audio_max_duration")]
    pub audio_max_duration_secs: f64,
    /// Accepted audio MIME types
    #[serde(default = "default_audio_mime_types")]
    pub audio_mime_types: Vec<String>,
    /// Most notes a sequence may hold
    #[serde(default = "default_max_notes")]
    pub max_notes: usize,
    /// Challenge time limit range in seconds [min, max]
    #[serde(default = "default_time_limit_range")]
    pub time_limit_secs: [u32; 2],
    /// Challenge minimum score range [min, max]
    #[serde(default = "default_min_score_range")]
    pub min_score: [u32; 2],
    /// Exercise instructions length range in characters [min, max]
    #[serde(default = "default_instructions_range")]
    pub instructions_chars: [usize; 2],
    /// Worked example count range [min, max]
    #[serde(default = "default_worked_examples_range")]
    pub worked_examples: [usize; 2],
    /// Theory body length range in characters [min, max]
    #[serde(default = "default_theory_body_range")]
    pub theory_body_chars: [usize; 2],
}

fn default_audio_max_bytes() -> u64 {
    50 * 1024 * 1024
}
fn default_audio_max_duration() -> f64 {
    900.0
}
fn default_audio_mime_types() -> Vec<String> {
    [
        "audio/mpeg",
        "audio/mp3",
        "audio/wav",
        "audio/x-wav",
        "audio/ogg",
        "audio/flac",
        "audio/mp4",
        "audio/x-m4a",
        "audio/aac",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_max_notes() -> usize {
    10_000
}
fn default_time_limit_range() -> [u32; 2] {
    [10, 600]
}
fn default_min_score_range() -> [u32; 2] {
    [0, 100]
}
fn default_instructions_range() -> [usize; 2] {
    [10, 2000]
}
fn default_worked_examples_range() -> [usize; 2] {
    [1, 20]
}
fn default_theory_body_range() -> [usize; 2] {
    [20, 20_000]
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            audio_max_bytes: default_audio_max_bytes(),
            audio_max_duration_secs: default_audio_max_duration(),
            audio_mime_types: default_audio_mime_types(),
            max_notes: default_max_notes(),
            time_limit_secs: default_time_limit_range(),
            min_score: default_min_score_range(),
            instructions_chars: default_instructions_range(),
            worked_examples: default_worked_examples_range(),
            theory_body_chars: default_theory_body_range(),
        }
    }
}

/// Values applied to a published song when the author left them unset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongDefaults {
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default = "default_tuning")]
    pub tuning: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_xp_reward")]
    pub xp_reward: u32,
    #[serde(default = "default_coin_reward")]
    pub coin_reward: u32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Prefix of the access path returned for published content
    #[serde(default = "default_access_path")]
    pub access_path: String,
}

fn default_genre() -> String {
    "rock".to_string()
}
fn default_tuning() -> String {
    "standard".to_string()
}
fn default_difficulty() -> String {
    "beginner".to_string()
}
fn default_xp_reward() -> u32 {
    100
}
fn default_coin_reward() -> u32 {
    10
}
fn default_max_attempts() -> u32 {
    3
}
fn default_access_path() -> String {
    "/play".to_string()
}

impl Default for SongDefaults {
    fn default() -> Self {
        Self {
            genre: default_genre(),
            tuning: default_tuning(),
            difficulty: default_difficulty(),
            xp_reward: default_xp_reward(),
            coin_reward: default_coin_reward(),
            max_attempts: default_max_attempts(),
            access_path: default_access_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_editor_config() {
        let yaml = r#"
simulator:
  delay_unit_ms: 10
  failure_rate: 0.0
  seed: 7

limits:
  theory_body_chars: [40, 5000]
  audio_mime_types: ["audio/wav"]

song_defaults:
  genre: "blues"
  max_attempts: 5

operation_timeout_ms: 500
"#;

        let config = EditorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.simulator.delay_unit_ms, 10);
        assert_eq!(config.simulator.min_delay_units, 1);
        assert_eq!(config.simulator.max_delay_units, 3);
        assert_eq!(config.simulator.failure_rate, 0.0);
        assert_eq!(config.simulator.seed, Some(7));
        assert_eq!(config.limits.theory_body_chars, [40, 5000]);
        assert_eq!(config.limits.audio_mime_types, vec!["audio/wav".to_string()]);
        assert_eq!(config.limits.time_limit_secs, [10, 600]);
        assert_eq!(config.song_defaults.genre, "blues");
        assert_eq!(config.song_defaults.tuning, "standard");
        assert_eq!(config.song_defaults.max_attempts, 5);
        assert_eq!(config.operation_timeout(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_default_values() {
        let config = EditorConfig::from_yaml("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.simulator.failure_rate, 0.1);
        assert_eq!(config.limits.theory_body_chars, [20, 20_000]);
        assert_eq!(config.song_defaults.difficulty, "beginner");
        assert_eq!(config.operation_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_timeout_disabled() {
        let config = EditorConfig::from_yaml("operation_timeout_ms: null").unwrap();
        assert_eq!(config.operation_timeout(), None);

        let config = EditorConfig::from_yaml("operation_timeout_ms: 0").unwrap();
        assert_eq!(config.operation_timeout(), None);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.yaml");

        let mut original = EditorConfig::default();
        original.song_defaults.genre = "jazz".to_string();
        original.simulator.seed = Some(42);
        original.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = EditorConfig::load("/nonexistent/editor.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
