// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Authoring content model.
//!
//! This module provides:
//! - Content types and their per-type payloads
//! - Step definitions and progress
//! - Pure validation rules over content fields
//!
//! Every payload field is optional, so the same types describe both the
//! accumulated content of a session and a sparse update to it.

pub mod rules;
pub mod steps;

pub use rules::ValidationOutcome;
pub use steps::{progress, step_definitions, StepDefinition};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authoring variant selecting steps and validators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Song,
    Challenge,
    Exercise,
    Theory,
}

impl ContentType {
    /// All content types
    pub const ALL: [ContentType; 4] = [
        ContentType::Song,
        ContentType::Challenge,
        ContentType::Exercise,
        ContentType::Theory,
    ];

    /// Lowercase name used in payloads and paths
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Song => "song",
            ContentType::Challenge => "challenge",
            ContentType::Exercise => "exercise",
            ContentType::Theory => "theory",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "song" => Ok(ContentType::Song),
            "challenge" => Ok(ContentType::Challenge),
            "exercise" => Ok(ContentType::Exercise),
            "theory" => Ok(ContentType::Theory),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// Reference to an uploaded audio track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioReference {
    /// Location of the uploaded media
    pub source: String,
    /// Original file name
    pub name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Duration in seconds
    pub duration_secs: f64,
}

/// One note of a song's note sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Onset in seconds from the start of the audio
    pub time_secs: f64,
    /// MIDI pitch (0-127)
    pub pitch: u8,
    /// Length in seconds
    pub duration_secs: f64,
}

impl NoteEvent {
    /// Create a new note
    pub fn new(time_secs: f64, pitch: u8, duration_secs: f64) -> Self {
        Self {
            time_secs,
            pitch,
            duration_secs,
        }
    }
}

/// Rewards granted for completing a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rewards {
    #[serde(default)]
    pub xp: Option<u32>,
    #[serde(default)]
    pub coins: Option<u32>,
}

/// A worked example attached to an exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedExample {
    pub prompt: String,
    pub solution: String,
}

impl WorkedExample {
    pub fn new(prompt: impl Into<String>, solution: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            solution: solution.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SongContent {
    #[serde(default)]
    pub audio: Option<AudioReference>,
    #[serde(default)]
    pub notes: Option<Vec<NoteEvent>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub tuning: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub rewards: Option<Rewards>,
    /// Attempts a player gets before the song locks
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChallengeContent {
    /// Time limit in seconds
    #[serde(default)]
    pub time_limit_secs: Option<u32>,
    /// Score required to pass
    #[serde(default)]
    pub min_score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExerciseContent {
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub examples: Option<Vec<WorkedExample>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TheoryContent {
    #[serde(default)]
    pub body: Option<String>,
}

/// Content payload keyed by content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Song(SongContent),
    Challenge(ChallengeContent),
    Exercise(ExerciseContent),
    Theory(TheoryContent),
}

impl Content {
    /// Empty payload for a content type
    pub fn empty(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Song => Content::Song(SongContent::default()),
            ContentType::Challenge => Content::Challenge(ChallengeContent::default()),
            ContentType::Exercise => Content::Exercise(ExerciseContent::default()),
            ContentType::Theory => Content::Theory(TheoryContent::default()),
        }
    }

    /// Content type of this payload
    pub fn content_type(&self) -> ContentType {
        match self {
            Content::Song(_) => ContentType::Song,
            Content::Challenge(_) => ContentType::Challenge,
            Content::Exercise(_) => ContentType::Exercise,
            Content::Theory(_) => ContentType::Theory,
        }
    }

    /// Merge a sparse update into this payload.
    ///
    /// Fields present in `update` replace the current value; absent fields
    /// are left alone. Returns false (and changes nothing) when the update
    /// is for a different content type.
    pub fn merge(&mut self, update: Content) -> bool {
        match (self, update) {
            (Content::Song(current), Content::Song(update)) => {
                merge_field(&mut current.audio, update.audio);
                merge_field(&mut current.notes, update.notes);
                merge_field(&mut current.title, update.title);
                merge_field(&mut current.genre, update.genre);
                merge_field(&mut current.tuning, update.tuning);
                merge_field(&mut current.difficulty, update.difficulty);
                merge_field(&mut current.rewards, update.rewards);
                merge_field(&mut current.max_attempts, update.max_attempts);
                true
            }
            (Content::Challenge(current), Content::Challenge(update)) => {
                merge_field(&mut current.time_limit_secs, update.time_limit_secs);
                merge_field(&mut current.min_score, update.min_score);
                true
            }
            (Content::Exercise(current), Content::Exercise(update)) => {
                merge_field(&mut current.instructions, update.instructions);
                merge_field(&mut current.examples, update.examples);
                true
            }
            (Content::Theory(current), Content::Theory(update)) => {
                merge_field(&mut current.body, update.body);
                true
            }
            _ => false,
        }
    }

    /// Song payload, if this is a song
    pub fn as_song(&self) -> Option<&SongContent> {
        match self {
            Content::Song(song) => Some(song),
            _ => None,
        }
    }
}

fn merge_field<T>(current: &mut Option<T>, update: Option<T>) {
    if update.is_some() {
        *current = update;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parse() {
        assert_eq!("Song".parse::<ContentType>(), Ok(ContentType::Song));
        assert_eq!(" theory ".parse::<ContentType>(), Ok(ContentType::Theory));
        assert!("lesson".parse::<ContentType>().is_err());
        assert_eq!(ContentType::Challenge.to_string(), "challenge");
    }

    #[test]
    fn test_empty_matches_type() {
        for content_type in ContentType::ALL {
            assert_eq!(Content::empty(content_type).content_type(), content_type);
        }
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut content = Content::Song(SongContent {
            title: Some("Riff".to_string()),
            ..Default::default()
        });

        let update = Content::Song(SongContent {
            tuning: Some("drop-d".to_string()),
            genre: Some("metal".to_string()),
            max_attempts: Some(5),
            ..Default::default()
        });
        assert!(content.merge(update));

        let song = content.as_song().unwrap();
        assert_eq!(song.title.as_deref(), Some("Riff"));
        assert_eq!(song.tuning.as_deref(), Some("drop-d"));
        assert_eq!(song.genre.as_deref(), Some("metal"));
        assert_eq!(song.max_attempts, Some(5));
    }

    #[test]
    fn test_merge_rejects_other_variant() {
        let mut content = Content::empty(ContentType::Theory);
        let update = Content::Challenge(ChallengeContent {
            time_limit_secs: Some(60),
            min_score: None,
        });
        assert!(!content.merge(update));
        assert_eq!(content, Content::empty(ContentType::Theory));
    }

    #[test]
    fn test_serde_tagging() {
        let content = Content::Theory(TheoryContent {
            body: Some("Intervals".to_string()),
        });
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "theory");
        assert_eq!(json["body"], "Intervals");
    }
}
