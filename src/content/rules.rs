// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Field validation rules.
//!
//! Each rule is a pure predicate over one content field and returns a
//! [`ValidationOutcome`]. Rules never look at other fields.

use crate::config::ValidationLimits;

use super::{AudioReference, NoteEvent, WorkedExample};

/// Result of a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub error: Option<String>,
}

impl ValidationOutcome {
    /// Passing outcome
    pub fn pass() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    /// Failing outcome with a message
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }

    /// Convert into a result carrying the failure message
    pub fn into_result(self) -> Result<(), String> {
        if self.valid {
            Ok(())
        } else {
            Err(self.error.unwrap_or_else(|| "invalid value".to_string()))
        }
    }
}

/// Audio must have a source, an accepted type, and a sane size and duration
pub fn audio_reference(audio: &AudioReference, limits: &ValidationLimits) -> ValidationOutcome {
    if audio.source.trim().is_empty() {
        return ValidationOutcome::fail("audio source is missing");
    }
    let mime = audio.mime_type.to_lowercase();
    if !limits.audio_mime_types.iter().any(|m| m.eq_ignore_ascii_case(&mime)) {
        return ValidationOutcome::fail(format!("unsupported audio type: {}", audio.mime_type));
    }
    if audio.size_bytes == 0 {
        return ValidationOutcome::fail("audio file is empty");
    }
    if audio.size_bytes > limits.audio_max_bytes {
        return ValidationOutcome::fail(format!(
            "audio file is too large ({} bytes, max {})",
            audio.size_bytes, limits.audio_max_bytes
        ));
    }
    if !audio.duration_secs.is_finite() || audio.duration_secs <= 0.0 {
        return ValidationOutcome::fail("audio duration is unknown");
    }
    if audio.duration_secs > limits.audio_max_duration_secs {
        return ValidationOutcome::fail(format!(
            "audio is too long ({:.1}s, max {:.1}s)",
            audio.duration_secs, limits.audio_max_duration_secs
        ));
    }
    ValidationOutcome::pass()
}

/// Notes must be non-empty, in time order, with valid pitch and length
pub fn note_sequence(notes: &[NoteEvent], limits: &ValidationLimits) -> ValidationOutcome {
    if notes.is_empty() {
        return ValidationOutcome::fail("note sequence is empty");
    }
    if notes.len() > limits.max_notes {
        return ValidationOutcome::fail(format!(
            "note sequence has {} notes (max {})",
            notes.len(),
            limits.max_notes
        ));
    }

    let mut last_time = 0.0;
    for (i, note) in notes.iter().enumerate() {
        if note.pitch > 127 {
            return ValidationOutcome::fail(format!("note {} has invalid pitch {}", i + 1, note.pitch));
        }
        if !note.time_secs.is_finite() || note.time_secs < 0.0 {
            return ValidationOutcome::fail(format!("note {} has invalid start time", i + 1));
        }
        if !note.duration_secs.is_finite() || note.duration_secs <= 0.0 {
            return ValidationOutcome::fail(format!("note {} has invalid duration", i + 1));
        }
        if note.time_secs < last_time {
            return ValidationOutcome::fail(format!("note {} is out of order", i + 1));
        }
        last_time = note.time_secs;
    }
    ValidationOutcome::pass()
}

/// Inclusive numeric range check
pub fn in_range(field: &str, value: u32, range: [u32; 2]) -> ValidationOutcome {
    let [min, max] = range;
    if value < min || value > max {
        ValidationOutcome::fail(format!("{} must be between {} and {}", field, min, max))
    } else {
        ValidationOutcome::pass()
    }
}

/// Non-blank text whose trimmed character count is within range
pub fn text_length(field: &str, text: &str, range: [usize; 2]) -> ValidationOutcome {
    let [min, max] = range;
    let len = text.trim().chars().count();
    if len == 0 {
        return ValidationOutcome::fail(format!("{} must not be empty", field));
    }
    if len < min {
        return ValidationOutcome::fail(format!(
            "{} must be at least {} characters (got {})",
            field, min, len
        ));
    }
    if len > max {
        return ValidationOutcome::fail(format!(
            "{} must be at most {} characters (got {})",
            field, max, len
        ));
    }
    ValidationOutcome::pass()
}

/// Worked examples: count within range, every prompt and solution filled
pub fn worked_examples(examples: &[WorkedExample], range: [usize; 2]) -> ValidationOutcome {
    let [min, max] = range;
    if examples.len() < min || examples.len() > max {
        return ValidationOutcome::fail(format!(
            "exercise needs between {} and {} worked examples (got {})",
            min,
            max,
            examples.len()
        ));
    }
    for (i, example) in examples.iter().enumerate() {
        if example.prompt.trim().is_empty() {
            return ValidationOutcome::fail(format!("worked example {} has no prompt", i + 1));
        }
        if example.solution.trim().is_empty() {
            return ValidationOutcome::fail(format!("worked example {} has no solution", i + 1));
        }
    }
    ValidationOutcome::pass()
}
