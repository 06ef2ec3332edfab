// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Built-in validators, one per content type.

use crate::config::ValidationLimits;
use crate::content::rules;
use crate::content::{Content, ContentType, ValidationOutcome};

use super::ContentValidator;

fn mismatch(expected: ContentType, update: &Content) -> ValidationOutcome {
    ValidationOutcome::fail(format!(
        "expected {} content, got {}",
        expected,
        update.content_type()
    ))
}

/// Push a rule's failure message, if any
fn collect(failures: &mut Vec<String>, outcome: ValidationOutcome) {
    if let Err(message) = outcome.into_result() {
        failures.push(message);
    }
}

/// Song: audio and note sequence rules; title required for the details step
#[derive(Debug, Clone)]
pub struct SongValidator {
    limits: ValidationLimits,
}

impl SongValidator {
    pub fn new(limits: &ValidationLimits) -> Self {
        Self {
            limits: limits.clone(),
        }
    }

    pub fn create(limits: &ValidationLimits) -> Box<dyn ContentValidator> {
        Box::new(Self::new(limits))
    }
}

impl ContentValidator for SongValidator {
    fn content_type(&self) -> ContentType {
        ContentType::Song
    }

    fn validate_update(&self, update: &Content) -> ValidationOutcome {
        let Content::Song(song) = update else {
            return mismatch(ContentType::Song, update);
        };
        if let Some(audio) = &song.audio {
            let outcome = rules::audio_reference(audio, &self.limits);
            if !outcome.valid {
                return outcome;
            }
        }
        if let Some(notes) = &song.notes {
            let outcome = rules::note_sequence(notes, &self.limits);
            if !outcome.valid {
                return outcome;
            }
        }
        if song.max_attempts == Some(0) {
            return ValidationOutcome::fail("max attempts must be at least 1");
        }
        ValidationOutcome::pass()
    }

    fn validate_all(&self, content: &Content) -> Vec<String> {
        let Content::Song(song) = content else {
            return vec![mismatch(ContentType::Song, content).error.unwrap_or_default()];
        };
        let mut failures = Vec::new();
        match &song.audio {
            Some(audio) => collect(&mut failures, rules::audio_reference(audio, &self.limits)),
            None => failures.push("audio is required".to_string()),
        }
        match &song.notes {
            Some(notes) => collect(&mut failures, rules::note_sequence(notes, &self.limits)),
            None => failures.push("note sequence is required".to_string()),
        }
        if song.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            failures.push("title is required".to_string());
        }
        if song.max_attempts == Some(0) {
            failures.push("max attempts must be at least 1".to_string());
        }
        failures
    }

    fn step_complete(&self, step: u8, content: &Content) -> bool {
        let Content::Song(song) = content else {
            return false;
        };
        match step {
            1 => song.audio.is_some(),
            2 => song.notes.as_ref().map_or(false, |n| !n.is_empty()),
            3 => song.title.as_deref().map_or(false, |t| !t.trim().is_empty()),
            _ => false,
        }
    }
}

/// Challenge: time limit and minimum score range rules
#[derive(Debug, Clone)]
pub struct ChallengeValidator {
    time_limit: [u32; 2],
    min_score: [u32; 2],
}

impl ChallengeValidator {
    pub fn new(limits: &ValidationLimits) -> Self {
        Self {
            time_limit: limits.time_limit_secs,
            min_score: limits.min_score,
        }
    }

    pub fn create(limits: &ValidationLimits) -> Box<dyn ContentValidator> {
        Box::new(Self::new(limits))
    }
}

impl ContentValidator for ChallengeValidator {
    fn content_type(&self) -> ContentType {
        ContentType::Challenge
    }

    fn validate_update(&self, update: &Content) -> ValidationOutcome {
        let Content::Challenge(challenge) = update else {
            return mismatch(ContentType::Challenge, update);
        };
        if let Some(secs) = challenge.time_limit_secs {
            let outcome = rules::in_range("time limit", secs, self.time_limit);
            if !outcome.valid {
                return outcome;
            }
        }
        if let Some(score) = challenge.min_score {
            let outcome = rules::in_range("minimum score", score, self.min_score);
            if !outcome.valid {
                return outcome;
            }
        }
        ValidationOutcome::pass()
    }

    fn validate_all(&self, content: &Content) -> Vec<String> {
        let Content::Challenge(challenge) = content else {
            return vec![mismatch(ContentType::Challenge, content).error.unwrap_or_default()];
        };
        let mut failures = Vec::new();
        match challenge.time_limit_secs {
            Some(secs) => collect(&mut failures, rules::in_range("time limit", secs, self.time_limit)),
            None => failures.push("time limit is required".to_string()),
        }
        match challenge.min_score {
            Some(score) => collect(
                &mut failures,
                rules::in_range("minimum score", score, self.min_score),
            ),
            None => failures.push("minimum score is required".to_string()),
        }
        failures
    }

    fn step_complete(&self, step: u8, content: &Content) -> bool {
        let Content::Challenge(challenge) = content else {
            return false;
        };
        match step {
            1 => challenge.time_limit_secs.is_some(),
            2 => challenge.min_score.is_some(),
            _ => false,
        }
    }
}

/// Exercise: instructions length and worked example structure
#[derive(Debug, Clone)]
pub struct ExerciseValidator {
    instructions: [usize; 2],
    examples: [usize; 2],
}

impl ExerciseValidator {
    pub fn new(limits: &ValidationLimits) -> Self {
        Self {
            instructions: limits.instructions_chars,
            examples: limits.worked_examples,
        }
    }

    pub fn create(limits: &ValidationLimits) -> Box<dyn ContentValidator> {
        Box::new(Self::new(limits))
    }
}

impl ContentValidator for ExerciseValidator {
    fn content_type(&self) -> ContentType {
        ContentType::Exercise
    }

    fn validate_update(&self, update: &Content) -> ValidationOutcome {
        let Content::Exercise(exercise) = update else {
            return mismatch(ContentType::Exercise, update);
        };
        if let Some(text) = &exercise.instructions {
            let outcome = rules::text_length("instructions", text, self.instructions);
            if !outcome.valid {
                return outcome;
            }
        }
        if let Some(examples) = &exercise.examples {
            let outcome = rules::worked_examples(examples, self.examples);
            if !outcome.valid {
                return outcome;
            }
        }
        ValidationOutcome::pass()
    }

    fn validate_all(&self, content: &Content) -> Vec<String> {
        let Content::Exercise(exercise) = content else {
            return vec![mismatch(ContentType::Exercise, content).error.unwrap_or_default()];
        };
        let mut failures = Vec::new();
        match &exercise.instructions {
            Some(text) => collect(
                &mut failures,
                rules::text_length("instructions", text, self.instructions),
            ),
            None => failures.push("instructions are required".to_string()),
        }
        match &exercise.examples {
            Some(examples) => collect(&mut failures, rules::worked_examples(examples, self.examples)),
            None => failures.push("worked examples are required".to_string()),
        }
        failures
    }

    fn step_complete(&self, step: u8, content: &Content) -> bool {
        let Content::Exercise(exercise) = content else {
            return false;
        };
        match step {
            1 => exercise.instructions.is_some(),
            2 => exercise.examples.as_ref().map_or(false, |e| !e.is_empty()),
            _ => false,
        }
    }
}

/// Theory: body length
#[derive(Debug, Clone)]
pub struct TheoryValidator {
    body: [usize; 2],
}

impl TheoryValidator {
    pub fn new(limits: &ValidationLimits) -> Self {
        Self {
            body: limits.theory_body_chars,
        }
    }

    pub fn create(limits: &ValidationLimits) -> Box<dyn ContentValidator> {
        Box::new(Self::new(limits))
    }
}

impl ContentValidator for TheoryValidator {
    fn content_type(&self) -> ContentType {
        ContentType::Theory
    }

    fn validate_update(&self, update: &Content) -> ValidationOutcome {
        let Content::Theory(theory) = update else {
            return mismatch(ContentType::Theory, update);
        };
        match &theory.body {
            Some(body) => rules::text_length("body", body, self.body),
            None => ValidationOutcome::pass(),
        }
    }

    fn validate_all(&self, content: &Content) -> Vec<String> {
        let Content::Theory(theory) = content else {
            return vec![mismatch(ContentType::Theory, content).error.unwrap_or_default()];
        };
        let mut failures = Vec::new();
        match &theory.body {
            Some(body) => collect(&mut failures, rules::text_length("body", body, self.body)),
            None => failures.push("body is required".to_string()),
        }
        failures
    }

    fn step_complete(&self, step: u8, content: &Content) -> bool {
        match content {
            Content::Theory(theory) => step == 1 && theory.body.is_some(),
            _ => false,
        }
    }
}
