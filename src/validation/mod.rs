// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Validation dispatch over content types.
//!
//! Each content type registers a [`ContentValidator`] that knows which
//! rule governs which field and which fields each step requires. The
//! [`ValidatorRegistry`] routes calls by content type.

pub mod validators;

use std::collections::HashMap;
use std::fmt;

use crate::config::ValidationLimits;
use crate::content::{Content, ContentType, ValidationOutcome};
use crate::error::{EditorError, Result};

pub use validators::{ChallengeValidator, ExerciseValidator, SongValidator, TheoryValidator};

/// Field validators and step requirements for one content type
pub trait ContentValidator: Send + Sync {
    /// Content type this validator handles
    fn content_type(&self) -> ContentType;

    /// Validate the fields present in a sparse update.
    ///
    /// Absent fields are not checked. Returns the first failing outcome.
    fn validate_update(&self, update: &Content) -> ValidationOutcome;

    /// Validate the whole payload.
    ///
    /// Reports every missing required field and every failing rule.
    fn validate_all(&self, content: &Content) -> Vec<String>;

    /// Whether the fields required by `step` (1-based) are filled
    fn step_complete(&self, step: u8, content: &Content) -> bool;
}

/// Factory function type for creating validators
pub type ValidatorFactory = fn(&ValidationLimits) -> Box<dyn ContentValidator>;

/// Registry of validators keyed by content type
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<ContentType, Box<dyn ContentValidator>>,
}

impl ValidatorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in validators registered
    pub fn with_builtins(limits: &ValidationLimits) -> Self {
        let mut registry = Self::new();
        let factories: [ValidatorFactory; 4] = [
            SongValidator::create,
            ChallengeValidator::create,
            ExerciseValidator::create,
            TheoryValidator::create,
        ];
        for factory in factories {
            registry.register(factory(limits));
        }
        registry
    }

    /// Register a validator, replacing any for the same content type
    pub fn register(&mut self, validator: Box<dyn ContentValidator>) {
        self.validators.insert(validator.content_type(), validator);
    }

    fn get(&self, content_type: ContentType) -> Result<&dyn ContentValidator> {
        self.validators
            .get(&content_type)
            .map(|v| v.as_ref())
            .ok_or_else(|| EditorError::state(format!("no validator registered for {}", content_type)))
    }

    /// Validate a sparse update against the session's content type.
    ///
    /// Fails with a state error when the update is for another type and
    /// with the first failing rule otherwise.
    pub fn dispatch(&self, content_type: ContentType, update: &Content) -> Result<()> {
        if update.content_type() != content_type {
            return Err(EditorError::state(format!(
                "cannot apply {} content to a {} session",
                update.content_type(),
                content_type
            )));
        }
        self.get(content_type)?
            .validate_update(update)
            .into_result()
            .map_err(EditorError::invalid)
    }

    /// Validate a whole payload, aggregating every failure
    pub fn validate_all(&self, content: &Content) -> Result<()> {
        let failures = self.get(content.content_type())?.validate_all(content);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(EditorError::Validation(failures))
        }
    }

    /// Whether `step` of `content` has its required fields
    pub fn step_complete(&self, step: u8, content: &Content) -> bool {
        self.get(content.content_type())
            .map(|v| v.step_complete(step, content))
            .unwrap_or(false)
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("content_types", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ChallengeContent, TheoryContent};
    use crate::error::ErrorKind;

    fn registry() -> ValidatorRegistry {
        ValidatorRegistry::with_builtins(&ValidationLimits::default())
    }

    #[test]
    fn test_builtins_cover_every_type() {
        let registry = registry();
        for content_type in ContentType::ALL {
            assert!(registry.get(content_type).is_ok());
        }
    }

    #[test]
    fn test_dispatch_rejects_mismatched_variant() {
        let update = Content::Theory(TheoryContent {
            body: Some("x".repeat(30)),
        });
        let err = registry().dispatch(ContentType::Song, &update).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_dispatch_reports_first_failure() {
        let update = Content::Challenge(ChallengeContent {
            time_limit_secs: Some(5),
            min_score: Some(500),
        });
        let err = registry().dispatch(ContentType::Challenge, &update).unwrap_err();
        assert_eq!(err.messages(), ["time limit must be between 10 and 600"]);
    }

    #[test]
    fn test_validate_all_aggregates() {
        let err = registry()
            .validate_all(&Content::empty(ContentType::Challenge))
            .unwrap_err();
        assert_eq!(
            err.messages(),
            ["time limit is required", "minimum score is required"]
        );
    }

    #[test]
    fn test_empty_registry_reports_state_error() {
        let registry = ValidatorRegistry::new();
        let err = registry
            .validate_all(&Content::empty(ContentType::Theory))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert!(!registry.step_complete(1, &Content::empty(ContentType::Theory)));
    }
}
