// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Editor session state.
//!
//! The [`SessionStore`] owns the single live [`EditorSession`]. Readers get
//! snapshots; every change goes through [`SessionStore::apply`] with a
//! [`SessionMutation`], which keeps the session invariants:
//! - `current_step` indexes `steps` whenever a content type is set
//! - `published` implies `saved`
//! - `content` is always the variant of `content_type`

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::content::{progress, step_definitions, Content, ContentType, StepDefinition};

/// The authoring session
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EditorSession {
    pub content_type: Option<ContentType>,
    pub steps: Vec<StepDefinition>,
    /// Index into `steps`
    pub current_step: usize,
    pub content: Option<Content>,
    pub metadata: Map<String, Value>,
    pub saved: bool,
    pub published: bool,
    /// Content changed since the last save or publish
    pub dirty: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl EditorSession {
    /// Number of the current step, if a content type is set
    pub fn current_step_number(&self) -> Option<u8> {
        self.steps.get(self.current_step).map(|s| s.number)
    }

    /// The current step, if a content type is set
    pub fn current(&self) -> Option<&StepDefinition> {
        self.steps.get(self.current_step)
    }

    /// Index of the step numbered `number`
    pub fn step_index(&self, number: u8) -> Option<usize> {
        self.steps.iter().position(|s| s.number == number)
    }

    /// Percentage of steps completed
    pub fn progress(&self) -> u8 {
        progress(&self.steps)
    }
}

/// A change to the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMutation {
    /// Select a content type, resetting steps, content and flags
    SelectContentType(ContentType),
    /// Move to the step at this index
    SetCurrentStep(usize),
    /// Merge a sparse update into the content
    MergeContent(Content),
    /// Mark the step at this index completed
    CompleteStep(usize),
    /// Record a successful save
    MarkSaved,
    /// Record a successful publish (implies saved)
    MarkPublished,
    /// Insert metadata entries
    Annotate(Map<String, Value>),
    PushError(String),
    PushWarning(String),
    /// Clear errors and warnings
    ClearFeedback,
    /// Drop everything back to an empty session
    Discard,
}

/// Owner of the live session
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Mutex<EditorSession>,
}

impl SessionStore {
    /// Store holding an empty session
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EditorSession> {
        match self.session.lock() {
            Ok(session) => session,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Snapshot of the current session
    pub fn read(&self) -> EditorSession {
        self.lock().clone()
    }

    /// Apply a mutation.
    ///
    /// Returns false when the mutation would break an invariant, in which
    /// case the session is unchanged.
    pub fn apply(&self, mutation: SessionMutation) -> bool {
        let mut session = self.lock();
        match mutation {
            SessionMutation::SelectContentType(content_type) => {
                let errors = std::mem::take(&mut session.errors);
                let warnings = std::mem::take(&mut session.warnings);
                *session = EditorSession {
                    content_type: Some(content_type),
                    steps: step_definitions(content_type),
                    current_step: 0,
                    content: Some(Content::empty(content_type)),
                    errors,
                    warnings,
                    ..Default::default()
                };
            }
            SessionMutation::SetCurrentStep(index) => {
                if index >= session.steps.len() {
                    return false;
                }
                session.current_step = index;
            }
            SessionMutation::MergeContent(update) => {
                let merged = match session.content.as_mut() {
                    Some(content) => content.merge(update),
                    None => false,
                };
                if !merged {
                    return false;
                }
                session.dirty = true;
            }
            SessionMutation::CompleteStep(index) => match session.steps.get_mut(index) {
                Some(step) => step.completed = true,
                None => return false,
            },
            SessionMutation::MarkSaved => {
                if session.content_type.is_none() {
                    return false;
                }
                session.saved = true;
                session.dirty = false;
            }
            SessionMutation::MarkPublished => {
                if session.content_type.is_none() {
                    return false;
                }
                session.saved = true;
                session.published = true;
                session.dirty = false;
            }
            SessionMutation::Annotate(entries) => {
                session.metadata.extend(entries);
            }
            SessionMutation::PushError(message) => session.errors.push(message),
            SessionMutation::PushWarning(message) => session.warnings.push(message),
            SessionMutation::ClearFeedback => {
                session.errors.clear();
                session.warnings.clear();
            }
            SessionMutation::Discard => *session = EditorSession::default(),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TheoryContent;
    use serde_json::json;

    fn theory(body: &str) -> Content {
        Content::Theory(TheoryContent {
            body: Some(body.to_string()),
        })
    }

    #[test]
    fn test_select_resets_session_but_keeps_feedback() {
        let store = SessionStore::new();
        store.apply(SessionMutation::PushWarning("old".to_string()));
        assert!(store.apply(SessionMutation::SelectContentType(ContentType::Song)));

        let session = store.read();
        assert_eq!(session.content_type, Some(ContentType::Song));
        assert_eq!(session.steps.len(), 3);
        assert_eq!(session.current_step_number(), Some(1));
        assert_eq!(session.content, Some(Content::empty(ContentType::Song)));
        assert_eq!(session.warnings, vec!["old".to_string()]);
        assert!(!session.saved && !session.published && !session.dirty);
    }

    #[test]
    fn test_step_index_bounds() {
        let store = SessionStore::new();
        assert!(!store.apply(SessionMutation::SetCurrentStep(0)));
        store.apply(SessionMutation::SelectContentType(ContentType::Challenge));
        assert!(store.apply(SessionMutation::SetCurrentStep(1)));
        assert!(!store.apply(SessionMutation::SetCurrentStep(2)));
        assert_eq!(store.read().current_step, 1);
        assert!(!store.apply(SessionMutation::CompleteStep(5)));
    }

    #[test]
    fn test_merge_marks_dirty_and_save_clears() {
        let store = SessionStore::new();
        assert!(!store.apply(SessionMutation::MergeContent(theory("x"))));

        store.apply(SessionMutation::SelectContentType(ContentType::Theory));
        assert!(store.apply(SessionMutation::MergeContent(theory("Scales and modes"))));
        assert!(store.read().dirty);

        assert!(store.apply(SessionMutation::MarkSaved));
        let session = store.read();
        assert!(session.saved && !session.dirty && !session.published);
    }

    #[test]
    fn test_merge_wrong_variant_is_refused() {
        let store = SessionStore::new();
        store.apply(SessionMutation::SelectContentType(ContentType::Song));
        let before = store.read();
        assert!(!store.apply(SessionMutation::MergeContent(theory("x"))));
        assert_eq!(store.read(), before);
    }

    #[test]
    fn test_published_implies_saved() {
        let store = SessionStore::new();
        assert!(!store.apply(SessionMutation::MarkPublished));
        store.apply(SessionMutation::SelectContentType(ContentType::Theory));
        assert!(store.apply(SessionMutation::MarkPublished));
        let session = store.read();
        assert!(session.published && session.saved);
    }

    #[test]
    fn test_feedback_and_discard() {
        let store = SessionStore::new();
        store.apply(SessionMutation::SelectContentType(ContentType::Theory));
        store.apply(SessionMutation::MergeContent(theory("Circle of fifths basics")));
        store.apply(SessionMutation::PushError("e".to_string()));
        store.apply(SessionMutation::PushWarning("w".to_string()));
        let mut entries = Map::new();
        entries.insert("progress".to_string(), json!(100));
        store.apply(SessionMutation::Annotate(entries));

        store.apply(SessionMutation::ClearFeedback);
        let session = store.read();
        assert!(session.errors.is_empty() && session.warnings.is_empty());
        assert!(session.content.is_some());
        assert_eq!(session.metadata["progress"], json!(100));

        store.apply(SessionMutation::Discard);
        assert_eq!(store.read(), EditorSession::default());
    }
}
