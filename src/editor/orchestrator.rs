// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Editor orchestrator.
//!
//! The public surface of the editor. Every mutating operation takes the
//! single-flight permit before its first suspension point and holds it
//! until its last one resolves; a call made while another is in flight
//! fails with [`EditorError::Concurrency`] without touching the session.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::config::EditorConfig;
use crate::content::{Content, ContentType};
use crate::error::{EditorError, Result};
use crate::media::{AudioMetadata, AudioProber, MediaBlob};
use crate::remote::{with_timeout, RemoteOperation, ServerResult};
use crate::services::{AuthProvider, ConfirmationPrompt, SongService};
use crate::validation::ValidatorRegistry;

use super::guard::SingleFlight;
use super::navigator::{check_navigation, Navigation};
use super::publish::PublishPipeline;
use super::session::{EditorSession, SessionMutation, SessionStore};

/// Collaborators the editor calls out to
#[derive(Clone)]
pub struct EditorServices {
    pub prompt: Arc<dyn ConfirmationPrompt>,
    pub auth: Arc<dyn AuthProvider>,
    pub remote: Arc<dyn RemoteOperation>,
    pub songs: Arc<dyn SongService>,
    pub prober: AudioProber,
}

impl EditorServices {
    /// Services with the symphonia prober
    pub fn new(
        prompt: Arc<dyn ConfirmationPrompt>,
        auth: Arc<dyn AuthProvider>,
        remote: Arc<dyn RemoteOperation>,
        songs: Arc<dyn SongService>,
    ) -> Self {
        Self {
            prompt,
            auth,
            remote,
            songs,
            prober: AudioProber::symphonia(),
        }
    }

    /// Replace the audio prober
    pub fn with_prober(mut self, prober: AudioProber) -> Self {
        self.prober = prober;
        self
    }
}

impl std::fmt::Debug for EditorServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorServices").finish_non_exhaustive()
    }
}

/// Orchestrates one authoring session
#[derive(Debug)]
pub struct EditorOrchestrator {
    store: SessionStore,
    flight: SingleFlight,
    validators: ValidatorRegistry,
    services: EditorServices,
    config: EditorConfig,
}

impl EditorOrchestrator {
    /// Create an orchestrator over an empty session
    pub fn new(config: EditorConfig, services: EditorServices) -> Self {
        Self {
            store: SessionStore::new(),
            flight: SingleFlight::new(),
            validators: ValidatorRegistry::with_builtins(&config.limits),
            services,
            config,
        }
    }

    /// Snapshot of the session
    pub fn session(&self) -> EditorSession {
        self.store.read()
    }

    /// Percentage of steps completed
    pub fn progress(&self) -> u8 {
        self.store.read().progress()
    }

    /// Whether a mutating operation is in flight
    pub fn is_busy(&self) -> bool {
        self.flight.is_busy()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Record a failure on the session before handing it back
    fn record<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            warn!(kind = ?e.kind(), error = %e, "Editor operation failed");
            self.store.apply(SessionMutation::PushError(e.to_string()));
        }
        result
    }

    /// Select a content type.
    ///
    /// Returns false when nothing changed: the type was already selected,
    /// or the author declined to discard unsaved edits.
    pub async fn change_content_type(&self, content_type: ContentType) -> Result<bool> {
        let _permit = self.flight.acquire("change_content_type")?;
        let session = self.store.read();

        if session.content_type == Some(content_type) {
            return Ok(false);
        }
        if let (Some(current), true) = (session.content_type, session.dirty) {
            let question = format!(
                "Switching to {} discards your unsaved {} content. Continue?",
                content_type, current
            );
            if !self.services.prompt.ask(&question).await {
                info!(%current, requested = %content_type, "Content type change declined");
                return Ok(false);
            }
        }

        self.store.apply(SessionMutation::SelectContentType(content_type));
        info!(%content_type, "Content type selected");
        Ok(true)
    }

    /// Move to step number `target`
    pub fn navigate_step(&self, target: u8) -> Result<()> {
        let _permit = self.flight.acquire("navigate_step")?;
        self.record(self.navigate(target))
    }

    fn navigate(&self, target: u8) -> Result<()> {
        let session = self.store.read();
        if session.content_type.is_none() {
            return Err(EditorError::state("no content type selected"));
        }
        match check_navigation(&session.steps, session.current_step, target) {
            Navigation::Allowed(index) => {
                self.store.apply(SessionMutation::SetCurrentStep(index));
                Ok(())
            }
            Navigation::UnknownStep => Err(EditorError::state(format!("step {} does not exist", target))),
            Navigation::CurrentIncomplete => Err(EditorError::state("complete current step first")),
        }
    }

    /// Validate and merge a sparse content update
    pub fn update_content(&self, update: Content) -> Result<()> {
        let _permit = self.flight.acquire("update_content")?;
        self.record(self.merge(update))
    }

    fn merge(&self, update: Content) -> Result<()> {
        let content_type = self
            .store
            .read()
            .content_type
            .ok_or_else(|| EditorError::state("no content type selected"))?;

        self.validators.dispatch(content_type, &update)?;
        if !self.store.apply(SessionMutation::MergeContent(update)) {
            return Err(EditorError::state("content does not match the selected type"));
        }

        let session = self.store.read();
        if let (Some(step), Some(content)) = (session.current(), session.content.as_ref()) {
            if !step.completed && self.validators.step_complete(step.number, content) {
                self.store.apply(SessionMutation::CompleteStep(session.current_step));
                info!(step = step.number, title = %step.title, "Step completed");
            }
        }
        Ok(())
    }

    /// Validate the whole content and persist it
    pub async fn save(&self) -> Result<ServerResult> {
        let _permit = self.flight.acquire("save")?;
        let result = self.persist().await;
        self.record(result)
    }

    async fn persist(&self) -> Result<ServerResult> {
        let session = self.store.read();
        let (content_type, content) = match (session.content_type, session.content.as_ref()) {
            (Some(content_type), Some(content)) => (content_type, content),
            _ => return Err(EditorError::state("no content type selected")),
        };
        self.validators.validate_all(content)?;

        let progress = session.progress();
        let payload = json!({
            "content_type": content_type,
            "content": content,
            "progress": progress,
        });
        let result = with_timeout(
            self.config.operation_timeout(),
            "save",
            self.services.remote.execute("save", payload),
        )
        .await?
        .into_checked("save")?;

        self.store.apply(SessionMutation::MarkSaved);
        self.store
            .apply(SessionMutation::Annotate(operation_metadata(content_type, progress, "save")));
        info!(%content_type, progress, "Content saved");
        Ok(result)
    }

    /// Run the publish pipeline and commit its outcome
    pub async fn publish(&self) -> Result<ServerResult> {
        let _permit = self.flight.acquire("publish")?;
        let session = self.store.read();
        let outcome = PublishPipeline::new(&self.validators, &self.services, &self.config)
            .run(&session)
            .await;

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                if let EditorError::DependentEntity { song_id, .. } = &e {
                    self.store.apply(SessionMutation::PushWarning(format!(
                        "song {} was created without a note sequence",
                        song_id
                    )));
                }
                return self.record(Err(e));
            }
        };

        self.store.apply(SessionMutation::MarkPublished);
        if let Some(content_type) = session.content_type {
            self.store.apply(SessionMutation::Annotate(
                outcome.metadata(content_type, session.progress()),
            ));
        }
        for warning in &outcome.warnings {
            self.store.apply(SessionMutation::PushWarning(warning.clone()));
        }
        info!(path = %outcome.path, "Content published");
        Ok(outcome.result)
    }

    /// Clear errors and warnings; content is kept
    pub fn reset(&self) -> Result<()> {
        let _permit = self.flight.acquire("reset")?;
        self.store.apply(SessionMutation::ClearFeedback);
        Ok(())
    }

    /// Throw away the session entirely
    pub fn discard(&self) -> Result<()> {
        let _permit = self.flight.acquire("discard")?;
        self.store.apply(SessionMutation::Discard);
        info!("Session discarded");
        Ok(())
    }

    /// Probe an audio blob. Not guarded and does not touch the session.
    pub async fn probe_audio(&self, blob: &MediaBlob) -> Result<AudioMetadata> {
        Ok(self.services.prober.probe(blob).await?)
    }

    /// Authoring history for the selected content type
    pub async fn history(&self) -> Result<ServerResult> {
        self.read_remote("history").await
    }

    /// Author statistics
    pub async fn stats(&self) -> Result<ServerResult> {
        self.read_remote("stats").await
    }

    async fn read_remote(&self, operation: &str) -> Result<ServerResult> {
        let payload = json!({ "content_type": self.store.read().content_type });
        let result = with_timeout(
            self.config.operation_timeout(),
            operation,
            self.services.remote.execute(operation, payload),
        )
        .await?
        .into_checked(operation)?;
        Ok(result)
    }
}

fn operation_metadata(content_type: ContentType, progress: u8, operation: &str) -> Map<String, Value> {
    let mut entries = Map::new();
    entries.insert("content_type".to_string(), json!(content_type));
    entries.insert("progress".to_string(), json!(progress));
    entries.insert("last_operation".to_string(), json!(operation));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ChallengeContent, TheoryContent};
    use crate::error::ErrorKind;
    use crate::remote::ScriptedRemote;
    use crate::services::{FixedConfirmation, InMemorySongService, StaticAuth};

    fn orchestrator(confirm: bool) -> (EditorOrchestrator, Arc<ScriptedRemote>) {
        let remote = Arc::new(ScriptedRemote::new());
        let services = EditorServices::new(
            Arc::new(FixedConfirmation::new(confirm)),
            Arc::new(StaticAuth::signed_in("author")),
            remote.clone(),
            Arc::new(InMemorySongService::new()),
        );
        (EditorOrchestrator::new(EditorConfig::default(), services), remote)
    }

    fn challenge(time_limit_secs: Option<u32>, min_score: Option<u32>) -> Content {
        Content::Challenge(ChallengeContent {
            time_limit_secs,
            min_score,
        })
    }

    #[tokio::test]
    async fn test_change_content_type_noop_when_same() {
        let (editor, _) = orchestrator(true);
        assert!(editor.change_content_type(ContentType::Theory).await.unwrap());
        assert!(!editor.change_content_type(ContentType::Theory).await.unwrap());
    }

    #[tokio::test]
    async fn test_change_content_type_without_edits_skips_prompt() {
        let (editor, _) = orchestrator(false);
        editor.change_content_type(ContentType::Song).await.unwrap();
        assert!(editor.change_content_type(ContentType::Theory).await.unwrap());
        assert_eq!(editor.session().content_type, Some(ContentType::Theory));
    }

    #[tokio::test]
    async fn test_update_requires_content_type() {
        let (editor, _) = orchestrator(true);
        let err = editor.update_content(challenge(Some(60), None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(editor.session().errors, vec!["no content type selected".to_string()]);
    }

    #[tokio::test]
    async fn test_update_marks_current_step_only() {
        let (editor, _) = orchestrator(true);
        editor.change_content_type(ContentType::Challenge).await.unwrap();
        editor.update_content(challenge(None, Some(70))).unwrap();
        assert_eq!(editor.progress(), 0);

        editor.update_content(challenge(Some(120), None)).unwrap();
        assert_eq!(editor.progress(), 50);
        assert!(editor.session().steps[0].completed);
        assert!(!editor.session().steps[1].completed);
    }

    #[tokio::test]
    async fn test_navigate_errors() {
        let (editor, _) = orchestrator(true);
        assert_eq!(editor.navigate_step(1).unwrap_err().kind(), ErrorKind::State);

        editor.change_content_type(ContentType::Challenge).await.unwrap();
        assert_eq!(
            editor.navigate_step(9).unwrap_err(),
            EditorError::state("step 9 does not exist")
        );
        assert_eq!(
            editor.navigate_step(2).unwrap_err(),
            EditorError::state("complete current step first")
        );
    }

    #[tokio::test]
    async fn test_save_failure_keeps_saved_flag() {
        let (editor, remote) = orchestrator(true);
        editor.change_content_type(ContentType::Theory).await.unwrap();
        editor
            .update_content(Content::Theory(TheoryContent {
                body: Some("A lesson about the circle of fifths".to_string()),
            }))
            .unwrap();

        remote.push_failure("backend down");
        let err = editor.save().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert!(!editor.session().saved);
        assert!(!editor.is_busy());

        editor.save().await.unwrap();
        let session = editor.session();
        assert!(session.saved);
        assert!(!session.dirty);
        assert_eq!(session.metadata["last_operation"], json!("save"));
    }

    #[tokio::test]
    async fn test_save_reports_every_failing_field() {
        let (editor, remote) = orchestrator(true);
        editor.change_content_type(ContentType::Challenge).await.unwrap();
        let err = editor.save().await.unwrap_err();
        assert_eq!(err.messages().len(), 2);
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_feedback_only() {
        let (editor, _) = orchestrator(true);
        editor.change_content_type(ContentType::Challenge).await.unwrap();
        editor.update_content(challenge(Some(60), None)).unwrap();
        let _ = editor.navigate_step(7);
        assert_eq!(editor.session().errors.len(), 1);

        editor.reset().unwrap();
        let session = editor.session();
        assert!(session.errors.is_empty());
        assert_eq!(session.content, Some(challenge(Some(60), None)));
    }

    #[tokio::test]
    async fn test_discard_empties_session() {
        let (editor, _) = orchestrator(true);
        editor.change_content_type(ContentType::Challenge).await.unwrap();
        editor.discard().unwrap();
        assert_eq!(editor.session(), EditorSession::default());
    }

    #[tokio::test]
    async fn test_history_and_stats_are_remote_reads() {
        let (editor, remote) = orchestrator(true);
        editor.history().await.unwrap();
        editor.stats().await.unwrap();
        assert_eq!(remote.operations(), vec!["history", "stats"]);
        assert_eq!(editor.session(), EditorSession::default());
    }
}
