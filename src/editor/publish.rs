// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Publish pipeline.
//!
//! Stages run in order and each one is a hard gate:
//! 1. a content type is selected
//! 2. the author has an active, resolvable session
//! 3. the content validates and progress is exactly 100%
//! 4. dependent records are created (song + note sequence, or a single
//!    generic create for other content types)
//!
//! The pipeline never touches the session; the orchestrator commits the
//! returned [`PublishOutcome`].

use std::fmt::Display;

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EditorConfig, SongDefaults};
use crate::content::{AudioReference, Content, ContentType, NoteEvent, SongContent};
use crate::error::{EditorError, Result};
use crate::remote::{with_timeout, ServerResult};
use crate::services::{Identity, NewSequence, NewSong};
use crate::validation::ValidatorRegistry;

use super::orchestrator::EditorServices;
use super::session::EditorSession;

/// Everything the orchestrator commits after a successful publish
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub result: ServerResult,
    /// Access path of the new resource
    pub path: String,
    pub published_by: Identity,
    /// Fields that fell back to defaults
    pub warnings: Vec<String>,
}

impl PublishOutcome {
    /// Metadata entries recorded on the session
    pub fn metadata(&self, content_type: ContentType, progress: u8) -> Map<String, Value> {
        let mut entries = Map::new();
        entries.insert("content_type".to_string(), json!(content_type));
        entries.insert("progress".to_string(), json!(progress));
        entries.insert("last_operation".to_string(), json!("publish"));
        entries.insert("resource_path".to_string(), json!(self.path));
        entries.insert("published_by".to_string(), json!(self.published_by.id));
        entries
    }
}

/// One publish attempt over a session snapshot
pub struct PublishPipeline<'a> {
    validators: &'a ValidatorRegistry,
    services: &'a EditorServices,
    config: &'a EditorConfig,
}

impl<'a> PublishPipeline<'a> {
    pub fn new(
        validators: &'a ValidatorRegistry,
        services: &'a EditorServices,
        config: &'a EditorConfig,
    ) -> Self {
        Self {
            validators,
            services,
            config,
        }
    }

    /// Run every stage against `session`
    pub async fn run(&self, session: &EditorSession) -> Result<PublishOutcome> {
        let (content_type, content) = match (session.content_type, session.content.as_ref()) {
            (Some(content_type), Some(content)) => (content_type, content),
            _ => return Err(EditorError::state("no content type selected")),
        };

        let user = self.authenticate().await?;
        debug!(user = %user.id, "Publish: authenticated");

        self.validators.validate_all(content)?;
        let progress = session.progress();
        if progress != 100 {
            return Err(EditorError::state(format!(
                "content incomplete ({}% of steps completed)",
                progress
            )));
        }
        debug!(%content_type, "Publish: content complete");

        match content {
            Content::Song(song) => self.publish_song(song, user).await,
            other => self.publish_generic(content_type, other, user).await,
        }
    }

    async fn authenticate(&self) -> Result<Identity> {
        let auth = self.services.auth.clone();
        let session = with_timeout(self.config.operation_timeout(), "auth", async move {
            Ok(auth.current_session().await)
        })
        .await?;

        if !session.active {
            return Err(EditorError::Auth("session expired".to_string()));
        }
        session
            .user
            .ok_or_else(|| EditorError::Auth("not authenticated".to_string()))
    }

    async fn publish_song(&self, song: &SongContent, user: Identity) -> Result<PublishOutcome> {
        let (audio, notes) = publishable_parts(song)?;
        let (new_song, warnings) = song_record(song, audio, &user, &self.config.song_defaults);
        let timeout = self.config.operation_timeout();

        let created = with_timeout(timeout, "create_song", self.services.songs.create_song(new_song)).await?;
        info!(song_id = %created.id, "Publish: song record created");

        let sequence = NewSequence {
            song_id: created.id.clone(),
            notes: notes.to_vec(),
            created_by: user.id.clone(),
        };
        let sequence = match with_timeout(
            timeout,
            "create_sequence",
            self.services.songs.create_sequence(sequence),
        )
        .await
        {
            Ok(sequence) => sequence,
            Err(e) => {
                warn!(song_id = %created.id, error = %e, "Publish: note sequence failed, song record left without sequence");
                return Err(EditorError::DependentEntity {
                    song_id: created.id,
                    message: e.to_string(),
                });
            }
        };
        info!(song_id = %created.id, sequence_id = %sequence.id, "Publish: note sequence created");

        let path = self.access_path(ContentType::Song, &created.id);
        let result = ServerResult::ok("song published").with_data(json!({
            "id": created.id,
            "sequence_id": sequence.id,
            "path": path,
        }));
        Ok(PublishOutcome {
            result,
            path,
            published_by: user,
            warnings,
        })
    }

    async fn publish_generic(
        &self,
        content_type: ContentType,
        content: &Content,
        user: Identity,
    ) -> Result<PublishOutcome> {
        let operation = format!("create_{}", content_type);
        let payload = json!({
            "content_type": content_type,
            "content": content,
            "created_by": user.id,
        });
        let result = with_timeout(
            self.config.operation_timeout(),
            &operation,
            self.services.remote.execute(&operation, payload),
        )
        .await?
        .into_checked(&operation)?;

        let id = result
            .data_str("id")
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let path = self.access_path(content_type, &id);
        info!(%content_type, id = %id, "Publish: content created");

        let mut data = match result.data.clone() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        data.insert("id".to_string(), json!(id));
        data.insert("path".to_string(), json!(path));

        Ok(PublishOutcome {
            result: ServerResult {
                data: Some(Value::Object(data)),
                ..result
            },
            path,
            published_by: user,
            warnings: Vec::new(),
        })
    }

    fn access_path(&self, content_type: ContentType, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.song_defaults.access_path.trim_end_matches('/'),
            content_type,
            id
        )
    }
}

/// Primary song record with defaults applied to omitted fields.
///
/// Every defaulted field leaves a warning naming the value used.
fn song_record(
    song: &SongContent,
    audio: &AudioReference,
    user: &Identity,
    defaults: &SongDefaults,
) -> (NewSong, Vec<String>) {
    let mut warnings = Vec::new();
    let text = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
    let rewards = song.rewards.unwrap_or_default();

    let record = NewSong {
        title: song.title.clone().unwrap_or_default().trim().to_string(),
        genre: or_default("genre", text(&song.genre), &defaults.genre, &mut warnings),
        tuning: or_default("tuning", text(&song.tuning), &defaults.tuning, &mut warnings),
        difficulty: or_default(
            "difficulty",
            text(&song.difficulty),
            &defaults.difficulty,
            &mut warnings,
        ),
        xp_reward: or_default("xp reward", rewards.xp, &defaults.xp_reward, &mut warnings),
        coin_reward: or_default("coin reward", rewards.coins, &defaults.coin_reward, &mut warnings),
        max_attempts: or_default(
            "max attempts",
            song.max_attempts,
            &defaults.max_attempts,
            &mut warnings,
        ),
        audio_source: audio.source.clone(),
        duration_secs: audio.duration_secs,
        created_by: user.id.clone(),
    };
    (record, warnings)
}

fn or_default<T: Clone + Display>(
    field: &str,
    value: Option<T>,
    default: &T,
    warnings: &mut Vec<String>,
) -> T {
    value.unwrap_or_else(|| {
        warnings.push(format!("{} not set; using default '{}'", field, default));
        default.clone()
    })
}

/// Audio and notes a song needs before anything is written
fn publishable_parts(song: &SongContent) -> Result<(&AudioReference, &[NoteEvent])> {
    let audio = song
        .audio
        .as_ref()
        .ok_or_else(|| EditorError::invalid("a song needs audio before it can be published"))?;
    let notes = song
        .notes
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| EditorError::invalid("a song needs a note sequence before it can be published"))?;
    Ok((audio, notes))
}
