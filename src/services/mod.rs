// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! External collaborators consumed by the editor.
//!
//! The editor only sees these traits. In-memory implementations back the
//! demo binary and the tests.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::NoteEvent;
use crate::error::RemoteError;

pub use memory::{FixedConfirmation, InMemorySongService, StaticAuth};

/// Asks the author to confirm a destructive action
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Ask `question`; true means the author accepted
    async fn ask(&self, question: &str) -> bool;
}

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
}

/// Current authentication state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthSession {
    pub active: bool,
    pub user: Option<Identity>,
}

impl AuthSession {
    /// Active session for `user`
    pub fn signed_in(user: Identity) -> Self {
        Self {
            active: true,
            user: Some(user),
        }
    }

    /// No active session
    pub fn expired() -> Self {
        Self::default()
    }
}

/// Reports the current authentication state
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_session(&self) -> AuthSession;
}

/// Primary record written when a song is published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub genre: String,
    pub tuning: String,
    pub difficulty: String,
    pub xp_reward: u32,
    pub coin_reward: u32,
    pub max_attempts: u32,
    pub audio_source: String,
    pub duration_secs: f64,
    pub created_by: String,
}

/// Note sequence record tied to a published song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSequence {
    pub song_id: String,
    pub notes: Vec<NoteEvent>,
    pub created_by: String,
}

/// Identity and stored fields of a created record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
    #[serde(default)]
    pub data: Value,
}

/// Song and note sequence persistence.
///
/// The two calls are independent; nothing ties them into a transaction.
#[async_trait]
pub trait SongService: Send + Sync {
    async fn create_song(&self, song: NewSong) -> Result<CreatedRecord, RemoteError>;

    async fn create_sequence(&self, sequence: NewSequence) -> Result<CreatedRecord, RemoteError>;
}
