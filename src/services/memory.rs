// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! In-memory collaborators.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RemoteError;

use super::{
    AuthProvider, AuthSession, ConfirmationPrompt, CreatedRecord, Identity, NewSequence, NewSong,
    SongService,
};

/// Prompt that always gives the same answer and counts questions
#[derive(Debug, Default)]
pub struct FixedConfirmation {
    answer: bool,
    asked: AtomicUsize,
}

impl FixedConfirmation {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    /// Number of questions asked so far
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmationPrompt for FixedConfirmation {
    async fn ask(&self, _question: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

/// Auth provider returning a fixed session
#[derive(Debug)]
pub struct StaticAuth {
    session: Mutex<AuthSession>,
}

impl StaticAuth {
    pub fn new(session: AuthSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    /// Signed in as a user with the given id
    pub fn signed_in(user_id: &str) -> Self {
        Self::new(AuthSession::signed_in(Identity {
            id: user_id.to_string(),
            display_name: user_id.to_string(),
        }))
    }

    /// Replace the reported session
    pub fn set(&self, session: AuthSession) {
        match self.session.lock() {
            Ok(mut current) => *current = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_session(&self) -> AuthSession {
        match self.session.lock() {
            Ok(session) => session.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Records {
    songs: Vec<(String, NewSong)>,
    sequences: Vec<(String, NewSequence)>,
}

/// Song service keeping records in memory.
///
/// Can be told to fail song or sequence creation to exercise partial
/// publishes.
#[derive(Debug, Default)]
pub struct InMemorySongService {
    records: Mutex<Records>,
    fail_songs: AtomicBool,
    fail_sequences: AtomicBool,
}

impl InMemorySongService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent song creations fail
    pub fn fail_songs(&self, fail: bool) {
        self.fail_songs.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent sequence creations fail
    pub fn fail_sequences(&self, fail: bool) {
        self.fail_sequences.store(fail, Ordering::SeqCst);
    }

    /// Songs created so far, with their ids
    pub fn songs(&self) -> Vec<(String, NewSong)> {
        self.lock().songs.clone()
    }

    /// Sequences created so far, with their ids
    pub fn sequences(&self) -> Vec<(String, NewSequence)> {
        self.lock().sequences.clone()
    }

    /// Total create calls that succeeded
    pub fn created_count(&self) -> usize {
        let records = self.lock();
        records.songs.len() + records.sequences.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Records> {
        match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl SongService for InMemorySongService {
    async fn create_song(&self, song: NewSong) -> Result<CreatedRecord, RemoteError> {
        if self.fail_songs.load(Ordering::SeqCst) {
            return Err(RemoteError::Failed {
                operation: "create_song".to_string(),
                message: "song store unavailable".to_string(),
            });
        }
        let id = Uuid::new_v4().to_string();
        let data = serde_json::to_value(&song).unwrap_or_default();
        self.lock().songs.push((id.clone(), song));
        Ok(CreatedRecord { id, data })
    }

    async fn create_sequence(&self, sequence: NewSequence) -> Result<CreatedRecord, RemoteError> {
        if self.fail_sequences.load(Ordering::SeqCst) {
            return Err(RemoteError::Failed {
                operation: "create_sequence".to_string(),
                message: "sequence store unavailable".to_string(),
            });
        }
        let id = Uuid::new_v4().to_string();
        let data = serde_json::to_value(&sequence).unwrap_or_default();
        self.lock().sequences.push((id.clone(), sequence));
        Ok(CreatedRecord { id, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NoteEvent;

    fn new_song() -> NewSong {
        NewSong {
            title: "Smoke".to_string(),
            genre: "rock".to_string(),
            tuning: "standard".to_string(),
            difficulty: "beginner".to_string(),
            xp_reward: 100,
            coin_reward: 10,
            max_attempts: 3,
            audio_source: "blob:1".to_string(),
            duration_secs: 10.0,
            created_by: "u1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_song_then_sequence() {
        let service = InMemorySongService::new();
        let song = service.create_song(new_song()).await.unwrap();
        let sequence = service
            .create_sequence(NewSequence {
                song_id: song.id.clone(),
                notes: vec![NoteEvent::new(0.0, 40, 1.0)],
                created_by: "u1".to_string(),
            })
            .await
            .unwrap();

        assert_ne!(song.id, sequence.id);
        assert_eq!(song.data["title"], "Smoke");
        assert_eq!(service.sequences()[0].1.song_id, song.id);
        assert_eq!(service.created_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let service = InMemorySongService::new();
        service.fail_sequences(true);
        assert!(service.create_song(new_song()).await.is_ok());
        let err = service
            .create_sequence(NewSequence {
                song_id: "x".to_string(),
                notes: Vec::new(),
                created_by: "u1".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.operation(), "create_sequence");
        assert_eq!(service.songs().len(), 1);
        assert!(service.sequences().is_empty());
    }

    #[tokio::test]
    async fn test_static_auth_and_prompt() {
        let auth = StaticAuth::signed_in("instructor");
        assert!(auth.current_session().await.active);
        auth.set(AuthSession::expired());
        assert!(!auth.current_session().await.active);

        let prompt = FixedConfirmation::new(false);
        assert!(!prompt.ask("Discard?").await);
        assert_eq!(prompt.asked(), 1);
    }
}
