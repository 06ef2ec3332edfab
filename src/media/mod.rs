// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio metadata probing.
//!
//! Turns an uploaded media blob into duration and descriptive metadata.
//! Decoding sits behind [`MediaDecoder`]; [`SymphoniaDecoder`] is the
//! built-in implementation.

pub mod decoder;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::content::AudioReference;
use crate::error::MediaError;

pub use decoder::SymphoniaDecoder;

/// Raw media as uploaded by the author
#[derive(Debug, Clone, PartialEq)]
pub struct MediaBlob {
    /// File name
    pub name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// File contents
    pub data: Arc<Vec<u8>>,
}

impl MediaBlob {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: Arc::new(data),
        }
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// File extension, lowercased
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        (!ext.is_empty()).then(|| ext.to_lowercase())
    }
}

/// What a decoder learned about a stream
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedStream {
    pub duration_secs: f64,
    pub sample_rate: Option<u32>,
    pub channels: Option<usize>,
    pub codec: Option<String>,
}

/// Decodes enough of a blob to report its duration
#[async_trait]
pub trait MediaDecoder: Send + Sync {
    async fn decode(&self, blob: &MediaBlob) -> Result<DecodedStream, MediaError>;
}

/// Probe result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMetadata {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub duration_secs: f64,
    #[serde(default)]
    pub sample_rate: Option<u32>,
    #[serde(default)]
    pub channels: Option<usize>,
    #[serde(default)]
    pub codec: Option<String>,
}

impl AudioMetadata {
    /// Audio reference for the song content, pointing at `source`
    pub fn into_reference(self, source: impl Into<String>) -> AudioReference {
        AudioReference {
            source: source.into(),
            name: self.name,
            mime_type: self.mime_type,
            size_bytes: self.size_bytes,
            duration_secs: self.duration_secs,
        }
    }
}

/// Audio metadata prober
#[derive(Clone)]
pub struct AudioProber {
    decoder: Arc<dyn MediaDecoder>,
}

impl AudioProber {
    pub fn new(decoder: Arc<dyn MediaDecoder>) -> Self {
        Self { decoder }
    }

    /// Prober backed by symphonia
    pub fn symphonia() -> Self {
        Self::new(Arc::new(SymphoniaDecoder::new()))
    }

    /// Probe a blob for duration and metadata
    pub async fn probe(&self, blob: &MediaBlob) -> Result<AudioMetadata, MediaError> {
        if blob.data.is_empty() {
            return Err(MediaError::Empty);
        }
        let stream = self.decoder.decode(blob).await?;
        if !stream.duration_secs.is_finite() || stream.duration_secs <= 0.0 {
            return Err(MediaError::Decode(format!("{} has no playable duration", blob.name)));
        }
        Ok(AudioMetadata {
            name: blob.name.clone(),
            size_bytes: blob.size(),
            mime_type: blob.mime_type.clone(),
            duration_secs: stream.duration_secs,
            sample_rate: stream.sample_rate,
            channels: stream.channels,
            codec: stream.codec,
        })
    }
}

impl std::fmt::Debug for AudioProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioProber").finish_non_exhaustive()
    }
}
