// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Symphonia-backed media decoder.
//!
//! Probes the container, decodes the first packet of the default track to
//! prove the stream is playable, and reads the duration from the frame
//! count (or, when the container does not declare one, from the summed
//! packet durations).

use std::io::Cursor;

use async_trait::async_trait;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::MediaError;

use super::{DecodedStream, MediaBlob, MediaDecoder};

/// Decoder using symphonia's default format and codec registries
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaDecoder for SymphoniaDecoder {
    async fn decode(&self, blob: &MediaBlob) -> Result<DecodedStream, MediaError> {
        let name = blob.name.clone();
        let mime_type = blob.mime_type.clone();
        let extension = blob.extension();
        let data = blob.data.clone();

        tokio::task::spawn_blocking(move || {
            probe_stream(&name, &mime_type, extension.as_deref(), (*data).clone())
        })
        .await
        .map_err(|e| MediaError::Task(e.to_string()))?
    }
}

fn probe_stream(
    name: &str,
    mime_type: &str,
    extension: Option<&str>,
    data: Vec<u8>,
) -> Result<DecodedStream, MediaError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

    let mut hint = Hint::new();
    hint.mime_type(mime_type);
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| MediaError::Unsupported(format!("{}: {}", name, e)))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| MediaError::Unsupported(format!("{}: no audio track found", name)))?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let codecs = symphonia::default::get_codecs();
    let codec = codecs
        .get_codec(params.codec)
        .map(|descriptor| descriptor.short_name.to_string());
    let mut decoder = codecs
        .make(&params, &DecoderOptions::default())
        .map_err(|e| MediaError::Unsupported(format!("{}: {}", name, e)))?;

    // Decode the first packet; a header that probes but does not decode is corrupt
    let first = next_track_packet(format.as_mut(), track_id, name)?
        .ok_or_else(|| MediaError::Decode(format!("{}: stream has no packets", name)))?;
    decoder
        .decode(&first)
        .map_err(|e| MediaError::Decode(format!("{}: {}", name, e)))?;
    let first_dur = first.dur;

    let timestamps = match params.n_frames {
        Some(frames) => frames,
        None => {
            let mut total = first_dur;
            while let Some(packet) = next_track_packet(format.as_mut(), track_id, name)? {
                total += packet.dur;
            }
            total
        }
    };

    let duration_secs = match (params.time_base, params.sample_rate) {
        (Some(time_base), _) => {
            let time = time_base.calc_time(timestamps);
            time.seconds as f64 + time.frac
        }
        (None, Some(rate)) if rate > 0 => timestamps as f64 / rate as f64,
        _ => {
            return Err(MediaError::Decode(format!("{}: stream has no time base", name)));
        }
    };

    debug!(
        file = name,
        duration_secs,
        sample_rate = ?params.sample_rate,
        codec = ?codec,
        "Probed audio"
    );

    Ok(DecodedStream {
        duration_secs,
        sample_rate: params.sample_rate,
        channels: params.channels.map(|c| c.count()),
        codec,
    })
}

/// Next packet belonging to `track_id`, or None at end of stream
fn next_track_packet(
    format: &mut dyn FormatReader,
    track_id: u32,
    name: &str,
) -> Result<Option<symphonia::core::formats::Packet>, MediaError> {
    loop {
        match format.next_packet() {
            Ok(packet) if packet.track_id() == track_id => return Ok(Some(packet)),
            Ok(_) => continue,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(None);
            }
            Err(SymphoniaError::ResetRequired) => return Ok(None),
            Err(e) => return Err(MediaError::Decode(format!("{}: {}", name, e))),
        }
    }
}
