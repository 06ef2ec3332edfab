// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Riffsmith - content authoring editor for instrument lessons.
//!
//! Authors build a song, timed challenge, exercise or theory lesson
//! through an ordered, gated sequence of steps and then save or publish
//! it. [`editor::EditorOrchestrator`] is the entry point.

pub mod config;
pub mod content;
pub mod editor;
pub mod error;
pub mod media;
pub mod remote;
pub mod services;
pub mod validation;

pub use config::EditorConfig;
pub use content::{Content, ContentType};
pub use editor::{EditorOrchestrator, EditorServices, EditorSession};
pub use error::{EditorError, ErrorKind, Result};
