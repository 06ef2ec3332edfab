// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Editor orchestration.
//!
//! This module provides:
//! - The session store and its mutations
//! - Gated step navigation
//! - The single-flight guard over mutating operations
//! - The publish pipeline
//! - The orchestrator tying them together

pub mod guard;
pub mod navigator;
pub mod orchestrator;
pub mod publish;
pub mod session;

pub use guard::{FlightPermit, SingleFlight};
pub use navigator::{check_navigation, Navigation};
pub use orchestrator::{EditorOrchestrator, EditorServices};
pub use publish::{PublishOutcome, PublishPipeline};
pub use session::{EditorSession, SessionMutation, SessionStore};
