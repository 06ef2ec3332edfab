// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Ordered authoring steps per content type.

use serde::{Deserialize, Serialize};

use super::ContentType;

/// One stage of the authoring sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Step number (1-based)
    pub number: u8,
    /// Display title
    pub title: String,
    /// Whether the step's required fields have been filled
    pub completed: bool,
}

impl StepDefinition {
    /// Create an uncompleted step
    pub fn new(number: u8, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            completed: false,
        }
    }
}

/// Step titles for a content type, in order
fn step_titles(content_type: ContentType) -> &'static [&'static str] {
    match content_type {
        ContentType::Song => &["Upload Audio", "Note Sequence", "Song Details"],
        ContentType::Challenge => &["Time Limit", "Scoring"],
        ContentType::Exercise => &["Instructions", "Worked Examples"],
        ContentType::Theory => &["Lesson Body"],
    }
}

/// Fresh (uncompleted) step list for a content type
pub fn step_definitions(content_type: ContentType) -> Vec<StepDefinition> {
    step_titles(content_type)
        .iter()
        .enumerate()
        .map(|(i, title)| StepDefinition::new(i as u8 + 1, *title))
        .collect()
}

/// Percentage of steps marked completed, rounded down
pub fn progress(steps: &[StepDefinition]) -> u8 {
    if steps.is_empty() {
        return 0;
    }
    let completed = steps.iter().filter(|s| s.completed).count();
    (completed * 100 / steps.len()) as u8
}
