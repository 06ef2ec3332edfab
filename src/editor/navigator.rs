// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Gated step navigation.

use crate::content::StepDefinition;

/// Outcome of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Move allowed to this index
    Allowed(usize),
    /// Target step is not defined
    UnknownStep,
    /// Forward move while the current step is incomplete
    CurrentIncomplete,
}

/// Decide whether moving from `current` (index) to step number `target`
/// is allowed.
///
/// Backward and same-step moves always succeed. Forward moves need the
/// current step to be completed; later steps are not looked at.
pub fn check_navigation(steps: &[StepDefinition], current: usize, target: u8) -> Navigation {
    let Some(target_index) = steps.iter().position(|s| s.number == target) else {
        return Navigation::UnknownStep;
    };
    if target_index <= current {
        return Navigation::Allowed(target_index);
    }
    match steps.get(current) {
        Some(step) if step.completed => Navigation::Allowed(target_index),
        _ => Navigation::CurrentIncomplete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{step_definitions, ContentType};

    #[test]
    fn test_backward_and_same_step_allowed() {
        let steps = step_definitions(ContentType::Song);
        assert_eq!(check_navigation(&steps, 2, 1), Navigation::Allowed(0));
        assert_eq!(check_navigation(&steps, 1, 2), Navigation::Allowed(1));
        assert_eq!(check_navigation(&steps, 1, 3), Navigation::CurrentIncomplete);
    }

    #[test]
    fn test_forward_gated_on_current_step() {
        let mut steps = step_definitions(ContentType::Song);
        assert_eq!(check_navigation(&steps, 0, 2), Navigation::CurrentIncomplete);

        steps[0].completed = true;
        assert_eq!(check_navigation(&steps, 0, 2), Navigation::Allowed(1));
        // No look-ahead: jumping past an incomplete step 2 is allowed from a completed step 1
        assert_eq!(check_navigation(&steps, 0, 3), Navigation::Allowed(2));
    }

    #[test]
    fn test_unknown_step() {
        let steps = step_definitions(ContentType::Theory);
        assert_eq!(check_navigation(&steps, 0, 2), Navigation::UnknownStep);
        assert_eq!(check_navigation(&[], 0, 1), Navigation::UnknownStep);
    }
}
