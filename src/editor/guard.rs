// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Single-flight guard for mutating operations.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::error::{EditorError, Result};

/// In-flight flag shared by every mutating operation of one orchestrator
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the flag, or fail immediately if another operation holds it.
    ///
    /// The flag is released when the returned permit drops, on every exit
    /// path.
    pub fn acquire(&self, operation: &'static str) -> Result<FlightPermit<'_>> {
        match self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                debug!(operation, "Operation started");
                Ok(FlightPermit {
                    flag: self,
                    operation,
                })
            }
            Err(_) => {
                warn!(operation, "Rejected: another operation is in flight");
                Err(EditorError::Concurrency)
            }
        }
    }

    /// Whether an operation is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns the in-flight flag
#[derive(Debug)]
pub struct FlightPermit<'a> {
    flag: &'a SingleFlight,
    operation: &'static str,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.flag.busy.store(false, Ordering::Release);
        debug!(operation = self.operation, "Operation finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let flight = SingleFlight::new();
        let permit = flight.acquire("save").unwrap();
        assert!(flight.is_busy());
        assert_eq!(flight.acquire("publish").unwrap_err(), EditorError::Concurrency);

        drop(permit);
        assert!(!flight.is_busy());
        assert!(flight.acquire("publish").is_ok());
    }

    #[test]
    fn test_release_on_early_return() {
        fn failing(flight: &SingleFlight) -> Result<()> {
            let _permit = flight.acquire("save")?;
            Err(EditorError::state("no content type selected"))
        }

        let flight = SingleFlight::new();
        assert!(failing(&flight).is_err());
        assert!(!flight.is_busy());
    }
}
