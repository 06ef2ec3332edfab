// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Randomized stand-in for the backend.
//!
//! Waits a random number of delay units, then fails with a fixed
//! probability regardless of input. Intended for development and demos.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SimulatorConfig;
use crate::error::RemoteError;

use super::{RemoteOperation, ServerResult};

/// Simulated backend with random latency and failures
#[derive(Debug)]
pub struct SimulatedRemote {
    config: SimulatorConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedRemote {
    /// Create a simulator; a configured seed makes it reproducible
    pub fn new(mut config: SimulatorConfig) -> Self {
        if config.failure_rate.is_finite() {
            config.failure_rate = config.failure_rate.clamp(0.0, 1.0);
        } else {
            warn!(failure_rate = config.failure_rate, "Ignoring non-finite failure rate");
            config.failure_rate = 0.0;
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Roll the delay and the failure for one call
    fn roll(&self) -> (Duration, bool) {
        let mut rng = match self.rng.lock() {
            Ok(rng) => rng,
            Err(poisoned) => poisoned.into_inner(),
        };
        let min = self.config.min_delay_units.min(self.config.max_delay_units);
        let max = self.config.max_delay_units.max(min);
        let units = rng.gen_range(min..=max);
        let delay = Duration::from_millis(self.config.delay_unit_ms * units as u64);
        let fails = rng.gen_bool(self.config.failure_rate);
        (delay, fails)
    }
}

#[async_trait]
impl RemoteOperation for SimulatedRemote {
    async fn execute(&self, operation: &str, _payload: Value) -> Result<ServerResult, RemoteError> {
        let (delay, fails) = self.roll();
        debug!(operation, delay_ms = delay.as_millis() as u64, fails, "Simulating round trip");
        tokio::time::sleep(delay).await;

        if fails {
            return Err(RemoteError::Failed {
                operation: operation.to_string(),
                message: "simulated backend failure".to_string(),
            });
        }

        Ok(ServerResult::ok(format!("{} completed", operation))
            .with_data(json!({ "id": Uuid::new_v4().to_string() })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(failure_rate: f64, seed: u64) -> SimulatorConfig {
        SimulatorConfig {
            delay_unit_ms: 1,
            min_delay_units: 1,
            max_delay_units: 3,
            failure_rate,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_delay_within_range() {
        let sim = SimulatedRemote::new(config(0.1, 3));
        for _ in 0..200 {
            let (delay, _) = sim.roll();
            assert!(delay >= Duration::from_millis(1));
            assert!(delay <= Duration::from_millis(3));
        }
    }

    #[test]
    fn test_seeded_rolls_are_reproducible() {
        let a = SimulatedRemote::new(config(0.5, 99));
        let b = SimulatedRemote::new(config(0.5, 99));
        for _ in 0..50 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn test_failure_rate_roughly_holds() {
        let sim = SimulatedRemote::new(config(0.1, 11));
        let failures = (0..2000).filter(|_| sim.roll().1).count();
        assert!(failures > 100 && failures < 300, "failures = {}", failures);
    }

    #[test]
    fn test_out_of_range_failure_rates() {
        let sim = SimulatedRemote::new(config(f64::NAN, 5));
        assert_eq!(sim.config.failure_rate, 0.0);
        assert!((0..100).all(|_| !sim.roll().1));

        let sim = SimulatedRemote::new(config(f64::INFINITY, 5));
        assert_eq!(sim.config.failure_rate, 0.0);

        let sim = SimulatedRemote::new(config(7.5, 5));
        assert_eq!(sim.config.failure_rate, 1.0);
        assert!((0..100).all(|_| sim.roll().1));

        let sim = SimulatedRemote::new(config(-0.5, 5));
        assert_eq!(sim.config.failure_rate, 0.0);
    }

    #[tokio::test]
    async fn test_nan_rate_from_yaml_does_not_fail_calls() {
        let mut parsed = crate::config::EditorConfig::from_yaml(
            "simulator:\n  delay_unit_ms: 1\n  failure_rate: .nan\n  seed: 2\n",
        )
        .unwrap();
        assert!(parsed.simulator.failure_rate.is_nan());
        parsed.simulator.max_delay_units = 1;

        let sim = SimulatedRemote::new(parsed.simulator);
        let result = sim.execute("save", Value::Null).await.unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_execute_success_and_failure() {
        let ok = SimulatedRemote::new(config(0.0, 1));
        let result = ok.execute("save", Value::Null).await.unwrap();
        assert!(result.success);
        assert!(result.data_str("id").is_some());

        let failing = SimulatedRemote::new(config(1.0, 1));
        let err = failing.execute("stats", Value::Null).await.unwrap_err();
        assert_eq!(err.operation(), "stats");
    }
}
