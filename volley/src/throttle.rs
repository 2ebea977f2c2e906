//! Throughput throttling profiles.
//!
//! A [`ThrottlingProfile`] describes the target requests-per-second (RPS) over the
//! course of a run as a list of [`ThrottleStep`]s. Enforcing it belongs to the
//! execution engine; this module only describes the curve.
//!
//! # Shape of the curve
//!
//! The rate starts at 0 and each step moves it:
//!
//! - `ReachRps { target, during }` ramps linearly from the current rate to `target`
//!   over `during`. A zero `during` behaves like a jump.
//! - `JumpToRps(target)` switches to `target` instantly.
//! - `HoldFor(d)` keeps the current rate for `d`.
//!
//! Within a ramp, at `elapsed` since the ramp started:
//!
//! ```text
//! t = elapsed / during
//! r(t) = start_rate + (target - start_rate) * t
//! ```
//!
//! Past the last step the final rate is held.
//!
//! Throttling and pauses are mutually exclusive: a throttled scenario runs with
//! its pauses disabled.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// One step of a throttling profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleStep {
    ReachRps { target: f64, during: Duration },
    JumpToRps(f64),
    HoldFor(Duration),
}

impl ThrottleStep {
    /// Use `ThrottleStep::reach_rps(100.0, Duration::from_secs(10))` to ramp to 100 RPS over 10s.
    pub fn reach_rps(target: f64, during: Duration) -> Self {
        Self::ReachRps { target, during }
    }

    pub fn jump_to_rps(target: f64) -> Self {
        Self::JumpToRps(target)
    }

    pub fn hold_for(duration: Duration) -> Self {
        Self::HoldFor(duration)
    }

    pub fn duration(&self) -> Duration {
        match self {
            ThrottleStep::ReachRps { during, .. } => *during,
            ThrottleStep::JumpToRps(_) => Duration::ZERO,
            ThrottleStep::HoldFor(d) => *d,
        }
    }
}

/// Target throughput over time. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ThrottlingProfile {
    steps: Vec<ThrottleStep>,
}

impl ThrottlingProfile {
    pub fn new(steps: impl IntoIterator<Item = ThrottleStep>) -> Result<Self, ConfigurationError> {
        let steps: Vec<ThrottleStep> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(ConfigurationError::EmptyThrottling);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ThrottleStep] {
        &self.steps
    }

    pub fn duration(&self) -> Duration {
        self.steps
            .iter()
            .map(ThrottleStep::duration)
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Target RPS at `elapsed` since the start of the run.
    pub fn rate_at(&self, elapsed: Duration) -> f64 {
        let mut rate = 0.0;
        let mut step_start = Duration::ZERO;

        for step in &self.steps {
            match *step {
                ThrottleStep::JumpToRps(target) => rate = target,
                ThrottleStep::HoldFor(d) => {
                    let step_end = step_start.saturating_add(d);
                    if elapsed < step_end {
                        return rate;
                    }
                    step_start = step_end;
                }
                ThrottleStep::ReachRps { target, during } => {
                    // instantly jump to target rate
                    if during.is_zero() {
                        rate = target;
                        continue;
                    }
                    let step_end = step_start.saturating_add(during);
                    if elapsed < step_end {
                        return interpolate(elapsed - step_start, during, rate, target);
                    }
                    // the next step starts from the exact target, not an interpolated value
                    rate = target;
                    step_start = step_end;
                }
            }
        }
        rate
    }
}

/// Linear interpolation between `start_rate` and `end_rate`, capped at `end_rate`.
fn interpolate(elapsed: Duration, during: Duration, start_rate: f64, end_rate: f64) -> f64 {
    // interpolation factor [0..1]
    let t = (elapsed.as_secs_f64() / during.as_secs_f64()).min(1.0);
    start_rate + (end_rate - start_rate) * t
}

impl TryFrom<Vec<ThrottleStep>> for ThrottlingProfile {
    type Error = ConfigurationError;

    fn try_from(steps: Vec<ThrottleStep>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl<'de> Deserialize<'de> for ThrottlingProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let steps = Vec::<ThrottleStep>::deserialize(deserializer)?;
        Self::new(steps).map_err(serde::de::Error::custom)
    }
}
