use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// One block of an injection profile.
///
/// The core never schedules users itself: steps are packaged untouched for the
/// injection scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionStep {
    /// Start nobody for a while.
    NothingFor(Duration),
    /// Start `n` users at once.
    AtOnceUsers(u64),
    /// Start `users` users evenly spread over `during`.
    RampUsers { users: u64, during: Duration },
    /// Start `rate` users per second for `during`.
    ConstantUsersPerSec { rate: f64, during: Duration },
    /// Linearly move from `from` to `to` users per second over `during`.
    RampUsersPerSec { from: f64, to: f64, during: Duration },
}

impl InjectionStep {
    pub fn duration(&self) -> Duration {
        match self {
            InjectionStep::NothingFor(d) => *d,
            InjectionStep::AtOnceUsers(_) => Duration::ZERO,
            InjectionStep::RampUsers { during, .. }
            | InjectionStep::ConstantUsersPerSec { during, .. }
            | InjectionStep::RampUsersPerSec { during, .. } => *during,
        }
    }

    /// Number of users this step starts. Rates are rounded to the closest user.
    pub fn users(&self) -> u64 {
        match self {
            InjectionStep::NothingFor(_) => 0,
            InjectionStep::AtOnceUsers(n) => *n,
            InjectionStep::RampUsers { users, .. } => *users,
            InjectionStep::ConstantUsersPerSec { rate, during } => {
                rate_to_users(*rate, *during)
            }
            // average of a linear ramp
            InjectionStep::RampUsersPerSec { from, to, during } => {
                rate_to_users((from + to) / 2.0, *during)
            }
        }
    }
}

fn rate_to_users(rate: f64, during: Duration) -> u64 {
    let users = (rate * during.as_secs_f64()).round();
    if users.is_nan() || users <= 0.0 {
        0
    } else {
        users as u64
    }
}

/// When and how many virtual users start. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InjectionProfile {
    steps: Vec<InjectionStep>,
}

impl InjectionProfile {
    pub fn new(steps: impl IntoIterator<Item = InjectionStep>) -> Result<Self, ConfigurationError> {
        let steps: Vec<InjectionStep> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(ConfigurationError::EmptyInjection);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[InjectionStep] {
        &self.steps
    }

    pub fn total_users(&self) -> u64 {
        self.steps
            .iter()
            .map(InjectionStep::users)
            .fold(0, u64::saturating_add)
    }

    pub fn duration(&self) -> Duration {
        self.steps
            .iter()
            .map(InjectionStep::duration)
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl TryFrom<Vec<InjectionStep>> for InjectionProfile {
    type Error = ConfigurationError;

    fn try_from(steps: Vec<InjectionStep>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

// Deserializing goes through `new` so a profile read from settings is never empty.
impl<'de> Deserialize<'de> for InjectionProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let steps = Vec::<InjectionStep>::deserialize(deserializer)?;
        Self::new(steps).map_err(serde::de::Error::custom)
    }
}
