use std::{
    fmt::{self, Debug},
    sync::Arc,
    time::Duration,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// User supplied pause, computed from the virtual user's session.
#[derive(Clone)]
pub struct PauseExpression(Arc<dyn Fn(&Session) -> Duration + Send + Sync>);

impl PauseExpression {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Session) -> Duration + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn evaluate(&self, session: &Session) -> Duration {
        (self.0)(session)
    }
}

impl Debug for PauseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PauseExpression(..)")
    }
}

/// Two expressions are equal only if they share the same closure.
impl PartialEq for PauseExpression {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// How a declared pause is turned into the actual wait of a virtual user.
///
/// Every variant but `Custom` can be read from run settings:
///
/// ```rust
/// use volley::PauseType;
///
/// let pauses: PauseType = serde_json::from_str(r#"{"uniform_percentage": 20.0}"#).unwrap();
/// assert_eq!(pauses, PauseType::UniformPercentage(20.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseType {
    /// Pauses are dropped from the chain.
    Disabled,
    /// The declared duration, as is.
    #[default]
    Constant,
    /// Exponentially distributed, with the declared duration as mean.
    Exponential,
    /// Ignores the declared duration and evaluates the expression instead.
    #[serde(skip)]
    Custom(PauseExpression),
    /// Uniformly drawn within `declared ± declared * percentage / 100`.
    UniformPercentage(f64),
    /// Uniformly drawn within `declared ± duration`.
    UniformDuration(Duration),
}

impl PauseType {
    pub fn is_disabled(&self) -> bool {
        matches!(self, PauseType::Disabled)
    }

    /// Effective pause for a `declared` duration, `None` when pauses are disabled.
    pub fn generate(&self, declared: Duration, session: &Session) -> Option<Duration> {
        match self {
            PauseType::Disabled => None,
            PauseType::Constant => Some(declared),
            PauseType::Exponential => {
                // u is in [0, 1) so the log argument never reaches zero
                let u: f64 = rand::rng().random();
                Some(scale(declared, -(1.0 - u).ln()))
            }
            PauseType::Custom(expression) => Some(expression.evaluate(session)),
            PauseType::UniformPercentage(percentage) => {
                if !percentage.is_finite() {
                    return Some(declared);
                }
                let spread = scale(declared, percentage.abs() / 100.0);
                Some(uniform_around(declared, spread))
            }
            PauseType::UniformDuration(spread) => Some(uniform_around(declared, *spread)),
        }
    }
}

/// `duration * factor`, saturating at `Duration::MAX`.
fn scale(duration: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

fn uniform_around(center: Duration, spread: Duration) -> Duration {
    let min = center.saturating_sub(spread);
    let max = center.saturating_add(spread);
    rand::rng().random_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("pauses", 1)
    }

    #[test]
    fn disabled_never_pauses() {
        assert_eq!(
            PauseType::Disabled.generate(Duration::from_secs(3), &session()),
            None
        );
    }

    #[test]
    fn constant_keeps_declared_duration() {
        assert_eq!(
            PauseType::Constant.generate(Duration::from_secs(3), &session()),
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn uniform_duration_stays_in_bounds() {
        let pause = PauseType::UniformDuration(Duration::from_millis(500));
        for _ in 0..200 {
            let d = pause.generate(Duration::from_secs(1), &session()).unwrap();
            assert!(d >= Duration::from_millis(500) && d <= Duration::from_millis(1500));
        }
    }

    #[test]
    fn uniform_duration_floors_at_zero() {
        let pause = PauseType::UniformDuration(Duration::from_secs(5));
        for _ in 0..200 {
            let d = pause.generate(Duration::from_secs(1), &session()).unwrap();
            assert!(d <= Duration::from_secs(6));
        }
    }

    #[test]
    fn uniform_percentage_stays_in_bounds() {
        let pause = PauseType::UniformPercentage(10.0);
        for _ in 0..200 {
            let d = pause.generate(Duration::from_secs(10), &session()).unwrap();
            assert!(d >= Duration::from_secs(9) && d <= Duration::from_secs(11));
        }
    }

    #[test]
    fn huge_percentage_saturates() {
        let pause = PauseType::UniformPercentage(1e300);
        for _ in 0..20 {
            assert!(pause.generate(Duration::from_secs(1), &session()).is_some());
        }
    }

    #[test]
    fn huge_exponential_pause_saturates() {
        let declared = Duration::MAX - Duration::from_secs(1);
        for _ in 0..20 {
            assert!(PauseType::Exponential.generate(declared, &session()).is_some());
        }
    }

    #[test]
    fn scaling_past_the_max_duration_saturates() {
        assert_eq!(scale(Duration::from_secs(1), 1e300), Duration::MAX);
        assert_eq!(scale(Duration::from_secs(2), 0.5), Duration::from_secs(1));
    }

    #[test]
    fn custom_reads_the_session() {
        let pause = PauseType::Custom(PauseExpression::new(|s: &Session| {
            Duration::from_millis(s.user_id() * 100)
        }));
        let session = Session::new("pauses", 4);

        assert_eq!(
            pause.generate(Duration::from_secs(10), &session),
            Some(Duration::from_millis(400))
        );
    }

    #[test]
    fn custom_equality_is_identity() {
        let expression = PauseExpression::new(|_: &Session| Duration::ZERO);
        let other = PauseExpression::new(|_: &Session| Duration::ZERO);

        assert_eq!(expression, expression.clone());
        assert_ne!(expression, other);
    }

    #[test]
    fn deserializes_from_settings() {
        let disabled: PauseType = serde_json::from_str(r#""disabled""#).unwrap();
        let uniform: PauseType =
            serde_json::from_str(r#"{"uniform_duration":{"secs":2,"nanos":0}}"#).unwrap();

        assert_eq!(disabled, PauseType::Disabled);
        assert_eq!(uniform, PauseType::UniformDuration(Duration::from_secs(2)));
    }

    #[test]
    fn custom_cannot_be_serialized() {
        let pause = PauseType::Custom(PauseExpression::new(|_: &Session| Duration::ZERO));
        assert!(serde_json::to_string(&pause).is_err());
    }
}
