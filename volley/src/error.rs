/// Misconfiguration detected while assembling a scenario.
///
/// Every variant is raised eagerly, at the call that introduced the problem,
/// so a broken scenario never reaches the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// An injection profile without steps would never start a virtual user.
    #[error("injection profile must contain at least one step")]
    EmptyInjection,

    /// `throttle` was called without a single throttle step.
    #[error("throttling profile must contain at least one step")]
    EmptyThrottling,

    #[error("set up must contain at least one population")]
    EmptySetUp,

    #[error("scenario names must be unique, '{0}' is set up more than once")]
    DuplicateScenario(String),
}
