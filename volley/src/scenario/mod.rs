//! Scenario assembly.
//!
//! Building a scenario goes through three values, each one immutable:
//!
//! 1. [`ScenarioBuilder`]: a name and the ordered list of steps, extended with
//!    `exec`, `pause` or any custom [`ActionBuilder`].
//! 2. [`PopulationBuilder`]: returned by [`ScenarioBuilder::inject`], it carries the
//!    injection profile and the scenario-level overrides (protocols, pauses,
//!    throttling).
//! 3. [`Scenario`]: the resolved, read-only description handed to the execution
//!    engine, produced by [`PopulationBuilder::build`].
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use volley::{GlobalSettings, InjectionStep, scenario};
//!
//! let checkout = scenario("checkout")
//!     .exec("pick item", |session| {
//!         session.set("item", 42);
//!     })
//!     .pause(Duration::from_secs(2))
//!     .inject([InjectionStep::AtOnceUsers(10)])
//!     .unwrap()
//!     .exponential_pauses()
//!     .build(&GlobalSettings::default());
//!
//! assert_eq!(checkout.name(), "checkout");
//! assert_eq!(checkout.entry().name(), "pick item");
//! ```
mod population;

pub use population::PopulationBuilder;

use std::{
    fmt::{self, Debug},
    sync::Arc,
    time::Duration,
};

use crate::{
    action::{Action, ActionBuilder, ExecBuilder, PauseBuilder},
    chain::ActionChain,
    error::ConfigurationError,
    injection::{InjectionProfile, InjectionStep},
    pause::PauseType,
    protocol::ProtocolRegistry,
    session::Session,
    throttle::ThrottlingProfile,
};

/// A named, ordered list of steps.
///
/// Every method returns a new builder; the one it was called on is never modified.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    name: Arc<str>,
    chain: ActionChain,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            chain: ActionChain::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain(&self) -> &ActionChain {
        &self.chain
    }

    pub fn append(&self, builder: impl ActionBuilder + 'static) -> Self {
        Self {
            name: Arc::clone(&self.name),
            chain: self.chain.append(builder),
        }
    }

    pub fn exec<F>(&self, name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&mut Session) + Send + Sync + 'static,
    {
        self.append(ExecBuilder::new(name, f))
    }

    pub fn pause(&self, duration: Duration) -> Self {
        self.append(PauseBuilder::new(duration))
    }

    /// Attaches the injection profile, turning the scenario into a population.
    ///
    /// Fails with [`ConfigurationError::EmptyInjection`] when `steps` is empty.
    /// The protocols the steps require by default are captured here.
    pub fn inject(
        &self,
        steps: impl IntoIterator<Item = InjectionStep>,
    ) -> Result<PopulationBuilder, ConfigurationError> {
        let injection = InjectionProfile::new(steps)?;
        let default_protocols = self.chain.default_protocols();
        tracing::debug!(
            "Scenario {} requires {} default protocol(s)",
            self.name,
            default_protocols.len()
        );
        Ok(PopulationBuilder::new(
            self.clone(),
            injection,
            default_protocols,
        ))
    }
}

/// A fully resolved scenario, ready to be run.
#[derive(Clone)]
pub struct Scenario {
    name: Arc<str>,
    entry: Arc<dyn Action>,
    injection: InjectionProfile,
    protocols: ProtocolRegistry,
    pause_type: PauseType,
    throttling: Option<ThrottlingProfile>,
}

impl Scenario {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First action of the chain. Each virtual user starts here.
    pub fn entry(&self) -> &Arc<dyn Action> {
        &self.entry
    }

    pub fn injection(&self) -> &InjectionProfile {
        &self.injection
    }

    pub fn protocols(&self) -> &ProtocolRegistry {
        &self.protocols
    }

    /// Pause type the chain was built with.
    pub fn pause_type(&self) -> &PauseType {
        &self.pause_type
    }

    /// Throttling set on this scenario, if any. Run-wide throttling is not repeated here.
    pub fn throttling(&self) -> Option<&ThrottlingProfile> {
        self.throttling.as_ref()
    }
}

impl Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("entry", &self.entry.name())
            .field("injection", &self.injection)
            .field("protocols", &self.protocols)
            .field("pause_type", &self.pause_type)
            .field("throttling", &self.throttling)
            .finish()
    }
}
