use std::{sync::Arc, time::Duration};

use super::{Scenario, ScenarioBuilder};
use crate::{
    action::{ChainContext, Exit},
    error::ConfigurationError,
    injection::InjectionProfile,
    pause::{PauseExpression, PauseType},
    protocol::{Protocol, ProtocolRegistry},
    session::Session,
    settings::GlobalSettings,
    throttle::{ThrottleStep, ThrottlingProfile},
};

/// A scenario with its injection profile and its own run policies.
///
/// Setters return a new builder and never fail, except [`throttle`](Self::throttle)
/// which rejects an empty step list. Nothing is resolved until
/// [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct PopulationBuilder {
    scenario: ScenarioBuilder,
    injection: InjectionProfile,
    default_protocols: ProtocolRegistry,
    protocols: Vec<Arc<dyn Protocol>>,
    pause_type: Option<PauseType>,
    throttling: Option<ThrottlingProfile>,
}

impl PopulationBuilder {
    pub(super) fn new(
        scenario: ScenarioBuilder,
        injection: InjectionProfile,
        default_protocols: ProtocolRegistry,
    ) -> Self {
        Self {
            scenario,
            injection,
            default_protocols,
            protocols: Vec::new(),
            pause_type: None,
            throttling: None,
        }
    }

    pub fn name(&self) -> &str {
        self.scenario.name()
    }

    pub fn injection(&self) -> &InjectionProfile {
        &self.injection
    }

    pub fn default_protocols(&self) -> &ProtocolRegistry {
        &self.default_protocols
    }

    pub fn throttling(&self) -> Option<&ThrottlingProfile> {
        self.throttling.as_ref()
    }

    /// Overrides a protocol for this scenario only.
    pub fn with_protocol<P: Protocol>(&self, protocol: P) -> Self {
        self.with_protocols([Arc::new(protocol) as Arc<dyn Protocol>])
    }

    /// Overrides protocols for this scenario only. For a given kind the last one wins.
    pub fn with_protocols(&self, protocols: impl IntoIterator<Item = Arc<dyn Protocol>>) -> Self {
        let mut next = self.clone();
        next.protocols.extend(protocols);
        next
    }

    /// Sets the scenario pause type, replacing any previous one.
    pub fn pauses(&self, pause_type: PauseType) -> Self {
        Self {
            pause_type: Some(pause_type),
            ..self.clone()
        }
    }

    pub fn disable_pauses(&self) -> Self {
        self.pauses(PauseType::Disabled)
    }

    pub fn constant_pauses(&self) -> Self {
        self.pauses(PauseType::Constant)
    }

    pub fn exponential_pauses(&self) -> Self {
        self.pauses(PauseType::Exponential)
    }

    pub fn custom_pauses<F>(&self, f: F) -> Self
    where
        F: Fn(&Session) -> Duration + Send + Sync + 'static,
    {
        self.pauses(PauseType::Custom(PauseExpression::new(f)))
    }

    pub fn uniform_pauses_percentage(&self, percentage: f64) -> Self {
        self.pauses(PauseType::UniformPercentage(percentage))
    }

    pub fn uniform_pauses_duration(&self, spread: Duration) -> Self {
        self.pauses(PauseType::UniformDuration(spread))
    }

    /// Throttles this scenario, replacing any previous throttling.
    ///
    /// Fails with [`ConfigurationError::EmptyThrottling`] if no step is given at all.
    ///
    /// Steps keep their order inside a group, but the groups themselves are laid out
    /// last group first: `[[a1, a2], [b1, b2]]` gives `[b1, b2, a1, a2]`. Pass a single
    /// group to get the steps exactly as written.
    // TODO: decide whether multi-group calls should keep call order instead.
    pub fn throttle<G, S>(&self, groups: G) -> Result<Self, ConfigurationError>
    where
        G: IntoIterator<Item = S>,
        S: IntoIterator<Item = ThrottleStep>,
    {
        let groups: Vec<Vec<ThrottleStep>> = groups
            .into_iter()
            .map(|group| group.into_iter().collect())
            .collect();
        let throttling = ThrottlingProfile::new(groups.into_iter().rev().flatten())?;
        Ok(Self {
            throttling: Some(throttling),
            ..self.clone()
        })
    }

    /// Pause type the chain will be built with.
    ///
    /// Throttling, set either on the run or on this scenario, disables pauses.
    /// Otherwise the scenario pause type wins over the run one.
    pub fn resolve_pause_type(&self, globals: &GlobalSettings) -> PauseType {
        if globals.is_throttled() || self.throttling.is_some() {
            match &self.pause_type {
                Some(requested) if !requested.is_disabled() => tracing::warn!(
                    "Scenario {} is throttled, ignoring its {:?} pauses",
                    self.name(),
                    requested
                ),
                _ => {}
            }
            return PauseType::Disabled;
        }
        self.pause_type
            .clone()
            .unwrap_or_else(|| globals.pause_type.clone())
    }

    /// Protocols the chain will be built with: defaults, then run-wide ones, then
    /// the scenario overrides, each layer replacing the previous one kind by kind.
    pub fn resolve_protocols(&self, globals: &GlobalSettings) -> ProtocolRegistry {
        let overrides = self
            .protocols
            .iter()
            .cloned()
            .fold(ProtocolRegistry::new(), ProtocolRegistry::with_shared);
        self.default_protocols
            .merge(&globals.protocols)
            .merge(&overrides)
    }

    /// Resolves every policy against `globals` and materializes the chain.
    ///
    /// The resolved protocols are warmed up once, before the chain is built.
    pub fn build(self, globals: &GlobalSettings) -> Scenario {
        tracing::info!("Building scenario {}", self.name());
        let pause_type = self.resolve_pause_type(globals);
        let protocols = self.resolve_protocols(globals);

        protocols.warm_up(globals);

        let ctx = ChainContext {
            scenario: Arc::clone(&self.scenario.name),
            protocols: protocols.clone(),
            pause_type: pause_type.clone(),
            throttled: globals.is_throttled() || self.throttling.is_some(),
        };
        let entry = self.scenario.chain.build(&ctx, Arc::new(Exit));
        tracing::debug!(
            "Scenario {} built with {} action(s), {:?} pauses",
            self.name(),
            self.scenario.chain.len(),
            pause_type
        );

        Scenario {
            name: ctx.scenario,
            entry,
            injection: self.injection,
            protocols,
            pause_type,
            throttling: self.throttling,
        }
    }
}
