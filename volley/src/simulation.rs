use std::{collections::HashSet, sync::Arc};

use crate::{
    error::ConfigurationError,
    pause::PauseType,
    protocol::{Protocol, ProtocolRegistry},
    scenario::{PopulationBuilder, Scenario},
    settings::GlobalSettings,
    throttle::{ThrottleStep, ThrottlingProfile},
};

/// Every population of a run, plus the settings they share.
///
/// ```rust
/// use volley::{InjectionStep, PauseType, SetUp, scenario};
///
/// let browse = scenario("browse").inject([InjectionStep::AtOnceUsers(10)]).unwrap();
/// let buy = scenario("buy").inject([InjectionStep::AtOnceUsers(2)]).unwrap();
///
/// let scenarios = SetUp::new([browse, buy])
///     .pauses(PauseType::Exponential)
///     .build()
///     .unwrap();
/// assert_eq!(scenarios.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SetUp {
    populations: Vec<PopulationBuilder>,
    settings: GlobalSettings,
}

impl SetUp {
    pub fn new(populations: impl IntoIterator<Item = PopulationBuilder>) -> Self {
        Self {
            populations: populations.into_iter().collect(),
            settings: GlobalSettings::default(),
        }
    }

    /// Protocol shared by every population. For a given kind the last one wins.
    pub fn protocol<P: Protocol>(self, protocol: P) -> Self {
        self.protocols([Arc::new(protocol) as Arc<dyn Protocol>])
    }

    pub fn protocols(mut self, protocols: impl IntoIterator<Item = Arc<dyn Protocol>>) -> Self {
        self.settings.protocols = protocols
            .into_iter()
            .fold(self.settings.protocols, ProtocolRegistry::with_shared);
        self
    }

    /// Pause type of every population that doesn't set its own.
    pub fn pauses(mut self, pause_type: PauseType) -> Self {
        self.settings.pause_type = pause_type;
        self
    }

    /// Throttles the whole run, which disables pauses everywhere.
    ///
    /// Fails with [`ConfigurationError::EmptyThrottling`] when `steps` is empty.
    pub fn throttle(
        mut self,
        steps: impl IntoIterator<Item = ThrottleStep>,
    ) -> Result<Self, ConfigurationError> {
        self.settings.throttling = Some(ThrottlingProfile::new(steps)?);
        Ok(self)
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    /// Resolves every population against the shared settings.
    ///
    /// Fails if there is no population or if two of them share a scenario name.
    /// Nothing is warmed up unless the whole set up is valid.
    pub fn build(self) -> Result<Vec<Scenario>, ConfigurationError> {
        if self.populations.is_empty() {
            return Err(ConfigurationError::EmptySetUp);
        }
        let mut names = HashSet::new();
        for population in &self.populations {
            if !names.insert(population.name()) {
                return Err(ConfigurationError::DuplicateScenario(
                    population.name().to_string(),
                ));
            }
        }

        tracing::info!("Setting up {} scenario(s)", self.populations.len());
        let settings = self.settings;
        Ok(self
            .populations
            .into_iter()
            .map(|population| population.build(&settings))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{injection::InjectionStep, scenario::ScenarioBuilder};

    #[derive(Debug, PartialEq)]
    struct Backend(&'static str);
    impl Protocol for Backend {}

    fn population(name: &str) -> PopulationBuilder {
        ScenarioBuilder::new(name)
            .pause(Duration::from_secs(1))
            .inject([InjectionStep::AtOnceUsers(1)])
            .unwrap()
    }

    #[test]
    fn empty_set_up_is_rejected() {
        let result = SetUp::new(Vec::<PopulationBuilder>::new()).build();

        assert_eq!(result.err(), Some(ConfigurationError::EmptySetUp));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = SetUp::new([population("a"), population("b"), population("a")]).build();

        assert_eq!(
            result.err(),
            Some(ConfigurationError::DuplicateScenario("a".to_string()))
        );
    }

    #[test]
    fn empty_throttle_is_rejected() {
        let result = SetUp::new([population("a")]).throttle(Vec::<ThrottleStep>::new());

        assert_eq!(result.err(), Some(ConfigurationError::EmptyThrottling));
    }

    #[test]
    fn shared_settings_reach_every_scenario() {
        let scenarios = SetUp::new([
            population("a"),
            population("b").with_protocol(Backend("own")),
        ])
        .protocol(Backend("shared"))
        .pauses(PauseType::Exponential)
        .build()
        .unwrap();

        assert_eq!(scenarios[0].name(), "a");
        assert_eq!(scenarios[0].protocols().get::<Backend>(), Some(&Backend("shared")));
        assert_eq!(scenarios[0].pause_type(), &PauseType::Exponential);
        assert_eq!(scenarios[1].protocols().get::<Backend>(), Some(&Backend("own")));
    }

    #[test]
    fn run_throttling_disables_pauses_everywhere() {
        let scenarios = SetUp::new([population("a"), population("b").constant_pauses()])
            .throttle([ThrottleStep::reach_rps(10.0, Duration::from_secs(10))])
            .unwrap()
            .build()
            .unwrap();

        for scenario in &scenarios {
            assert_eq!(scenario.pause_type(), &PauseType::Disabled);
            assert_eq!(scenario.entry().name(), "exit");
        }
    }
}
