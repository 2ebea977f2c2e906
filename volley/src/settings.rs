use typed_builder::TypedBuilder;

use crate::{pause::PauseType, protocol::ProtocolRegistry, throttle::ThrottlingProfile};

/// Run-wide settings every scenario is resolved against.
///
/// ```rust
/// use std::time::Duration;
/// use volley::{GlobalSettings, PauseType, ThrottleStep, ThrottlingProfile};
///
/// let settings = GlobalSettings::builder()
///     .pause_type(PauseType::Exponential)
///     .throttling(ThrottlingProfile::new([ThrottleStep::reach_rps(50.0, Duration::from_secs(30))]).unwrap())
///     .build();
/// assert!(settings.is_throttled());
/// ```
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct GlobalSettings {
    /// Protocols shared by every scenario, overriding the ones actions ask for.
    #[builder(default)]
    pub protocols: ProtocolRegistry,
    /// Used by scenarios that don't set their own pause type.
    #[builder(default)]
    pub pause_type: PauseType,
    /// Run-wide throttling. When set, pauses are disabled in every scenario.
    #[builder(default, setter(strip_option))]
    pub throttling: Option<ThrottlingProfile>,
}

impl GlobalSettings {
    pub fn is_throttled(&self) -> bool {
        self.throttling.is_some()
    }
}
