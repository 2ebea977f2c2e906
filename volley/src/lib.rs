//! Volley: fluent scenario assembly for load tests.
//!
//! Volley covers the part of a load test that happens before the first virtual
//! user starts: declaring what a user does, and resolving the run policies that
//! govern every user of a scenario. Executing actions and scheduling users are
//! left to the execution engine, which receives finished, read-only [`Scenario`]s.
//!
//! # Architecture
//!
//! The main building blocks are:
//!
//! - [`ScenarioBuilder`]: a named, ordered list of steps ([`ActionBuilder`]s), built
//!   with a fluent API. Every call returns a new value.
//! - [`PopulationBuilder`]: a scenario plus its [`InjectionProfile`] and its own
//!   run policies (protocols, pauses, throttling).
//! - [`GlobalSettings`]: the run-wide defaults populations are resolved against.
//! - [`Scenario`]: the resolved result. Its entry point is the first [`Action`] of
//!   the materialized chain; the chain always ends with [`action::Exit`].
//! - [`SetUp`]: all the populations of a run, resolved together.
//!
//! # Resolution rules
//!
//! - **Protocols**: the defaults required by the steps, then the run protocols,
//!   then the scenario protocols, kind by kind, the later layer winning.
//! - **Pauses**: throttling, on the run or on the scenario, disables pauses.
//!   Otherwise the scenario [`PauseType`] wins over the run one.
//! - **Warm-up**: the resolved protocols are warmed up once, before the chain
//!   is materialized.
//!
//! Misconfigurations (no injection step, no throttle step...) are reported as a
//! [`ConfigurationError`] by the call that introduced them.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use volley::{GlobalSettings, InjectionStep, PauseType, ThrottleStep, scenario};
//!
//! let settings = GlobalSettings::builder()
//!     .pause_type(PauseType::UniformPercentage(10.0))
//!     .build();
//!
//! let browse = scenario("browse")
//!     .exec("home page", |session| {
//!         session.set("page", "home");
//!     })
//!     .pause(Duration::from_secs(1))
//!     .exec("product page", |session| {
//!         session.set("page", "product");
//!     })
//!     .inject([
//!         InjectionStep::AtOnceUsers(10),
//!         InjectionStep::RampUsers { users: 100, during: Duration::from_secs(60) },
//!     ])
//!     .unwrap()
//!     .throttle([[ThrottleStep::reach_rps(50.0, Duration::from_secs(10))]])
//!     .unwrap()
//!     .build(&settings);
//!
//! // throttled scenarios never pause
//! assert_eq!(browse.pause_type(), &PauseType::Disabled);
//! assert_eq!(browse.injection().total_users(), 110);
//! ```
//!
//! # Feature flags
//!
//! - `macros`: enables the `#[protocol]` attribute, which turns a plain struct into
//!   a [`Protocol`] without warm-up. (Enabled by default)

/// Actions, their builders and the built-in steps
pub mod action;
/// Ordered list of action builders
pub mod chain;
/// Configuration errors
pub mod error;
/// Injection profiles handed to the scheduler
pub mod injection;
/// Pause policies
pub mod pause;
/// Protocols and their registry
pub mod protocol;
/// Scenario, population and their builders
pub mod scenario;
/// Per virtual user state
pub mod session;
/// Run-wide settings
pub mod settings;
/// Run set up, resolving every population together
pub mod simulation;
/// Throughput throttling profiles
pub mod throttle;

pub use action::{Action, ActionBuilder, ChainContext};
pub use chain::ActionChain;
pub use error::ConfigurationError;
pub use injection::{InjectionProfile, InjectionStep};
pub use pause::{PauseExpression, PauseType};
pub use protocol::{Protocol, ProtocolRegistry};
pub use scenario::{PopulationBuilder, Scenario, ScenarioBuilder};
pub use session::Session;
pub use settings::GlobalSettings;
pub use simulation::SetUp;
pub use throttle::{ThrottleStep, ThrottlingProfile};

/// Starts a new scenario named `name`.
pub fn scenario(name: impl Into<std::sync::Arc<str>>) -> ScenarioBuilder {
    ScenarioBuilder::new(name)
}

#[cfg(feature = "macros")]
/// Procedural macros to reduce boilerplate
pub mod macros {
    pub use volley_macros::*;
}
