//! Actions and the builders that chain them.
//!
//! A scenario is declared as a list of [`ActionBuilder`]s. Once every run policy
//! is resolved, the list is materialized back to front: each builder receives the
//! already built rest of the chain (`next`) and wraps it into a new [`Action`].
//! The chain always ends with [`Exit`], which marks the virtual user as done.
//!
//! Builders also declare which protocol they need by default through
//! [`ActionBuilder::default_protocol`]. Protocols the run or the scenario set
//! explicitly take precedence over these defaults.
//!
//! Built-in builders:
//!
//! - [`ExecBuilder`]: runs a closure against the session.
//! - [`PauseBuilder`]: waits according to the scenario's [`PauseType`]; removed from
//!   the chain when pauses are disabled.
pub mod exec;
pub mod exit;
pub mod pause;

pub use exec::{Exec, ExecBuilder};
pub use exit::Exit;
pub use pause::{Pause, PauseBuilder};

use std::sync::Arc;

use async_trait::async_trait;

use crate::{pause::PauseType, protocol::ProtocolRegistry, session::Session};

/// One materialized step of a virtual user's journey.
///
/// Every action but [`Exit`] owns the rest of the chain and hands the session
/// over once it is done.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, session: Session);
}

/// Everything a builder may need when it is materialized.
#[derive(Debug, Clone)]
pub struct ChainContext {
    pub scenario: Arc<str>,
    /// Final protocols, defaults merged with the run and scenario ones.
    pub protocols: ProtocolRegistry,
    /// Resolved pause type, `Disabled` whenever the scenario is throttled.
    pub pause_type: PauseType,
    pub throttled: bool,
}

/// Declaration of a scenario step.
pub trait ActionBuilder: Send + Sync {
    /// Wraps `next` into the action this builder stands for.
    fn build(&self, ctx: &ChainContext, next: Arc<dyn Action>) -> Arc<dyn Action>;

    /// Adds the protocol this step needs when nobody configured one.
    ///
    /// The default implementation requires nothing.
    fn default_protocol(&self, protocols: ProtocolRegistry) -> ProtocolRegistry {
        protocols
    }
}
