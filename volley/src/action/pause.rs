use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use super::{Action, ActionBuilder, ChainContext};
use crate::{pause::PauseType, session::Session};

/// Think time between two steps.
///
/// The declared duration is reshaped by the scenario's [`PauseType`]. With pauses
/// disabled the step is not materialized at all: the builder returns `next`.
#[derive(Debug, Clone, Copy)]
pub struct PauseBuilder {
    duration: Duration,
}

impl PauseBuilder {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl ActionBuilder for PauseBuilder {
    fn build(&self, ctx: &ChainContext, next: Arc<dyn Action>) -> Arc<dyn Action> {
        if ctx.pause_type.is_disabled() {
            return next;
        }
        Arc::new(Pause {
            declared: self.duration,
            pause_type: ctx.pause_type.clone(),
            next,
        })
    }
}

pub struct Pause {
    declared: Duration,
    pause_type: PauseType,
    next: Arc<dyn Action>,
}

#[async_trait]
impl Action for Pause {
    fn name(&self) -> &str {
        "pause"
    }

    async fn execute(&self, session: Session) {
        match self.pause_type.generate(self.declared, &session) {
            Some(wait) if !wait.is_zero() => tokio::time::sleep(wait).await,
            _ => {}
        }
        self.next.execute(session).await;
    }
}
