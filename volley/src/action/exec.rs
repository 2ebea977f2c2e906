use std::sync::Arc;

use async_trait::async_trait;

use super::{Action, ActionBuilder, ChainContext};
use crate::session::Session;

type SessionFn = Arc<dyn Fn(&mut Session) + Send + Sync>;

/// Step running a closure against the session, e.g. to feed it data.
#[derive(Clone)]
pub struct ExecBuilder {
    name: Arc<str>,
    f: SessionFn,
}

impl ExecBuilder {
    pub fn new<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&mut Session) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }
}

impl ActionBuilder for ExecBuilder {
    fn build(&self, _ctx: &ChainContext, next: Arc<dyn Action>) -> Arc<dyn Action> {
        Arc::new(Exec {
            name: Arc::clone(&self.name),
            f: Arc::clone(&self.f),
            next,
        })
    }
}

pub struct Exec {
    name: Arc<str>,
    f: SessionFn,
    next: Arc<dyn Action>,
}

#[async_trait]
impl Action for Exec {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, mut session: Session) {
        (self.f)(&mut session);
        self.next.execute(session).await;
    }
}
