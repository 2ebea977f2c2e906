use std::{
    fmt::{self, Debug},
    sync::Arc,
};

use crate::{
    action::{Action, ActionBuilder, ChainContext},
    protocol::ProtocolRegistry,
};

/// Ordered, append-only list of action builders.
///
/// Appending returns a new chain and leaves the original untouched. Builders are
/// shared, so copies stay cheap.
#[derive(Clone, Default)]
pub struct ActionChain {
    builders: Vec<Arc<dyn ActionBuilder>>,
}

impl ActionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, builder: impl ActionBuilder + 'static) -> Self {
        self.append_shared(Arc::new(builder))
    }

    pub fn append_shared(&self, builder: Arc<dyn ActionBuilder>) -> Self {
        let mut builders = self.builders.clone();
        builders.push(builder);
        Self { builders }
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Protocols required by the builders, in declaration order.
    /// A later builder asking for the same kind replaces the earlier one.
    pub fn default_protocols(&self) -> ProtocolRegistry {
        self.builders
            .iter()
            .fold(ProtocolRegistry::new(), |protocols, builder| {
                builder.default_protocol(protocols)
            })
    }

    /// Materializes the chain in front of `terminal`.
    ///
    /// Builders wrap their successor from last to first, so the resulting entry
    /// point runs them in declaration order, then `terminal`. An empty chain is
    /// just `terminal`.
    pub fn build(&self, ctx: &ChainContext, terminal: Arc<dyn Action>) -> Arc<dyn Action> {
        self.builders
            .iter()
            .rev()
            .fold(terminal, |next, builder| builder.build(ctx, next))
    }
}

impl Debug for ActionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionChain")
            .field("len", &self.builders.len())
            .finish()
    }
}
