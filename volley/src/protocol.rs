//! Protocols and the registry that resolves them.
//!
//! A [`Protocol`] is a configuration block describing how actions talk to an
//! external system (base urls, connection settings, credentials...). The core
//! never looks inside a protocol: it only keys instances by their concrete type,
//! so a registry holds at most one protocol of each kind.
//!
//! Three registries meet when a scenario is built:
//!
//! - the *default* one, folded from the scenario's action builders,
//! - the *global* one, shared by every scenario of the run,
//! - the *scenario* one, explicit overrides set on the population.
//!
//! They are layered with [`ProtocolRegistry::merge`] in that order, kind by kind,
//! the later layer winning.
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt::{self, Debug},
    sync::Arc,
};

use crate::settings::GlobalSettings;

/// Upcast helper so a `dyn Protocol` can be downcast back to its concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A configuration block shared by every virtual user of a scenario.
///
/// Plain blocks can use the `#[protocol]` attribute (`macros` feature) instead of
/// implementing this trait by hand.
///
/// # Example
/// ```rust
/// use volley::{GlobalSettings, Protocol};
///
/// #[derive(Debug)]
/// struct Database {
///     url: String,
/// }
///
/// impl Protocol for Database {
///     fn warm_up(&self, _settings: &GlobalSettings) {
///         // open and drop a first connection, resolve DNS, ...
///     }
/// }
/// ```
pub trait Protocol: AsAny + Debug + Send + Sync + 'static {
    /// One-time preparation before any virtual user starts.
    ///
    /// Called exactly once per scenario build, on the final merged registry.
    fn warm_up(&self, _settings: &GlobalSettings) {}

    /// Human readable kind, used in logs.
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

fn kind_of(protocol: &dyn Protocol) -> TypeId {
    protocol.as_any().type_id()
}

/// One protocol instance per kind.
#[derive(Clone, Default)]
pub struct ProtocolRegistry {
    protocols: HashMap<TypeId, Arc<dyn Protocol>>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a registry holding `protocol`, replacing any protocol of the same kind.
    pub fn with<P: Protocol>(self, protocol: P) -> Self {
        self.with_shared(Arc::new(protocol))
    }

    pub fn with_shared(mut self, protocol: Arc<dyn Protocol>) -> Self {
        self.insert(protocol);
        self
    }

    /// Registers `protocol`, returning the one of the same kind it replaced.
    pub fn insert(&mut self, protocol: Arc<dyn Protocol>) -> Option<Arc<dyn Protocol>> {
        self.protocols.insert(kind_of(protocol.as_ref()), protocol)
    }

    /// Layers `other` on top of `self`: for every kind present in both, `other` wins.
    pub fn merge(&self, other: &ProtocolRegistry) -> ProtocolRegistry {
        let mut merged = self.clone();
        merged
            .protocols
            .extend(other.protocols.iter().map(|(k, p)| (*k, Arc::clone(p))));
        merged
    }

    pub fn get<P: Protocol>(&self) -> Option<&P> {
        self.protocols
            .get(&TypeId::of::<P>())
            .and_then(|p| (**p).as_any().downcast_ref::<P>())
    }

    pub fn contains<P: Protocol>(&self) -> bool {
        self.protocols.contains_key(&TypeId::of::<P>())
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Protocol>> {
        self.protocols.values()
    }

    /// Gives every registered protocol its one-time preparation.
    pub fn warm_up(&self, settings: &GlobalSettings) {
        for protocol in self.protocols.values() {
            tracing::debug!("Warming up protocol {}", protocol.kind());
            protocol.warm_up(settings);
        }
    }
}

impl Debug for ProtocolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.protocols.values().map(|p| p.kind()))
            .finish()
    }
}
