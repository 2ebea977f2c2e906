use std::{collections::HashMap, sync::Arc};

use serde_json::Value;

/// State of one virtual user, handed from action to action along the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    scenario: Arc<str>,
    user_id: u64,
    attributes: HashMap<String, Value>,
}

impl Session {
    pub fn new(scenario: impl Into<Arc<str>>, user_id: u64) -> Self {
        Self {
            scenario: scenario.into(),
            user_id,
            attributes: HashMap::new(),
        }
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Stores `value` under `key`, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }
}
