//! Rule registry

use crate::rules::{builtin_rules, Rule};
use keel_core::{KeelError, Result};

/// Ordered collection of rules; dispatch follows registration order
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in rule
    pub fn with_builtin_rules() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Register a rule, rejecting duplicate ids
    pub fn register(&mut self, rule: Box<dyn Rule>) -> Result<()> {
        if self.contains(rule.id()) {
            return Err(KeelError::DuplicateRule(rule.id().to_string()));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Get a rule by id
    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.id() == id).map(|r| r.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Get all rules in dispatch order
    pub fn all(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Get the number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
