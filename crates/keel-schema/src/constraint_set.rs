//! Constraint set definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An ordered group of dotted property paths
pub type PropertyGroup = Vec<String>;

/// If `trigger` is present, every path in `required` must be present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependentRequired {
    pub trigger: String,
    pub required: Vec<String>,
}

/// If `trigger` is present, every path in `excluded` must be absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependentExcluded {
    pub trigger: String,
    pub excluded: Vec<String>,
}

/// Upper bound on the number of items in a list property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemLimit {
    pub path: String,
    pub max: usize,
    /// Plural noun used in messages; defaults to the last path segment
    #[serde(default)]
    pub label: Option<String>,
}

impl ItemLimit {
    pub fn label(&self) -> &str {
        match &self.label {
            Some(label) => label,
            None => self.path.rsplit('.').next().unwrap_or(&self.path),
        }
    }
}

/// When `when` holds one of the `enabled` values, `property` must hold one
/// of the `allowed` values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionalValue {
    pub when: String,
    pub enabled: Vec<String>,
    pub property: String,
    pub allowed: Vec<String>,
}

/// All property relationships declared for one resource type.
///
/// Every list keeps its declared order; evaluation follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstraintSet {
    /// At most one member of each group may be present
    pub mutually_exclusive: Vec<PropertyGroup>,
    /// At least one member of each group must be present
    pub any_of: Vec<PropertyGroup>,
    /// Exactly one member of each group must be present
    pub one_of: Vec<PropertyGroup>,
    pub dependent_required: Vec<DependentRequired>,
    pub dependent_excluded: Vec<DependentExcluded>,
    /// Either none or all members of each group must be present
    pub required_together: Vec<PropertyGroup>,
    pub item_limits: Vec<ItemLimit>,
    pub conditional_values: Vec<ConditionalValue>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mutually_exclusive(mut self, group: &[&str]) -> Self {
        self.mutually_exclusive.push(to_group(group));
        self
    }

    pub fn with_any_of(mut self, group: &[&str]) -> Self {
        self.any_of.push(to_group(group));
        self
    }

    pub fn with_one_of(mut self, group: &[&str]) -> Self {
        self.one_of.push(to_group(group));
        self
    }

    pub fn with_dependent_required(mut self, trigger: &str, required: &[&str]) -> Self {
        self.dependent_required.push(DependentRequired {
            trigger: trigger.to_string(),
            required: to_group(required),
        });
        self
    }

    pub fn with_dependent_excluded(mut self, trigger: &str, excluded: &[&str]) -> Self {
        self.dependent_excluded.push(DependentExcluded {
            trigger: trigger.to_string(),
            excluded: to_group(excluded),
        });
        self
    }

    pub fn with_required_together(mut self, group: &[&str]) -> Self {
        self.required_together.push(to_group(group));
        self
    }

    pub fn with_item_limit(mut self, path: &str, max: usize, label: Option<&str>) -> Self {
        self.item_limits.push(ItemLimit {
            path: path.to_string(),
            max,
            label: label.map(str::to_string),
        });
        self
    }

    pub fn with_conditional_value(
        mut self,
        when: &str,
        enabled: &[&str],
        property: &str,
        allowed: &[&str],
    ) -> Self {
        self.conditional_values.push(ConditionalValue {
            when: when.to_string(),
            enabled: to_group(enabled),
            property: property.to_string(),
            allowed: to_group(allowed),
        });
        self
    }

    /// True when no relationship of any kind is declared
    pub fn is_empty(&self) -> bool {
        self.mutually_exclusive.is_empty()
            && self.any_of.is_empty()
            && self.one_of.is_empty()
            && self.dependent_required.is_empty()
            && self.dependent_excluded.is_empty()
            && self.required_together.is_empty()
            && self.item_limits.is_empty()
            && self.conditional_values.is_empty()
    }
}

fn to_group(paths: &[&str]) -> PropertyGroup {
    paths.iter().map(|p| p.to_string()).collect()
}

/// TOML file format for constraint schemas
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintSchemaFile {
    #[serde(default)]
    pub resource: HashMap<String, ConstraintSet>,
}
