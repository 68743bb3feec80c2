//! Structural validation of constraint sets
//!
//! The evaluation engine assumes well-formed constraint data, so malformed
//! entries are rejected here when a schema is loaded.

use crate::constraint_set::ConstraintSet;
use keel_core::{KeelError, Result};
use std::collections::HashSet;

/// Validate a constraint set before it is registered
pub fn validate_constraint_set(resource_type: &str, set: &ConstraintSet) -> Result<()> {
    let fail = |reason: String| KeelError::SchemaValidation {
        resource_type: resource_type.to_string(),
        reason,
    };

    let groups = [
        ("mutually_exclusive", &set.mutually_exclusive, 2),
        ("any_of", &set.any_of, 1),
        ("one_of", &set.one_of, 2),
        ("required_together", &set.required_together, 2),
    ];
    for (kind, entries, min_members) in groups {
        for (i, group) in entries.iter().enumerate() {
            if group.len() < min_members {
                return Err(fail(format!(
                    "{}[{}] needs at least {} member(s), got {}",
                    kind,
                    i,
                    min_members,
                    group.len()
                )));
            }
            validate_paths(group, &format!("{}[{}]", kind, i)).map_err(fail)?;
        }
    }

    for entry in &set.dependent_required {
        let context = format!("dependent_required '{}'", entry.trigger);
        validate_path(&entry.trigger, &context).map_err(fail)?;
        if entry.required.is_empty() {
            return Err(fail(format!("{} has no required properties", context)));
        }
        validate_paths(&entry.required, &context).map_err(fail)?;
    }

    for entry in &set.dependent_excluded {
        let context = format!("dependent_excluded '{}'", entry.trigger);
        validate_path(&entry.trigger, &context).map_err(fail)?;
        if entry.excluded.is_empty() {
            return Err(fail(format!("{} has no excluded properties", context)));
        }
        validate_paths(&entry.excluded, &context).map_err(fail)?;
    }

    for limit in &set.item_limits {
        let context = format!("item_limits '{}'", limit.path);
        validate_path(&limit.path, &context).map_err(fail)?;
        if limit.label.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(fail(format!("{} has an empty label", context)));
        }
    }

    for conditional in &set.conditional_values {
        let context = format!("conditional_values '{}'", conditional.property);
        validate_path(&conditional.when, &context).map_err(fail)?;
        validate_path(&conditional.property, &context).map_err(fail)?;
        if conditional.enabled.is_empty() {
            return Err(fail(format!("{} has no enabling values", context)));
        }
        if conditional.allowed.is_empty() {
            return Err(fail(format!("{} has no allowed values", context)));
        }
    }

    Ok(())
}

fn validate_paths(paths: &[String], context: &str) -> std::result::Result<(), String> {
    let mut seen = HashSet::new();
    for path in paths {
        validate_path(path, context)?;
        if !seen.insert(path.as_str()) {
            return Err(format!("{}: duplicate property path '{}'", context, path));
        }
    }
    Ok(())
}

fn validate_path(path: &str, context: &str) -> std::result::Result<(), String> {
    if path.split('.').any(str::is_empty) {
        return Err(format!("{}: invalid property path '{}'", context, path));
    }
    Ok(())
}
