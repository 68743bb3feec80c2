//! Constraint schema introspection command

use anyhow::{Context, Result};
use keel_schema::{ConstraintSet, SchemaRegistry};
use std::path::Path;

pub fn run(resource_type: &str, schemas_path: &str) -> Result<()> {
    if !Path::new(schemas_path).exists() {
        anyhow::bail!("Schemas directory not found: {}", schemas_path);
    }

    let registry =
        SchemaRegistry::load_from_directory(schemas_path).context("Failed to load schemas")?;

    match registry.get(resource_type) {
        Some(set) => print!("{}", describe(resource_type, set)),
        None => {
            println!("No constraints defined for '{}'.", resource_type);
            let types = registry.resource_types();
            if !types.is_empty() {
                println!();
                println!("Resource types with constraints:");
                for t in types {
                    println!("  - {}", t);
                }
            }
        }
    }

    Ok(())
}

fn describe(resource_type: &str, set: &ConstraintSet) -> String {
    let mut out = format!("Resource type: {}\n", resource_type);
    if set.is_empty() {
        out.push_str("  (no relationships declared)\n");
        return out;
    }

    let groups = [
        ("Mutually exclusive", &set.mutually_exclusive),
        ("Any of", &set.any_of),
        ("One of", &set.one_of),
        ("Required together", &set.required_together),
    ];
    for (title, entries) in groups {
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}:\n", title));
        for group in entries {
            out.push_str(&format!("  - {}\n", group.join(", ")));
        }
    }

    if !set.dependent_required.is_empty() {
        out.push_str("\nDependent required:\n");
        for entry in &set.dependent_required {
            out.push_str(&format!("  - {} -> {}\n", entry.trigger, entry.required.join(", ")));
        }
    }

    if !set.dependent_excluded.is_empty() {
        out.push_str("\nDependent excluded:\n");
        for entry in &set.dependent_excluded {
            out.push_str(&format!("  - {} -x {}\n", entry.trigger, entry.excluded.join(", ")));
        }
    }

    if !set.item_limits.is_empty() {
        out.push_str("\nItem limits:\n");
        for limit in &set.item_limits {
            out.push_str(&format!("  - {} <= {} {}\n", limit.path, limit.max, limit.label()));
        }
    }

    if !set.conditional_values.is_empty() {
        out.push_str("\nConditional values:\n");
        for entry in &set.conditional_values {
            out.push_str(&format!(
                "  - when {} in [{}]: {} in [{}]\n",
                entry.when,
                entry.enabled.join(", "),
                entry.property,
                entry.allowed.join(", ")
            ));
        }
    }

    out
}
