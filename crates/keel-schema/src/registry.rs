//! Schema registry for loading and looking up constraint sets

use crate::constraint_set::{ConstraintSchemaFile, ConstraintSet};
use crate::validation::validate_constraint_set;
use keel_core::{KeelError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only lookup of constraint sets by resource type.
///
/// Returns `None` for types with no schema entry, which callers treat as
/// "nothing to check" rather than an error.
pub trait ConstraintSource {
    fn resource_constraints(&self, resource_type: &str) -> Option<&ConstraintSet>;
}

/// Registry that holds all loaded constraint sets
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    resources: HashMap<String, ConstraintSet>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load schemas from multiple directories, merging them in order.
    /// Later directories override earlier ones per resource type.
    pub fn load_from_directories(paths: &[impl AsRef<Path>]) -> Result<Self> {
        let mut registry = Self::new();
        for path in paths {
            registry.load_directory(path)?;
        }
        Ok(registry)
    }

    /// Load schemas from a directory
    ///
    /// Expects `path/constraints/*.toml` files
    pub fn load_from_directory<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_directory(path)?;
        Ok(registry)
    }

    /// Load a single directory into this registry (additive/override)
    pub fn load_directory<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let constraints_path = path.as_ref().join("constraints");
        if !constraints_path.exists() {
            tracing::debug!(path = %constraints_path.display(), "no constraints directory");
            return Ok(());
        }

        // Sorted so overrides between files in one directory are stable
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&constraints_path)? {
            let file_path = entry?.path();
            if file_path.extension().map(|e| e == "toml").unwrap_or(false) {
                files.push(file_path);
            }
        }
        files.sort();

        for file_path in files {
            self.load_file(&file_path)?;
        }
        Ok(())
    }

    /// Load constraint sets from a TOML file
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        self.load_string(&content).map_err(|e| match e {
            KeelError::TomlParse(msg) => {
                KeelError::SchemaLoad(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded constraint schema");
        Ok(())
    }

    /// Load constraint sets from a TOML string
    pub fn load_string(&mut self, content: &str) -> Result<()> {
        let file: ConstraintSchemaFile = toml::from_str(content)?;

        // Validate everything first so a bad file leaves the registry untouched
        for (resource_type, set) in &file.resource {
            validate_constraint_set(resource_type, set)?;
        }
        for (resource_type, set) in file.resource {
            self.insert(resource_type, set);
        }
        Ok(())
    }

    /// Register a constraint set directly
    pub fn register(&mut self, resource_type: impl Into<String>, set: ConstraintSet) -> Result<()> {
        let resource_type = resource_type.into();
        validate_constraint_set(&resource_type, &set)?;
        self.insert(resource_type, set);
        Ok(())
    }

    fn insert(&mut self, resource_type: String, set: ConstraintSet) {
        if self.resources.contains_key(&resource_type) {
            tracing::warn!(%resource_type, "constraint set overridden by a later schema");
        }
        self.resources.insert(resource_type, set);
    }

    /// Get the constraint set for a resource type
    pub fn get(&self, resource_type: &str) -> Option<&ConstraintSet> {
        self.resources.get(resource_type)
    }

    /// All resource types with a constraint set, sorted
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.resources.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }

    /// Get the number of resource types with constraints
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ConstraintSource for SchemaRegistry {
    fn resource_constraints(&self, resource_type: &str) -> Option<&ConstraintSet> {
        self.get(resource_type)
    }
}

impl ConstraintSource for HashMap<String, ConstraintSet> {
    fn resource_constraints(&self, resource_type: &str) -> Option<&ConstraintSet> {
        self.get(resource_type)
    }
}
