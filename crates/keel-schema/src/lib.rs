//! Keel Schema - Property-relationship constraints per resource type
//!
//! Constraint sets are loaded once from TOML files and then shared
//! read-only by every validation run.

mod constraint_set;
mod registry;
mod validation;

pub use constraint_set::{
    ConditionalValue, ConstraintSchemaFile, ConstraintSet, DependentExcluded, DependentRequired,
    ItemLimit, PropertyGroup,
};
pub use registry::{ConstraintSource, SchemaRegistry};
pub use validation::validate_constraint_set;
