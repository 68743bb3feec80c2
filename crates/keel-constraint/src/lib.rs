//! Keel Constraint - Property-relationship evaluation and rule dispatch
//!
//! The evaluator is a pure function of a resource and its constraint set.
//! Rules wrap one relationship kind each and are dispatched over a whole
//! template by the `Linter`.

mod diagnostic;
mod evaluator;
mod linter;
mod registry;
mod report;
pub mod rules;
mod types;

pub use diagnostic::Diagnostic;
pub use evaluator::{
    any_of, conditional_values, dependent_excluded, dependent_required, evaluate, item_limits,
    mutually_exclusive, one_of, required_together,
};
pub use linter::Linter;
pub use registry::RuleRegistry;
pub use report::{ValidationReport, Violation};
pub use rules::{Rule, RuleMeta};
pub use types::Severity;
