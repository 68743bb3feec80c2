//! Rule definitions
//!
//! Built-in rules are assembled from the ordered `BUILTIN_RULES` table, so
//! the set of rules a `RuleRegistry` starts with is visible in one place.

mod relationships;

pub use relationships::RelationshipRule;

use crate::diagnostic::Diagnostic;
use crate::types::Severity;
use keel_document::Resource;
use keel_schema::ConstraintSet;

/// Identity and documentation for a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMeta {
    pub id: &'static str,
    pub short_description: &'static str,
    pub description: &'static str,
    pub source_url: &'static str,
    pub tags: &'static [&'static str],
    pub severity: Severity,
}

/// A check run against every resource that has a constraint set
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn check(&self, resource: &Resource, constraints: &ConstraintSet) -> Vec<Diagnostic>;

    fn id(&self) -> &'static str {
        self.meta().id
    }
}

/// Constructor for a built-in rule
pub type RuleConstructor = fn() -> Box<dyn Rule>;

/// Built-in rules in dispatch order
pub const BUILTIN_RULES: &[RuleConstructor] = &[
    mutually_exclusive,
    any_of,
    one_of,
    dependent_required,
    dependent_excluded,
    required_together,
    item_limits,
    conditional_values,
];

fn mutually_exclusive() -> Box<dyn Rule> {
    Box::new(RelationshipRule::mutually_exclusive())
}

fn any_of() -> Box<dyn Rule> {
    Box::new(RelationshipRule::any_of())
}

fn one_of() -> Box<dyn Rule> {
    Box::new(RelationshipRule::one_of())
}

fn dependent_required() -> Box<dyn Rule> {
    Box::new(RelationshipRule::dependent_required())
}

fn dependent_excluded() -> Box<dyn Rule> {
    Box::new(RelationshipRule::dependent_excluded())
}

fn required_together() -> Box<dyn Rule> {
    Box::new(RelationshipRule::required_together())
}

fn item_limits() -> Box<dyn Rule> {
    Box::new(RelationshipRule::item_limits())
}

fn conditional_values() -> Box<dyn Rule> {
    Box::new(RelationshipRule::conditional_values())
}

/// Instantiate every built-in rule
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    BUILTIN_RULES.iter().map(|construct| construct()).collect()
}
