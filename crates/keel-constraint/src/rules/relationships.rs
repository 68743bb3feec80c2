//! Rules backed by the generic property-relationship evaluators

use super::{Rule, RuleMeta};
use crate::diagnostic::Diagnostic;
use crate::evaluator;
use crate::types::Severity;
use keel_document::Resource;
use keel_schema::ConstraintSet;

const SCHEMA_DOCS: &str =
    "https://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/aws-template-resource-type-ref.html";

type Check = fn(&Resource, &ConstraintSet) -> Vec<Diagnostic>;

/// A rule that evaluates one relationship kind of a constraint set
pub struct RelationshipRule {
    meta: RuleMeta,
    check: Check,
}

impl RelationshipRule {
    pub fn mutually_exclusive() -> Self {
        Self {
            meta: RuleMeta {
                id: "E3011",
                short_description: "Mutually exclusive properties",
                description: "Properties that cannot be specified together on the same resource",
                source_url: SCHEMA_DOCS,
                tags: &["resources", "properties", "exclusive"],
                severity: Severity::Error,
            },
            check: |r, c| evaluator::mutually_exclusive(r, &c.mutually_exclusive),
        }
    }

    pub fn any_of() -> Self {
        Self {
            meta: RuleMeta {
                id: "E3012",
                short_description: "At least one property required",
                description: "At least one property of each group must be specified",
                source_url: SCHEMA_DOCS,
                tags: &["resources", "properties", "required"],
                severity: Severity::Error,
            },
            check: |r, c| evaluator::any_of(r, &c.any_of),
        }
    }

    pub fn one_of() -> Self {
        Self {
            meta: RuleMeta {
                id: "E3013",
                short_description: "Exactly one property required",
                description: "Exactly one property of each group must be specified",
                source_url: SCHEMA_DOCS,
                tags: &["resources", "properties", "required", "exclusive"],
                severity: Severity::Error,
            },
            check: |r, c| evaluator::one_of(r, &c.one_of),
        }
    }

    pub fn dependent_required() -> Self {
        Self {
            meta: RuleMeta {
                id: "E3014",
                short_description: "Dependent properties are required",
                description: "Specifying a property requires other properties to be specified",
                source_url: SCHEMA_DOCS,
                tags: &["resources", "properties", "dependencies"],
                severity: Severity::Error,
            },
            check: |r, c| evaluator::dependent_required(r, &c.dependent_required),
        }
    }

    pub fn dependent_excluded() -> Self {
        Self {
            meta: RuleMeta {
                id: "E3015",
                short_description: "Dependent properties are excluded",
                description: "Specifying a property excludes other properties from being specified",
                source_url: SCHEMA_DOCS,
                tags: &["resources", "properties", "dependencies", "exclusive"],
                severity: Severity::Error,
            },
            check: |r, c| evaluator::dependent_excluded(r, &c.dependent_excluded),
        }
    }

    pub fn required_together() -> Self {
        Self {
            meta: RuleMeta {
                id: "E3016",
                short_description: "Properties required together",
                description: "Properties of each group must be specified all together or not at all",
                source_url: SCHEMA_DOCS,
                tags: &["resources", "properties", "required"],
                severity: Severity::Error,
            },
            check: |r, c| evaluator::required_together(r, &c.required_together),
        }
    }

    pub fn item_limits() -> Self {
        Self {
            meta: RuleMeta {
                id: "E3017",
                short_description: "List property item limit",
                description: "List properties must not exceed their maximum number of items",
                source_url: SCHEMA_DOCS,
                tags: &["resources", "properties", "limits"],
                severity: Severity::Error,
            },
            check: |r, c| evaluator::item_limits(r, &c.item_limits),
        }
    }

    pub fn conditional_values() -> Self {
        Self {
            meta: RuleMeta {
                id: "E3018",
                short_description: "Property value incompatible with enabled feature",
                description: "A property value is not supported while a related feature is enabled",
                source_url: SCHEMA_DOCS,
                tags: &["resources", "properties", "allowed values"],
                severity: Severity::Error,
            },
            check: |r, c| evaluator::conditional_values(r, &c.conditional_values),
        }
    }
}

impl Rule for RelationshipRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn check(&self, resource: &Resource, constraints: &ConstraintSet) -> Vec<Diagnostic> {
        (self.check)(resource, constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin_rules;
    use keel_core::Position;
    use keel_document::Node;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_rule_ids_are_unique() {
        let rules = builtin_rules();
        let ids: HashSet<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_builtin_order() {
        let ids: Vec<&str> = builtin_rules().iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec!["E3011", "E3012", "E3013", "E3014", "E3015", "E3016", "E3017", "E3018"]
        );
    }

    #[test]
    fn test_rule_only_checks_its_kind() {
        let resource = Resource::new(
            "Queue",
            "AWS::SQS::Queue",
            Node::empty_mapping(Position::START),
            Position::START,
        );
        let set = ConstraintSet::new().with_any_of(&["QueueName"]);

        assert!(RelationshipRule::mutually_exclusive().check(&resource, &set).is_empty());
        assert_eq!(RelationshipRule::any_of().check(&resource, &set).len(), 1);
    }
}
