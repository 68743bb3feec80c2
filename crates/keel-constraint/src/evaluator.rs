//! Constraint evaluation engine
//!
//! Every function here is pure and infallible. A property counts as present
//! when its dotted path resolves (see `keel_document::exists`); anything that
//! cannot be resolved statically is treated as absent, and rules that need a
//! value's literal shape abstain instead of guessing.

use crate::diagnostic::Diagnostic;
use keel_document::{exists, resolve, split_path, Resource};
use keel_schema::{
    ConditionalValue, ConstraintSet, DependentExcluded, DependentRequired, ItemLimit,
    PropertyGroup,
};
use std::collections::BTreeSet;

/// Evaluate every relationship kind of `constraints` against `resource`.
///
/// Diagnostics come out in a fixed kind order (mutually exclusive, any-of,
/// one-of, dependent-required, dependent-excluded, required-together, item
/// limits, conditional values), each kind in declared order.
pub fn evaluate(resource: &Resource, constraints: &ConstraintSet) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    diagnostics.extend(mutually_exclusive(resource, &constraints.mutually_exclusive));
    diagnostics.extend(any_of(resource, &constraints.any_of));
    diagnostics.extend(one_of(resource, &constraints.one_of));
    diagnostics.extend(dependent_required(resource, &constraints.dependent_required));
    diagnostics.extend(dependent_excluded(resource, &constraints.dependent_excluded));
    diagnostics.extend(required_together(resource, &constraints.required_together));
    diagnostics.extend(item_limits(resource, &constraints.item_limits));
    diagnostics.extend(conditional_values(resource, &constraints.conditional_values));
    diagnostics
}

/// At most one member of each group may be present
pub fn mutually_exclusive(resource: &Resource, groups: &[PropertyGroup]) -> Vec<Diagnostic> {
    if !resource.has_static_properties() {
        return Vec::new();
    }
    groups
        .iter()
        .filter_map(|group| {
            let present = present_members(resource, group);
            (present.len() > 1).then(|| {
                resource_diagnostic(
                    resource,
                    format!(
                        "{} has mutually exclusive properties specified: {}",
                        subject(resource),
                        join(present)
                    ),
                    None,
                )
            })
        })
        .collect()
}

/// At least one member of each group must be present
pub fn any_of(resource: &Resource, groups: &[PropertyGroup]) -> Vec<Diagnostic> {
    if !resource.has_static_properties() {
        return Vec::new();
    }
    groups
        .iter()
        .filter(|group| !group.iter().any(|p| exists(&resource.properties, p)))
        .map(|group| {
            resource_diagnostic(
                resource,
                format!(
                    "{} must specify at least one of: {}",
                    subject(resource),
                    group.join(", ")
                ),
                None,
            )
        })
        .collect()
}

/// Exactly one member of each group must be present
pub fn one_of(resource: &Resource, groups: &[PropertyGroup]) -> Vec<Diagnostic> {
    if !resource.has_static_properties() {
        return Vec::new();
    }
    groups
        .iter()
        .filter_map(|group| {
            let present = present_members(resource, group);
            let message = match present.len() {
                0 => format!(
                    "{} must specify exactly one of: {}",
                    subject(resource),
                    group.join(", ")
                ),
                1 => return None,
                _ => format!(
                    "{} has multiple properties specified where only one is allowed: {}",
                    subject(resource),
                    join(present)
                ),
            };
            Some(resource_diagnostic(resource, message, None))
        })
        .collect()
}

/// When a trigger is present, all of its required properties must be too
pub fn dependent_required(resource: &Resource, entries: &[DependentRequired]) -> Vec<Diagnostic> {
    if !resource.has_static_properties() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| exists(&resource.properties, &entry.trigger))
        .filter_map(|entry| {
            let missing: BTreeSet<&str> = entry
                .required
                .iter()
                .map(String::as_str)
                .filter(|p| !exists(&resource.properties, p))
                .collect();
            (!missing.is_empty()).then(|| {
                resource_diagnostic(
                    resource,
                    format!(
                        "{} property {} requires: {}",
                        subject(resource),
                        entry.trigger,
                        join(missing)
                    ),
                    Some(&entry.trigger),
                )
            })
        })
        .collect()
}

/// When a trigger is present, none of its excluded properties may be
pub fn dependent_excluded(resource: &Resource, entries: &[DependentExcluded]) -> Vec<Diagnostic> {
    if !resource.has_static_properties() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| exists(&resource.properties, &entry.trigger))
        .filter_map(|entry| {
            let present = present_members(resource, &entry.excluded);
            (!present.is_empty()).then(|| {
                resource_diagnostic(
                    resource,
                    format!(
                        "{} property {} cannot be specified with: {}",
                        subject(resource),
                        entry.trigger,
                        join(present)
                    ),
                    Some(&entry.trigger),
                )
            })
        })
        .collect()
}

/// Members of each group must be specified all together or not at all
pub fn required_together(resource: &Resource, groups: &[PropertyGroup]) -> Vec<Diagnostic> {
    if !resource.has_static_properties() {
        return Vec::new();
    }
    groups
        .iter()
        .filter_map(|group| {
            let present = present_members(resource, group);
            if present.is_empty() {
                return None;
            }
            let missing: BTreeSet<&str> = group
                .iter()
                .map(String::as_str)
                .filter(|p| !present.contains(p))
                .collect();
            (!missing.is_empty()).then(|| {
                resource_diagnostic(
                    resource,
                    format!(
                        "{} properties {} must be specified together; missing: {}",
                        subject(resource),
                        group.join(", "),
                        join(missing)
                    ),
                    None,
                )
            })
        })
        .collect()
}

/// List properties may not hold more than `max` items.
///
/// Only literal elements are counted, so an `Fn::If` entry that may collapse
/// to nothing never pushes a list over the limit.
pub fn item_limits(resource: &Resource, limits: &[ItemLimit]) -> Vec<Diagnostic> {
    limits
        .iter()
        .filter_map(|limit| {
            let node = resolve(&resource.properties, &limit.path)?;
            let items = node.as_literal_sequence()?;
            let count = items.iter().filter(|item| item.is_literal()).count();
            (count > limit.max).then(|| {
                Diagnostic::new(
                    format!(
                        "{} has {} {}, exceeding the limit of {}",
                        resource.name,
                        count,
                        limit.label(),
                        limit.max
                    ),
                    node.position,
                    property_path(resource, &limit.path),
                )
            })
        })
        .collect()
}

/// A property restricted to an allowed set of values while a feature flag
/// holds one of its enabling values
pub fn conditional_values(resource: &Resource, entries: &[ConditionalValue]) -> Vec<Diagnostic> {
    entries
        .iter()
        .filter_map(|entry| {
            let trigger = resolve(&resource.properties, &entry.when)?
                .as_literal_scalar()?
                .to_string();
            if !entry.enabled.contains(&trigger) {
                return None;
            }
            let node = resolve(&resource.properties, &entry.property)?;
            let value = node.as_literal_scalar()?.to_string();
            if entry.allowed.contains(&value) {
                return None;
            }
            Some(Diagnostic::new(
                format!(
                    "{} property {} value '{}' is not supported when {} is '{}'",
                    subject(resource),
                    entry.property,
                    value,
                    entry.when,
                    trigger
                ),
                node.position,
                property_path(resource, &entry.property),
            ))
        })
        .collect()
}

/// Group members that resolve, sorted and de-duplicated
fn present_members<'a>(resource: &Resource, group: &'a [String]) -> BTreeSet<&'a str> {
    group
        .iter()
        .map(String::as_str)
        .filter(|p| exists(&resource.properties, p))
        .collect()
}

fn subject(resource: &Resource) -> String {
    format!("{} ({})", resource.name, resource.resource_type)
}

fn join(paths: BTreeSet<&str>) -> String {
    paths.into_iter().collect::<Vec<_>>().join(", ")
}

fn properties_path(resource: &Resource) -> Vec<String> {
    vec![
        "Resources".to_string(),
        resource.name.clone(),
        "Properties".to_string(),
    ]
}

fn property_path(resource: &Resource, property: &str) -> Vec<String> {
    let mut path = properties_path(resource);
    path.extend(split_path(property).map(str::to_string));
    path
}

/// Diagnostic at the resource's declaring position
fn resource_diagnostic(resource: &Resource, message: String, trigger: Option<&str>) -> Diagnostic {
    let mut path = properties_path(resource);
    if let Some(trigger) = trigger {
        path.push(trigger.to_string());
    }
    Diagnostic::new(message, resource.position, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::Position;
    use keel_document::load_document_string;

    fn resource(toml_props: &str) -> Resource {
        resource_of("Function", "AWS::Lambda::Function", toml_props)
    }

    fn resource_of(name: &str, resource_type: &str, toml_props: &str) -> Resource {
        let source = format!(
            "[Resources.{}]\nType = \"{}\"\n\n[Resources.{}.Properties]\n{}",
            name, resource_type, name, toml_props
        );
        let doc = load_document_string(&source).unwrap();
        doc.get(name).unwrap().clone()
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_mutually_exclusive_violation_lists_sorted_members() {
        let r = resource("ZipFile = \"x\"\nImageUri = \"y\"\n");
        let set = ConstraintSet::new().with_mutually_exclusive(&["ZipFile", "S3Bucket", "ImageUri"]);
        let diagnostics = evaluate(&r, &set);
        assert_eq!(
            messages(&diagnostics),
            vec!["Function (AWS::Lambda::Function) has mutually exclusive properties specified: ImageUri, ZipFile"]
        );
        assert_eq!(diagnostics[0].path, vec!["Resources", "Function", "Properties"]);
        assert_eq!(diagnostics[0].position(), r.position);
    }

    #[test]
    fn test_mutually_exclusive_single_member_passes() {
        let r = resource("ZipFile = \"x\"\n");
        let set = ConstraintSet::new().with_mutually_exclusive(&["ZipFile", "ImageUri"]);
        assert!(evaluate(&r, &set).is_empty());
    }

    #[test]
    fn test_adding_properties_keeps_exclusivity_violation() {
        let set = ConstraintSet::new().with_mutually_exclusive(&["A", "B", "C"]);
        let two = resource("A = 1\nB = 2\n");
        let three = resource("A = 1\nB = 2\nC = 3\nD = 4\n");
        assert_eq!(evaluate(&two, &set).len(), 1);
        assert_eq!(evaluate(&three, &set).len(), 1);
    }

    #[test]
    fn test_dynamic_value_counts_as_present_for_exclusivity() {
        let r = resource("A = { Ref = \"X\" }\nB = \"b\"\n");
        let set = ConstraintSet::new().with_mutually_exclusive(&["A", "B"]);
        assert_eq!(evaluate(&r, &set).len(), 1);
    }

    #[test]
    fn test_any_of_missing_lists_group_in_declared_order() {
        let r = resource("MemorySize = 128\n");
        let set = ConstraintSet::new().with_any_of(&["ZipFile", "ImageUri", "S3Bucket"]);
        assert_eq!(
            messages(&evaluate(&r, &set)),
            vec!["Function (AWS::Lambda::Function) must specify at least one of: ZipFile, ImageUri, S3Bucket"]
        );
    }

    #[test]
    fn test_any_of_satisfied() {
        let r = resource("S3Bucket = \"b\"\n");
        let set = ConstraintSet::new().with_any_of(&["ZipFile", "S3Bucket"]);
        assert!(evaluate(&r, &set).is_empty());
    }

    #[test]
    fn test_one_of_outcomes_are_exclusive() {
        let set = ConstraintSet::new().with_one_of(&["A", "B"]);

        let none = evaluate(&resource("C = 1\n"), &set);
        assert_eq!(
            messages(&none),
            vec!["Function (AWS::Lambda::Function) must specify exactly one of: A, B"]
        );

        assert!(evaluate(&resource("A = 1\n"), &set).is_empty());

        let both = evaluate(&resource("B = 1\nA = 2\n"), &set);
        assert_eq!(
            messages(&both),
            vec!["Function (AWS::Lambda::Function) has multiple properties specified where only one is allowed: A, B"]
        );
    }

    #[test]
    fn test_dependent_required_satisfied_by_dotted_path() {
        let set = ConstraintSet::new().with_dependent_required("SnapStart", &["SnapStart.ApplyOn"]);

        let ok = resource("Runtime = \"java21\"\n\n[Resources.Function.Properties.SnapStart]\nApplyOn = \"PublishedVersions\"\n");
        assert!(evaluate(&ok, &set).is_empty());

        let missing = resource("Runtime = \"java21\"\nSnapStart = {}\n");
        let diagnostics = evaluate(&missing, &set);
        assert_eq!(
            messages(&diagnostics),
            vec!["Function (AWS::Lambda::Function) property SnapStart requires: SnapStart.ApplyOn"]
        );
        assert_eq!(
            diagnostics[0].path,
            vec!["Resources", "Function", "Properties", "SnapStart"]
        );
    }

    #[test]
    fn test_dependent_required_without_trigger_is_silent() {
        let set = ConstraintSet::new().with_dependent_required("SnapStart", &["SnapStart.ApplyOn"]);
        assert!(evaluate(&resource("Runtime = \"java21\"\n"), &set).is_empty());
    }

    #[test]
    fn test_dependent_required_lists_sorted_missing() {
        let set = ConstraintSet::new().with_dependent_required("ZipFile", &["Runtime", "Handler", "Role"]);
        let r = resource("ZipFile = \"code\"\nRole = \"arn\"\n");
        assert_eq!(
            messages(&evaluate(&r, &set)),
            vec!["Function (AWS::Lambda::Function) property ZipFile requires: Handler, Runtime"]
        );
    }

    #[test]
    fn test_dependent_required_cannot_see_into_dynamic_parent() {
        let set = ConstraintSet::new().with_dependent_required("Code", &["Code.S3Key"]);
        let r = resource("Code = { \"Fn::If\" = [\"C\", {}, {}] }\n");
        assert_eq!(evaluate(&r, &set).len(), 1);
    }

    #[test]
    fn test_dependent_excluded() {
        let set = ConstraintSet::new().with_dependent_excluded("ImageUri", &["Runtime", "Handler", "Layers"]);
        let r = resource("ImageUri = \"repo:tag\"\nRuntime = \"java21\"\nHandler = \"h\"\n");
        let diagnostics = evaluate(&r, &set);
        assert_eq!(
            messages(&diagnostics),
            vec!["Function (AWS::Lambda::Function) property ImageUri cannot be specified with: Handler, Runtime"]
        );
        assert_eq!(diagnostics[0].path.last().map(String::as_str), Some("ImageUri"));

        let clean = resource("ImageUri = \"repo:tag\"\n");
        assert!(evaluate(&clean, &set).is_empty());
    }

    #[test]
    fn test_required_together() {
        let set = ConstraintSet::new().with_required_together(&["S3Bucket", "S3Key", "S3ObjectVersion"]);
        assert!(evaluate(&resource("ZipFile = \"x\"\n"), &set).is_empty());
        assert!(evaluate(&resource("S3Bucket = \"b\"\nS3Key = \"k\"\nS3ObjectVersion = \"1\"\n"), &set).is_empty());
        assert_eq!(
            messages(&evaluate(&resource("S3Key = \"k\"\n"), &set)),
            vec!["Function (AWS::Lambda::Function) properties S3Bucket, S3Key, S3ObjectVersion must be specified together; missing: S3Bucket, S3ObjectVersion"]
        );
    }

    #[test]
    fn test_item_limit_boundary() {
        let set = ConstraintSet::new().with_item_limit("FieldIndexPolicies", 2, None);

        let at_limit = resource_of(
            "AppLogs",
            "AWS::Logs::LogGroup",
            "FieldIndexPolicies = [{ Fields = [\"a\"] }, { Fields = [\"b\"] }]\n",
        );
        assert!(evaluate(&at_limit, &set).is_empty());

        let over = resource_of(
            "AppLogs",
            "AWS::Logs::LogGroup",
            "FieldIndexPolicies = [{ Fields = [\"a\"] }, { Fields = [\"b\"] }, { Fields = [\"c\"] }]\n",
        );
        let diagnostics = evaluate(&over, &set);
        assert_eq!(
            messages(&diagnostics),
            vec!["AppLogs has 3 FieldIndexPolicies, exceeding the limit of 2"]
        );
        assert_eq!(
            diagnostics[0].path,
            vec!["Resources", "AppLogs", "Properties", "FieldIndexPolicies"]
        );
        assert_eq!(diagnostics[0].position(), Position::new(5, 1));
    }

    #[test]
    fn test_item_limit_abstains_on_dynamic_list() {
        let set = ConstraintSet::new().with_item_limit("Layers", 1, None);
        let r = resource("Layers = { \"Fn::Split\" = [\",\", \"a,b,c\"] }\n");
        assert!(evaluate(&r, &set).is_empty());
    }

    #[test]
    fn test_item_limit_ignores_dynamic_elements() {
        let set = ConstraintSet::new().with_item_limit("Layers", 2, None);
        let r = resource(
            "Layers = [\"a\", \"b\", { \"Fn::If\" = [\"C\", \"c\", { Ref = \"AWS::NoValue\" }] }]\n",
        );
        assert!(evaluate(&r, &set).is_empty());
    }

    #[test]
    fn test_conditional_value_reports_offending_value() {
        let set = ConstraintSet::new().with_conditional_value(
            "SnapStart.ApplyOn",
            &["PublishedVersions"],
            "Runtime",
            &["java17", "java21"],
        );
        let r = resource("Runtime = \"nodejs20.x\"\nSnapStart = { ApplyOn = \"PublishedVersions\" }\n");
        let diagnostics = evaluate(&r, &set);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("nodejs20.x"));
        assert_eq!(
            diagnostics[0].path,
            vec!["Resources", "Function", "Properties", "Runtime"]
        );
    }

    #[test]
    fn test_conditional_value_disabled_flag_passes() {
        let set = ConstraintSet::new().with_conditional_value(
            "SnapStart.ApplyOn",
            &["PublishedVersions"],
            "Runtime",
            &["java17", "java21"],
        );
        let r = resource("Runtime = \"nodejs20.x\"\nSnapStart = { ApplyOn = \"None\" }\n");
        assert!(evaluate(&r, &set).is_empty());

        let allowed = resource("Runtime = \"java21\"\nSnapStart = { ApplyOn = \"PublishedVersions\" }\n");
        assert!(evaluate(&allowed, &set).is_empty());
    }

    #[test]
    fn test_conditional_value_abstains_on_dynamic_values() {
        let set = ConstraintSet::new().with_conditional_value(
            "SnapStart.ApplyOn",
            &["PublishedVersions"],
            "Runtime",
            &["java21"],
        );
        let dynamic_runtime =
            resource("Runtime = { Ref = \"RuntimeParam\" }\nSnapStart = { ApplyOn = \"PublishedVersions\" }\n");
        assert!(evaluate(&dynamic_runtime, &set).is_empty());

        let dynamic_flag = resource("Runtime = \"nodejs20.x\"\nSnapStart = { ApplyOn = { Ref = \"Mode\" } }\n");
        assert!(evaluate(&dynamic_flag, &set).is_empty());
    }

    #[test]
    fn test_conditional_value_with_boolean_flag() {
        let set = ConstraintSet::new().with_conditional_value(
            "Tracing.Enabled",
            &["true"],
            "Mode",
            &["Active"],
        );

        let enabled = resource("Mode = \"PassThrough\"\nTracing = { Enabled = true }\n");
        let diagnostics = evaluate(&enabled, &set);
        assert_eq!(
            messages(&diagnostics),
            vec!["Function (AWS::Lambda::Function) property Mode value 'PassThrough' is not supported when Tracing.Enabled is 'true'"]
        );

        let disabled = resource("Mode = \"PassThrough\"\nTracing = { Enabled = false }\n");
        assert!(evaluate(&disabled, &set).is_empty());
    }

    #[test]
    fn test_conditional_value_with_integer_flag() {
        let set = ConstraintSet::new().with_conditional_value("Version", &["2"], "Runtime", &["java21"]);
        let r = resource("Version = 2\nRuntime = \"java8\"\n");
        assert_eq!(evaluate(&r, &set).len(), 1);
    }

    #[test]
    fn test_dynamic_properties_block_abstains() {
        let source = "[Resources.Function]\nType = \"AWS::Lambda::Function\"\nProperties = { \"Fn::If\" = [\"C\", {}, {}] }\n";
        let doc = load_document_string(source).unwrap();
        let r = doc.get("Function").unwrap();
        let set = ConstraintSet::new()
            .with_any_of(&["A", "B"])
            .with_one_of(&["A", "B"]);
        assert!(evaluate(r, &set).is_empty());
    }

    #[test]
    fn test_kind_order_is_fixed() {
        let set = ConstraintSet::new()
            .with_dependent_excluded("A", &["B"])
            .with_dependent_required("A", &["Z"])
            .with_one_of(&["X", "Y"])
            .with_any_of(&["X", "Y"])
            .with_mutually_exclusive(&["A", "B"]);
        let r = resource("A = 1\nB = 2\n");
        let diagnostics = evaluate(&r, &set);
        let kinds: Vec<&str> = diagnostics
            .iter()
            .map(|d| {
                if d.message.contains("mutually exclusive") {
                    "mutually_exclusive"
                } else if d.message.contains("at least one") {
                    "any_of"
                } else if d.message.contains("exactly one") {
                    "one_of"
                } else if d.message.contains("requires") {
                    "dependent_required"
                } else {
                    "dependent_excluded"
                }
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["mutually_exclusive", "any_of", "one_of", "dependent_required", "dependent_excluded"]
        );
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let set = ConstraintSet::new()
            .with_mutually_exclusive(&["C", "B", "A"])
            .with_one_of(&["A", "B"]);
        let r = resource("A = 1\nB = 2\nC = 3\n");
        assert_eq!(evaluate(&r, &set), evaluate(&r, &set));
    }

    #[test]
    fn test_empty_constraint_set() {
        let r = resource("A = 1\n");
        assert!(evaluate(&r, &ConstraintSet::new()).is_empty());
    }
}
