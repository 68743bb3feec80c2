//! Rule dispatch over a whole template

use crate::registry::RuleRegistry;
use crate::report::{ValidationReport, Violation};
use crate::types::Severity;
use keel_core::{KeelError, Result};
use keel_document::{Document, Resource};
use keel_schema::ConstraintSource;
use std::collections::{HashMap, HashSet};

/// Runs every enabled rule against every resource of a template
pub struct Linter<'a> {
    rules: &'a RuleRegistry,
    schemas: &'a dyn ConstraintSource,
    disabled: HashSet<String>,
    severities: HashMap<String, Severity>,
}

impl<'a> Linter<'a> {
    /// Create a new linter
    pub fn new(rules: &'a RuleRegistry, schemas: &'a dyn ConstraintSource) -> Self {
        Self {
            rules,
            schemas,
            disabled: HashSet::new(),
            severities: HashMap::new(),
        }
    }

    /// Skip a rule entirely
    pub fn disable_rule(&mut self, id: &str) -> Result<()> {
        self.ensure_known(id)?;
        self.disabled.insert(id.to_string());
        Ok(())
    }

    /// Report a rule's violations at a different severity
    pub fn set_severity(&mut self, id: &str, severity: Severity) -> Result<()> {
        self.ensure_known(id)?;
        self.severities.insert(id.to_string(), severity);
        Ok(())
    }

    fn ensure_known(&self, id: &str) -> Result<()> {
        if self.rules.contains(id) {
            Ok(())
        } else {
            Err(KeelError::UnknownRule(id.to_string()))
        }
    }

    /// Validate every resource in declaration order and return a report
    pub fn validate(&self, document: &Document) -> ValidationReport {
        let mut report = ValidationReport::new();
        for resource in document.resources() {
            report.violations.extend(self.validate_resource(resource));
        }
        tracing::info!(
            resources = document.len(),
            violations = report.violations.len(),
            "template validated"
        );
        report
    }

    /// Validate a single resource. Types without a constraint set are skipped.
    pub fn validate_resource(&self, resource: &Resource) -> Vec<Violation> {
        let Some(constraints) = self.schemas.resource_constraints(&resource.resource_type) else {
            tracing::debug!(
                resource = %resource.name,
                resource_type = %resource.resource_type,
                "no constraint set, skipping"
            );
            return Vec::new();
        };

        let mut violations = Vec::new();
        for rule in self.rules.all() {
            if self.disabled.contains(rule.id()) {
                continue;
            }
            let severity = self
                .severities
                .get(rule.id())
                .copied()
                .unwrap_or(rule.meta().severity);
            violations.extend(rule.check(resource, constraints).into_iter().map(|diagnostic| {
                Violation {
                    rule_id: rule.id().to_string(),
                    severity,
                    diagnostic,
                }
            }));
        }

        tracing::debug!(
            resource = %resource.name,
            violations = violations.len(),
            "resource evaluated"
        );
        violations
    }
}
