//! Template validation command

use crate::config::{ConfigFile, OutputFormat};
use anyhow::{Context, Result};
use keel_constraint::{Linter, RuleRegistry, Severity, ValidationReport, Violation};
use keel_document::load_document;
use keel_schema::SchemaRegistry;

pub struct ValidateArgs {
    pub templates: Vec<String>,
    pub schemas: Vec<String>,
    pub format: Option<OutputFormat>,
    pub ignore_rules: Vec<String>,
    pub config: Option<String>,
}

/// Report for one template file
pub struct FileReport {
    pub file: String,
    pub report: ValidationReport,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let config = ConfigFile::load(args.config.as_deref())?;
    let format = args.format.or(config.format).unwrap_or_default();

    let schema_dirs = config.schema_dirs(&args.schemas);
    let schema_registry = SchemaRegistry::load_from_directories(&schema_dirs)
        .context("Failed to load constraint schemas")?;

    if schema_registry.is_empty() {
        eprintln!(
            "No constraint schemas found in {}",
            schema_dirs
                .iter()
                .map(|d| format!("{}/constraints/", d))
                .collect::<Vec<_>>()
                .join(", ")
        );
        eprintln!("Create constraint files to enable validation.");
        return Ok(());
    }

    let rules = RuleRegistry::with_builtin_rules();
    let mut linter = Linter::new(&rules, &schema_registry);
    for id in config.ignored_rules(&args.ignore_rules) {
        linter.disable_rule(&id)?;
    }
    for (id, severity) in &config.severity {
        linter.set_severity(id, *severity)?;
    }

    let mut reports = Vec::new();
    for template in &args.templates {
        let document = load_document(template)
            .with_context(|| format!("Failed to load template {}", template))?;
        reports.push(FileReport {
            file: template.clone(),
            report: linter.validate(&document),
        });
    }

    let mut combined = ValidationReport::new();
    for file_report in &reports {
        combined.merge(file_report.report.clone());
    }

    match format {
        OutputFormat::Json => println!("{}", format_json(&reports, &combined)?),
        OutputFormat::Text => print!("{}", format_text(&reports, &combined)),
    }

    if !combined.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "ERROR",
        Severity::Warning => "WARN ",
        Severity::Info => "INFO ",
    }
}

fn format_violation(file: &str, violation: &Violation) -> String {
    format!(
        "{}:{}:{}: [{}] {} {}",
        file,
        violation.diagnostic.line,
        violation.diagnostic.column,
        severity_label(violation.severity),
        violation.rule_id,
        violation.diagnostic.message
    )
}

pub fn format_text(reports: &[FileReport], combined: &ValidationReport) -> String {
    if combined.violations.is_empty() {
        return "All constraints passed.\n".to_string();
    }

    let mut output = String::new();
    for file_report in reports {
        for violation in &file_report.report.violations {
            output.push_str(&format_violation(&file_report.file, violation));
            output.push('\n');
        }
    }
    output.push('\n');
    output.push_str(&combined.summary());
    output.push('\n');
    output
}

pub fn format_json(reports: &[FileReport], combined: &ValidationReport) -> Result<String> {
    let violations: Vec<serde_json::Value> = reports
        .iter()
        .flat_map(|file_report| {
            file_report.report.violations.iter().map(|v| {
                serde_json::json!({
                    "rule": v.rule_id,
                    "severity": v.severity,
                    "message": v.diagnostic.message,
                    "file": file_report.file,
                    "line": v.diagnostic.line,
                    "column": v.diagnostic.column,
                    "path": v.diagnostic.path,
                })
            })
        })
        .collect();

    let output = serde_json::json!({
        "valid": combined.is_valid(),
        "summary": combined.summary(),
        "errors": combined.error_count(),
        "warnings": combined.warning_count(),
        "info": combined.info_count(),
        "violations": violations,
    });

    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_constraint::Diagnostic;
    use keel_core::Position;

    fn sample() -> (Vec<FileReport>, ValidationReport) {
        let mut report = ValidationReport::new();
        report.violations.push(Violation {
            rule_id: "E3017".to_string(),
            severity: Severity::Error,
            diagnostic: Diagnostic::new(
                "AppLogs has 3 FieldIndexPolicies, exceeding the limit of 2",
                Position::new(5, 1),
                vec![
                    "Resources".to_string(),
                    "AppLogs".to_string(),
                    "Properties".to_string(),
                    "FieldIndexPolicies".to_string(),
                ],
            ),
        });
        let combined = report.clone();
        (
            vec![FileReport {
                file: "stack.toml".to_string(),
                report,
            }],
            combined,
        )
    }

    #[test]
    fn test_text_output() {
        let (reports, combined) = sample();
        let text = format_text(&reports, &combined);
        assert!(text.starts_with(
            "stack.toml:5:1: [ERROR] E3017 AppLogs has 3 FieldIndexPolicies, exceeding the limit of 2\n"
        ));
        assert!(text.ends_with("1 violation(s): 1 error(s), 0 warning(s), 0 info\n"));
    }

    #[test]
    fn test_text_output_when_clean() {
        let combined = ValidationReport::new();
        assert_eq!(format_text(&[], &combined), "All constraints passed.\n");
    }

    #[test]
    fn test_json_output() {
        let (reports, combined) = sample();
        let json: serde_json::Value =
            serde_json::from_str(&format_json(&reports, &combined).unwrap()).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"], 1);
        assert_eq!(json["violations"][0]["rule"], "E3017");
        assert_eq!(json["violations"][0]["severity"], "error");
        assert_eq!(json["violations"][0]["line"], 5);
        assert_eq!(json["violations"][0]["path"][3], "FieldIndexPolicies");
    }
}
