use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
    /// Dotted path of the offending setting, e.g. `retention.events`.
    pub field: String,
    pub help: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

#[derive(Serialize)]
struct ValidationReportJson<'a> {
    errors: &'a [ValidationIssue],
    warnings: &'a [ValidationIssue],
}

impl ValidationReport {
    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    pub(crate) fn error(&mut self, field: &str, message: String, help: Option<String>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            message,
            field: field.to_string(),
            help,
        });
    }

    pub(crate) fn warning(&mut self, field: &str, message: String, help: Option<String>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            message,
            field: field.to_string(),
            help,
        });
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&ValidationReportJson {
            errors: &self.errors,
            warnings: &self.warnings,
        })
    }

    pub fn render_pretty(&self) -> String {
        let mut out = String::new();

        if self.has_violations() {
            out.push_str(&format!(
                "configuration validation failed ({} errors, {} warnings)\n\n",
                self.errors.len(),
                self.warnings.len()
            ));
        }

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let label = match issue.severity {
                Severity::Error => "error".red().bold().to_string(),
                Severity::Warning => "warning".yellow().bold().to_string(),
            };

            out.push_str(&format!("  {label}: {} ({})\n", issue.message, issue.field));
            if let Some(help) = &issue.help {
                out.push_str(&format!("    help: {help}\n"));
            }
        }

        out
    }
}

/// Scenario validation
impl ValidationReport {
    pub fn empty_scenario_id(&mut self, index: usize) {
        self.error(
            &format!("scenarios[{index}].id"),
            "scenario id must not be empty".to_string(),
            None,
        );
    }

    pub fn duplicate_scenario(&mut self, id: &str, index: usize) {
        self.error(
            &format!("scenarios[{index}].id"),
            format!("duplicate scenario id '{id}'"),
            None,
        );
    }

    pub fn empty_marker(&mut self, id: &str, index: usize) {
        self.error(
            &format!("scenarios[{index}].markers"),
            format!("scenario '{id}' has an empty marker"),
            Some("an empty marker would match every line".to_string()),
        );
    }

    pub fn shared_marker(&mut self, marker: &str, first: &str, second: &str) {
        self.warning(
            "scenarios",
            format!("marker '{marker}' is declared by both '{first}' and '{second}'"),
            Some(format!("lines containing it are always routed to '{first}'")),
        );
    }

    pub fn unknown_default_scenario(&mut self, id: &str) {
        self.error(
            "default_scenario",
            format!("default scenario '{id}' is not declared"),
            Some("add it to `scenarios` or pick a declared id".to_string()),
        );
    }
}

/// Limits
impl ValidationReport {
    pub fn zero_value(&mut self, field: &str) {
        self.error(field, format!("{field} must be greater than zero"), None);
    }
}
