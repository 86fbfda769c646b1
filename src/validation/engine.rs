//! Rule engine: recursion, dispatch and aggregation.

use std::sync::LazyLock;

use serde::Serialize;

use crate::config::ValidatorConfig;
use crate::observability::metrics;
use crate::validation::introspect::{introspect, normalize, Normalized};
use crate::validation::report::{UsageFault, ValidationIssue, ValidationReport};
use crate::validation::rules::RuleTable;
use crate::validation::value::{Field, Value};

static DEFAULT_VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::default);

/// Validate `record` with the default book rules and limits.
pub fn validate<T>(record: &T) -> Result<ValidationReport, UsageFault>
where
    T: Serialize + ?Sized,
{
    DEFAULT_VALIDATOR.validate(record)
}

/// Validates arbitrary records against a name-keyed rule table.
///
/// Holds only immutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: RuleTable,
    max_depth: usize,
}

impl Validator {
    /// Validator with the standard rules configured from `config`.
    pub fn new(config: &ValidatorConfig) -> Self {
        Self::with_rules(RuleTable::standard(config.max_string_len), config.max_depth)
    }

    pub fn with_rules(rules: RuleTable, max_depth: usize) -> Self {
        Self { rules, max_depth }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Validate `record`.
    ///
    /// Returns `Err` when the caller passed something that is not a record
    /// at all, and `Ok` with every defect found otherwise. An empty report
    /// means the record is valid.
    pub fn validate<T>(&self, record: &T) -> Result<ValidationReport, UsageFault>
    where
        T: Serialize + ?Sized,
    {
        let outcome = self.run(record);
        match &outcome {
            Ok(report) => {
                tracing::debug!(issues = report.len(), "Record validated");
                metrics::record_validation(report);
            }
            Err(fault) => {
                tracing::debug!(error = %fault, "Record validation refused");
                metrics::record_usage_fault();
            }
        }
        outcome
    }

    fn run<T>(&self, record: &T) -> Result<ValidationReport, UsageFault>
    where
        T: Serialize + ?Sized,
    {
        let value = introspect(record, self.max_depth)?;
        let record = match normalize(value)? {
            Normalized::Absent => return Err(UsageFault::Absent),
            Normalized::Record(record) => record,
        };

        let mut issues = Vec::with_capacity(record.fields.len());
        self.validate_fields(&record.fields, "", &mut issues);
        Ok(ValidationReport::new(issues))
    }

    fn validate_fields(&self, fields: &[Field], prefix: &str, issues: &mut Vec<ValidationIssue>) {
        if fields.is_empty() {
            issues.push(ValidationIssue::new(prefix, "struct is empty"));
            return;
        }

        for field in fields {
            let path = join_path(prefix, field.name);

            let value = match &field.value {
                Value::Optional(None) => {
                    issues.push(ValidationIssue::new(
                        path,
                        format!("{}: field is nil", field.name),
                    ));
                    continue;
                }
                Value::Optional(Some(inner)) => inner.as_ref(),
                other => other,
            };

            if let Value::Record(nested) = value {
                if !nested.is_instant() {
                    self.validate_fields(&nested.fields, &path, issues);
                }
                continue;
            }

            let name = field.name.to_lowercase();
            if let Some(rule) = self.rules.lookup(&name) {
                issues.extend(
                    rule.check(&name, value)
                        .into_iter()
                        .map(|message| ValidationIssue::new(path.clone(), message)),
                );
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&ValidatorConfig::default())
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
