//! Validation outcomes.
//!
//! Two disjoint kinds never get conflated:
//! - [`ValidationReport`]: defects in user data, collected exhaustively.
//! - [`UsageFault`]: the caller asked to validate something nonsensical.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::validation::value::Kind;

/// One content defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path of the offending field; empty for record-level issues.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered issues found in one call. Empty means valid.
#[must_use = "a non-empty report means the record was rejected"]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue messages in report order.
    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }

    /// True if any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.issues.iter().any(|i| i.message.contains(needle))
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return f.write_str("no validation errors");
        }
        writeln!(f, "Validation errors:")?;
        for issue in &self.issues {
            writeln!(f, "  • {}", issue)?;
        }
        Ok(())
    }
}

/// The validator was invoked incorrectly. Not a data problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageFault {
    /// The root value is `()` or `None`.
    #[error("cannot validate an absent value")]
    Absent,

    /// The root value is not a structured record.
    #[error("cannot validate non-record type: {kind}")]
    NotARecord { kind: Kind },

    /// The value nests deeper than the configured limit.
    #[error("record nesting exceeds {limit} levels")]
    TooDeep { limit: usize },

    /// The value's own `Serialize` impl reported an error.
    #[error("record could not be introspected: {0}")]
    Introspection(String),
}

impl serde::ser::Error for UsageFault {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        UsageFault::Introspection(msg.to_string())
    }
}

impl std::error::Error for ValidationReport {}
