//! Generic record validation.
//!
//! # Data Flow
//! ```text
//! &T where T: Serialize
//!     → introspect.rs (serde shape capture → Value)
//!     → introspect.rs (normalize: Absent | Record | UsageFault)
//!     → engine.rs (walk fields, recurse into nested records)
//!     → rules.rs (lower-cased field name → FieldRule)
//!     → scanner.rs (SQL / script injection heuristics)
//!     → Result<ValidationReport, UsageFault>
//! ```
//!
//! # Design Decisions
//! - The record type is never known at compile time; shape is discovered
//!   through serde
//! - All defects are collected, never fail-fast
//! - Caller misuse (absent or non-record input) is a separate error type
//! - Time instants are structurally valid and never descended into
//! - Pure and re-entrant: no shared mutable state, no I/O

pub mod engine;
pub mod introspect;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod value;

pub use engine::{validate, Validator};
pub use introspect::{introspect, normalize, Normalized};
pub use report::{UsageFault, ValidationIssue, ValidationReport};
pub use rules::{BoundedStringRule, FieldRule, IdentityRule, RuleTable};
pub use scanner::{scan, Finding, Threat};
pub use value::{Field, Kind, Record, Value};
