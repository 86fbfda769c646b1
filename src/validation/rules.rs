//! Field rules and the name → rule table.
//!
//! # Responsibilities
//! - Check a single field value and describe every defect found
//! - Map lower-cased field names to rules
//!
//! # Design Decisions
//! - Dispatch is by field name only; unknown names get no rule
//! - A rule returns messages, the engine attaches field paths
//! - Type checks short-circuit: a value of the wrong kind has nothing
//!   further to check

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::validation::scanner;
use crate::validation::value::Value;

/// Default maximum length of a bounded string, in UTF-8 bytes.
pub const DEFAULT_MAX_STRING_LEN: usize = 100;

/// A check applied to one named field.
pub trait FieldRule: Send + Sync + Debug {
    /// Messages describing every defect in `value`; empty when it passes.
    fn check(&self, field: &str, value: &Value) -> Vec<String>;
}

/// Record identity: a nonzero unsigned integer. Zero means "not yet
/// assigned".
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRule;

impl FieldRule for IdentityRule {
    fn check(&self, field: &str, value: &Value) -> Vec<String> {
        match value.as_unsigned() {
            None => vec![format!("{} must be unsigned integer", field)],
            Some(0) => vec![format!("{} cannot be zero", field)],
            Some(_) => Vec::new(),
        }
    }
}

/// Non-empty string of bounded length, free of injection patterns.
#[derive(Debug, Clone, Copy)]
pub struct BoundedStringRule {
    max_len: usize,
}

impl BoundedStringRule {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for BoundedStringRule {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STRING_LEN)
    }
}

impl FieldRule for BoundedStringRule {
    fn check(&self, field: &str, value: &Value) -> Vec<String> {
        let Some(text) = value.as_str() else {
            return vec![format!("{}: must be string", field)];
        };
        if text.is_empty() {
            return vec![format!("{}: cannot be empty", field)];
        }
        if text.len() > self.max_len {
            return vec![format!("{}: cannot be larger than {}", field, self.max_len)];
        }
        match scanner::scan(text) {
            Some(finding) => vec![format!("field: {}, {}", field, finding)],
            None => Vec::new(),
        }
    }
}

/// Case-insensitive mapping from field name to rule.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, Arc<dyn FieldRule>>,
}

impl RuleTable {
    /// An empty table: every field passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The book rules: `id` is an identity, `title`, `genre` and `author`
    /// are bounded strings.
    pub fn standard(max_string_len: usize) -> Self {
        let strings: Arc<dyn FieldRule> = Arc::new(BoundedStringRule::new(max_string_len));
        let mut table = Self::new();
        table.register("id", Arc::new(IdentityRule));
        table.register("title", strings.clone());
        table.register("genre", strings.clone());
        table.register("author", strings);
        table
    }

    /// Add or replace the rule for `name`.
    pub fn register(&mut self, name: &str, rule: Arc<dyn FieldRule>) -> &mut Self {
        self.rules.insert(name.to_lowercase(), rule);
        self
    }

    /// Rule for `name`, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&dyn FieldRule> {
        self.rules.get(&name.to_lowercase()).map(|rule| rule.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_string(text: &str) -> Vec<String> {
        BoundedStringRule::default().check("title", &Value::Str(text.to_string()))
    }

    #[test]
    fn test_identity_rule() {
        let rule = IdentityRule;
        assert!(rule.check("id", &Value::Unsigned(1)).is_empty());
        assert_eq!(rule.check("id", &Value::Unsigned(0)), vec!["id cannot be zero"]);
        assert_eq!(
            rule.check("id", &Value::Str("not-a-number".into())),
            vec!["id must be unsigned integer"]
        );
        assert_eq!(
            rule.check("id", &Value::Signed(5)),
            vec!["id must be unsigned integer"]
        );
    }

    #[test]
    fn test_bounded_string_rule() {
        assert!(check_string("Clean Code").is_empty());
        assert_eq!(check_string(""), vec!["title: cannot be empty"]);
        assert!(check_string(&"a".repeat(100)).is_empty());
        assert_eq!(
            check_string(&"a".repeat(101)),
            vec!["title: cannot be larger than 100"]
        );
        // length counts UTF-8 bytes: "é" is two
        assert!(check_string(&"é".repeat(50)).is_empty());
        assert_eq!(
            check_string(&"é".repeat(60)),
            vec!["title: cannot be larger than 100"]
        );
    }

    #[test]
    fn test_bounded_string_wrong_kind() {
        let rule = BoundedStringRule::default();
        assert_eq!(
            rule.check("title", &Value::Signed(42)),
            vec!["title: must be string"]
        );
    }

    #[test]
    fn test_bounded_string_scan() {
        assert_eq!(
            check_string("1; DROP TABLE books"),
            vec!["field: title, 1; DROP TABLE books contains SQL injection patterns"]
        );
        assert_eq!(
            check_string("<script>x</script>"),
            vec!["field: title, <script>x</script> contains XSS pattern"]
        );
    }

    #[test]
    fn test_rule_table_lookup_ignores_case() {
        let table = RuleTable::standard(100);
        assert_eq!(table.len(), 4);
        assert!(table.lookup("ID").is_some());
        assert!(table.lookup("Title").is_some());
        assert!(table.lookup("publication_date").is_none());
    }

    #[test]
    fn test_rule_table_register() {
        #[derive(Debug)]
        struct AlwaysFails;
        impl FieldRule for AlwaysFails {
            fn check(&self, field: &str, _value: &Value) -> Vec<String> {
                vec![format!("{}: rejected", field)]
            }
        }

        let mut table = RuleTable::new();
        table.register("ISBN", Arc::new(AlwaysFails));
        let rule = table.lookup("isbn").unwrap();
        assert_eq!(rule.check("isbn", &Value::Unit), vec!["isbn: rejected"]);
    }
}
