//! Heuristic injection scanner.
//!
//! Flags string content that looks like SQL or script injection. This is
//! advisory only; the storage layer must still bind parameters.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static SQL_INJECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\b(UNION|SELECT|INSERT|DELETE|UPDATE|DROP|ALTER|CREATE|EXEC)\b|--|;|/\*|\*/|xp_)")
        .expect("sql injection pattern is valid")
});

static SCRIPT_INJECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(<script|javascript:|onerror=|onload=|onclick=)")
        .expect("script injection pattern is valid")
});

/// Category of a suspicious pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threat {
    SqlInjection,
    ScriptInjection,
}

/// A suspicious pattern found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub threat: Threat,
    pub text: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.threat {
            Threat::SqlInjection => write!(f, "{} contains SQL injection patterns", self.text),
            Threat::ScriptInjection => write!(f, "{} contains XSS pattern", self.text),
        }
    }
}

/// Scan `text`. SQL patterns win over script patterns; at most one
/// finding is returned.
pub fn scan(text: &str) -> Option<Finding> {
    let threat = if SQL_INJECTION.is_match(text) {
        Threat::SqlInjection
    } else if SCRIPT_INJECTION.is_match(text) {
        Threat::ScriptInjection
    } else {
        return None;
    };
    Some(Finding {
        threat,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threat(text: &str) -> Option<Threat> {
        scan(text).map(|f| f.threat)
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(threat("Clean Code"), None);
        assert_eq!(threat("Robert C. Martin"), None);
        assert_eq!(threat("Programming"), None);
        // keywords only count as whole words
        assert_eq!(threat("Selected Essays"), None);
        assert_eq!(threat("Updated Edition"), None);
    }

    #[test]
    fn test_sql_patterns() {
        assert_eq!(threat("SELECT * FROM users"), Some(Threat::SqlInjection));
        assert_eq!(threat("1 union all"), Some(Threat::SqlInjection));
        assert_eq!(threat("admin'--"), Some(Threat::SqlInjection));
        assert_eq!(threat("a; b"), Some(Threat::SqlInjection));
        assert_eq!(threat("/* c */"), Some(Threat::SqlInjection));
        assert_eq!(threat("xp_cmdshell"), Some(Threat::SqlInjection));
    }

    #[test]
    fn test_script_patterns() {
        assert_eq!(threat("<SCRIPT>alert(1)"), Some(Threat::ScriptInjection));
        assert_eq!(threat("JavaScript:void(0)"), Some(Threat::ScriptInjection));
        assert_eq!(threat("<img onerror=x>"), Some(Threat::ScriptInjection));
        assert_eq!(threat("<body onload=x>"), Some(Threat::ScriptInjection));
        assert_eq!(threat("<a onclick=x>"), Some(Threat::ScriptInjection));
    }

    #[test]
    fn test_sql_takes_priority() {
        let finding = scan("<script>DROP TABLE books</script>").unwrap();
        assert_eq!(finding.threat, Threat::SqlInjection);
    }

    #[test]
    fn test_finding_messages() {
        assert_eq!(
            scan("DROP").unwrap().to_string(),
            "DROP contains SQL injection patterns"
        );
        assert_eq!(
            scan("<script>").unwrap().to_string(),
            "<script> contains XSS pattern"
        );
    }
}
