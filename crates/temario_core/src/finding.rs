use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}

/// A single validation or analysis finding.
///
/// `code` is the theme-node code the finding is anchored to, or empty for
/// tree-level findings (e.g. distribution imbalance).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    pub message: String,
}

impl Finding {
    pub fn error(rule_id: &str, code: &str, message: String) -> Finding {
        Finding {
            rule_id: rule_id.to_string(),
            severity: Severity::Error,
            code: code.to_string(),
            message,
        }
    }

    pub fn warning(rule_id: &str, code: &str, message: String) -> Finding {
        Finding {
            rule_id: rule_id.to_string(),
            severity: Severity::Warning,
            code: code.to_string(),
            message,
        }
    }

    pub fn info(rule_id: &str, code: &str, message: String) -> Finding {
        Finding {
            rule_id: rule_id.to_string(),
            severity: Severity::Info,
            code: code.to_string(),
            message,
        }
    }
}
