use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod analysis;
pub mod answers;
pub mod case;
pub mod catalog;
pub mod engine;
pub mod incident;
pub mod report;
pub mod session;

pub use analysis::Analysis;
pub use answers::{Answer, AnswerSet};
pub use case::Case;
pub use catalog::{Question, QuestionId, QuestionKind};
pub use engine::{analyze, analyze_tag};
pub use incident::{count_by_severity, Incident, IncidentDraft, IncidentStatus, SeverityCounts};
pub use session::{Session, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown incident category: {0}")]
    Category(String),
    #[error("unknown severity: {0}")]
    Severity(String),
    #[error("unknown incident status: {0}")]
    Status(String),
    #[error("unknown question id: {0}")]
    Question(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Ransomware,
    Phishing,
    DataBreach,
    Malware,
    Ddos,
    UnauthorizedAccess,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Ransomware,
        Category::Phishing,
        Category::DataBreach,
        Category::Malware,
        Category::Ddos,
        Category::UnauthorizedAccess,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Category::Ransomware => "ransomware",
            Category::Phishing => "phishing",
            Category::DataBreach => "data-breach",
            Category::Malware => "malware",
            Category::Ddos => "ddos",
            Category::UnauthorizedAccess => "unauthorized-access",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Ransomware => "Ransomware",
            Category::Phishing => "Phishing",
            Category::DataBreach => "Brecha de Datos",
            Category::Malware => "Malware",
            Category::Ddos => "DDoS",
            Category::UnauthorizedAccess => "Acceso No Autorizado",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.tag() == value.trim())
            .ok_or_else(|| ParseError::Category(value.to_string()))
    }
}

/// Ordered so that `max` never lowers an established level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Upper-case code used in text exports and case listings.
    pub fn code(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn escalate(self) -> Self {
        match self {
            Severity::Low => Severity::Medium,
            Severity::Medium => Severity::High,
            Severity::High | Severity::Critical => Severity::Critical,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(ParseError::Severity(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_tags_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.tag().parse().expect("parse");
            assert_eq!(parsed, category);
            let json = serde_json::to_string(&category).expect("serialize");
            assert_eq!(json, format!("\"{}\"", category.tag()));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "worm".parse::<Category>().err().expect("expected error");
        assert_eq!(err, ParseError::Category("worm".to_string()));
    }

    #[test]
    fn escalation_saturates_at_critical() {
        assert_eq!(Severity::Medium.escalate(), Severity::High);
        assert_eq!(Severity::High.escalate(), Severity::Critical);
        assert_eq!(Severity::Critical.escalate(), Severity::Critical);
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
    }
}
