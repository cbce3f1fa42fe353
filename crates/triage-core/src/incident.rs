//! Incident log records and the dashboard tally.

use crate::{ParseError, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[default]
    Open,
    Investigating,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentStatus {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(IncidentStatus::Open),
            "investigating" => Ok(IncidentStatus::Investigating),
            "resolved" => Ok(IncidentStatus::Resolved),
            "closed" => Ok(IncidentStatus::Closed),
            _ => Err(ParseError::Status(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub source: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: IncidentStatus,
}

/// Form input for a new incident.
#[derive(Debug, Clone)]
pub struct IncidentDraft {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub kind: String,
    pub source: String,
    pub status: IncidentStatus,
}

impl Incident {
    pub fn from_draft(draft: IncidentDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: created_at.timestamp_millis(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            severity: draft.severity,
            kind: draft.kind.trim().to_string(),
            source: draft.source.trim().to_string(),
            created_at,
            status: draft.status,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }

    fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

pub fn count_by_severity(incidents: &[Incident], status_filter: IncidentStatus) -> SeverityCounts {
    incidents
        .iter()
        .filter(|incident| incident.status == status_filter)
        .fold(SeverityCounts::default(), |mut counts, incident| {
            counts.bump(incident.severity);
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn incident(id: i64, severity: Severity, status: IncidentStatus) -> Incident {
        let created_at = Utc.timestamp_millis_opt(id).single().expect("time");
        Incident::from_draft(
            IncidentDraft {
                title: format!("incident {id}"),
                description: String::new(),
                severity,
                kind: "phishing".to_string(),
                source: "mail gateway".to_string(),
                status,
            },
            created_at,
        )
    }

    #[test]
    fn counts_open_incidents_by_severity() {
        let incidents = vec![
            incident(1, Severity::Critical, IncidentStatus::Open),
            incident(2, Severity::High, IncidentStatus::Open),
            incident(3, Severity::High, IncidentStatus::Open),
        ];
        let counts = count_by_severity(&incidents, IncidentStatus::Open);
        assert_eq!(
            counts,
            SeverityCounts {
                critical: 1,
                high: 2,
                medium: 0,
                low: 0
            }
        );
    }

    #[test]
    fn non_open_incidents_are_excluded() {
        let incidents = vec![
            incident(1, Severity::Critical, IncidentStatus::Open),
            incident(2, Severity::High, IncidentStatus::Resolved),
            incident(3, Severity::Low, IncidentStatus::Closed),
        ];
        let counts = count_by_severity(&incidents, IncidentStatus::Open);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.get(Severity::Critical), 1);
        assert_eq!(count_by_severity(&incidents, IncidentStatus::Resolved).high, 1);
        assert_eq!(count_by_severity(&[], IncidentStatus::Open), SeverityCounts::default());
    }

    #[test]
    fn draft_fields_are_trimmed_and_id_is_timestamp() {
        let created_at = Utc.timestamp_millis_opt(1_700_000_000_123).single().expect("time");
        let incident = Incident::from_draft(
            IncidentDraft {
                title: "  Correo sospechoso ".to_string(),
                description: " enlace ".to_string(),
                severity: Severity::Medium,
                kind: "phishing".to_string(),
                source: "usuario".to_string(),
                status: IncidentStatus::Open,
            },
            created_at,
        );
        assert_eq!(incident.id, 1_700_000_000_123);
        assert_eq!(incident.title, "Correo sospechoso");
        assert_eq!(incident.description, "enlace");

        let json = serde_json::to_value(&incident).expect("serialize");
        assert_eq!(json["type"], "phishing");
        assert_eq!(json["status"], "open");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Open".parse::<IncidentStatus>().expect("parse"), IncidentStatus::Open);
        assert!("archived".parse::<IncidentStatus>().is_err());
    }
}
