use crate::Severity;
use serde::{Deserialize, Serialize};

/// Remediation plan derived from a category and its answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub severity: Severity,
    pub situation: String,
    pub immediate_actions: Vec<String>,
    pub containment: Vec<String>,
    pub recovery: Vec<String>,
    pub long_term: Vec<String>,
    pub resources: Vec<String>,
}

/// The ordered list fields of an [`Analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Immediate,
    Containment,
    Recovery,
    LongTerm,
    Resources,
}

impl Analysis {
    pub fn section(&self, section: Section) -> &[String] {
        match section {
            Section::Immediate => &self.immediate_actions,
            Section::Containment => &self.containment,
            Section::Recovery => &self.recovery,
            Section::LongTerm => &self.long_term,
            Section::Resources => &self.resources,
        }
    }

    pub(crate) fn section_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Immediate => &mut self.immediate_actions,
            Section::Containment => &mut self.containment,
            Section::Recovery => &mut self.recovery,
            Section::LongTerm => &mut self.long_term,
            Section::Resources => &mut self.resources,
        }
    }
}
