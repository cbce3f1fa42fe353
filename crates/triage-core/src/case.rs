use crate::analysis::Analysis;
use crate::answers::AnswerSet;
use crate::engine::analyze;
use crate::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved diagnostic result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    /// Creation time in milliseconds since the epoch.
    pub id: i64,
    #[serde(rename = "type")]
    pub category: Category,
    pub type_name: String,
    pub date: DateTime<Utc>,
    pub answers: AnswerSet,
    pub analysis: Analysis,
}

impl Case {
    pub fn new(category: Category, answers: AnswerSet, created_at: DateTime<Utc>) -> Self {
        let analysis = analyze(category, &answers);
        Self {
            id: created_at.timestamp_millis(),
            category,
            type_name: category.display_name().to_string(),
            date: created_at,
            answers,
            analysis,
        }
    }
}
