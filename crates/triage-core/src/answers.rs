use crate::catalog::QuestionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
    Text(String),
}

/// Responses for one diagnostic session, keyed by question.
///
/// Lookups are kind-aware: reading a single value from a multiple-choice
/// answer (or the other way round) reports the question as unanswered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<QuestionId, Answer>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn get(&self, id: QuestionId) -> Option<&Answer> {
        self.answers.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &Answer)> {
        self.answers.iter().map(|(id, answer)| (*id, answer))
    }

    pub fn set(&mut self, id: QuestionId, answer: Answer) {
        self.answers.insert(id, answer);
    }

    pub fn set_single(&mut self, id: QuestionId, value: impl Into<String>) {
        self.set(id, Answer::Single(value.into()));
    }

    pub fn set_text(&mut self, id: QuestionId, text: impl Into<String>) {
        self.set(id, Answer::Text(text.into()));
    }

    pub fn set_multiple<I, S>(&mut self, id: QuestionId, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(id, Answer::Multiple(values.into_iter().map(Into::into).collect()));
    }

    /// Adds `value` if absent, removes it if present. A non-multiple answer
    /// stored under `id` is replaced.
    pub fn toggle(&mut self, id: QuestionId, value: &str) {
        let entry = self
            .answers
            .entry(id)
            .or_insert_with(|| Answer::Multiple(Vec::new()));
        match entry {
            Answer::Multiple(values) => {
                if let Some(pos) = values.iter().position(|item| item == value) {
                    values.remove(pos);
                } else {
                    values.push(value.to_string());
                }
            }
            other => *other = Answer::Multiple(vec![value.to_string()]),
        }
    }

    pub fn remove(&mut self, id: QuestionId) -> Option<Answer> {
        self.answers.remove(&id)
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn single(&self, id: QuestionId) -> Option<&str> {
        match self.answers.get(&id) {
            Some(Answer::Single(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn text(&self, id: QuestionId) -> Option<&str> {
        match self.answers.get(&id) {
            Some(Answer::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn multiple(&self, id: QuestionId) -> &[String] {
        match self.answers.get(&id) {
            Some(Answer::Multiple(values)) => values.as_slice(),
            _ => &[],
        }
    }

    pub fn contains(&self, id: QuestionId, value: &str) -> bool {
        self.multiple(id).iter().any(|item| item == value)
    }

    pub fn is_selected(&self, id: QuestionId, value: &str) -> bool {
        self.single(id) == Some(value) || self.contains(id, value)
    }
}
