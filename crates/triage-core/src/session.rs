//! Wizard navigation state.
//!
//! The host owns a [`Session`] and drives it from UI events. Navigation
//! calls made in the wrong state are no-ops.

use crate::analysis::Analysis;
use crate::answers::AnswerSet;
use crate::case::Case;
use crate::catalog::{questions_for, Question, QuestionId, QuestionKind};
use crate::engine::analyze;
use crate::Category;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    InProgress {
        step: usize,
    },
    Complete,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    category: Option<Category>,
    answers: AnswerSet,
    draft: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn questions(&self) -> &'static [Question] {
        self.category.map(questions_for).unwrap_or(&[])
    }

    pub fn start(&mut self, category: Category) {
        self.category = Some(category);
        self.answers = AnswerSet::new();
        self.draft.clear();
        self.state = if questions_for(category).is_empty() {
            SessionState::Complete
        } else {
            SessionState::InProgress { step: 0 }
        };
        tracing::debug!(category = %category, "diagnostic started");
        self.load_draft();
    }

    /// Reopens a saved case in the completed state.
    pub fn resume_case(&mut self, case: &Case) {
        self.category = Some(case.category);
        self.answers = case.answers.clone();
        self.draft.clear();
        self.state = SessionState::Complete;
    }

    pub fn current_step(&self) -> Option<usize> {
        match self.state {
            SessionState::InProgress { step } => Some(step),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        self.current_step()
            .and_then(|step| self.questions().get(step))
    }

    /// Stores a single-choice or free-text answer. Does not advance.
    pub fn answer(&mut self, id: QuestionId, value: impl Into<String>) {
        let Some(question) = self.find(id) else {
            tracing::debug!(question = %id, "answer for question outside active category ignored");
            return;
        };
        let value = value.into();
        match question.kind {
            QuestionKind::Single => self.answers.set_single(id, value),
            QuestionKind::Text => {
                if self.current_question().map(|q| q.id) == Some(id) {
                    self.draft = value.clone();
                }
                self.answers.set_text(id, value);
            }
            QuestionKind::Multiple => {
                tracing::debug!(question = %id, "use toggle_multi_value for multiple-choice questions");
            }
        }
    }

    pub fn toggle_multi_value(&mut self, id: QuestionId, value: &str) {
        match self.find(id) {
            Some(question) if question.kind == QuestionKind::Multiple => {
                self.answers.toggle(id, value);
            }
            _ => {
                tracing::debug!(question = %id, "toggle on non multiple-choice question ignored");
            }
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn advance(&mut self) {
        let SessionState::InProgress { step } = self.state else {
            return;
        };
        if let Some(question) = self.current_question() {
            if question.kind == QuestionKind::Text {
                let text = std::mem::take(&mut self.draft);
                self.answers.set_text(question.id, text);
            }
        }
        let total = self.questions().len();
        self.state = if step + 1 < total {
            SessionState::InProgress { step: step + 1 }
        } else {
            SessionState::Complete
        };
        self.load_draft();
    }

    pub fn retreat(&mut self) {
        if let SessionState::InProgress { step } = self.state {
            if step > 0 {
                self.state = SessionState::InProgress { step: step - 1 };
                self.load_draft();
            }
        }
    }

    pub fn abandon(&mut self) {
        self.state = SessionState::Idle;
        self.category = None;
        self.answers.clear();
        self.draft.clear();
    }

    pub fn previous_disabled(&self) -> bool {
        !matches!(self.state, SessionState::InProgress { step } if step > 0)
    }

    pub fn is_last_step(&self) -> bool {
        match self.state {
            SessionState::InProgress { step } => step + 1 == self.questions().len(),
            _ => false,
        }
    }

    /// `(current, total)` with a 1-based current step.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.questions().len();
        match self.state {
            SessionState::InProgress { step } => (step + 1, total),
            SessionState::Complete => (total, total),
            SessionState::Idle => (0, total),
        }
    }

    pub fn progress_percent(&self) -> u16 {
        let (current, total) = self.progress();
        if total == 0 {
            return 0;
        }
        ((current * 100) / total) as u16
    }

    pub fn analysis(&self) -> Option<Analysis> {
        match (self.state, self.category) {
            (SessionState::Complete, Some(category)) => Some(analyze(category, &self.answers)),
            _ => None,
        }
    }

    fn find(&self, id: QuestionId) -> Option<&'static Question> {
        self.questions().iter().find(|question| question.id == id)
    }

    fn load_draft(&mut self) {
        self.draft = match self.current_question() {
            Some(question) if question.kind == QuestionKind::Text => self
                .answers
                .text(question.id)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };
    }
}
