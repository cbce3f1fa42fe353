use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;
use triage_core::{Analysis, Case, Category, QuestionKind, Session, SessionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    Selector,
    Wizard,
    Results,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum SelectorFocus {
    #[default]
    Categories,
    History,
}

/// Side effects the event loop performs on behalf of the key handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UiCommand {
    Quit,
    SaveCase,
    DownloadReport,
}

pub(crate) struct AppState {
    pub(crate) session: Session,
    pub(crate) focus: SelectorFocus,
    pub(crate) category_selected: usize,
    pub(crate) category_list_state: ListState,
    pub(crate) history: Vec<Case>,
    pub(crate) history_limit: usize,
    pub(crate) history_selected: usize,
    pub(crate) history_list_state: ListState,
    pub(crate) option_selected: usize,
    pub(crate) option_list_state: ListState,
    /// Saved case being reviewed; its stored analysis is shown as-is.
    pub(crate) viewing_case: Option<Case>,
    pub(crate) result_scroll: usize,
    pub(crate) result_max_scroll: usize,
    pub(crate) result_total_lines: usize,
    pub(crate) result_view_height: u16,
    pub(crate) pending_g: bool,
    pub(crate) confirm_quit: bool,
    pub(crate) notice: Option<String>,
}

impl AppState {
    pub(crate) fn new(history_limit: usize) -> Self {
        let mut app = Self {
            session: Session::new(),
            focus: SelectorFocus::Categories,
            category_selected: 0,
            category_list_state: ListState::default(),
            history: Vec::new(),
            history_limit,
            history_selected: 0,
            history_list_state: ListState::default(),
            option_selected: 0,
            option_list_state: ListState::default(),
            viewing_case: None,
            result_scroll: 0,
            result_max_scroll: 0,
            result_total_lines: 0,
            result_view_height: 0,
            pending_g: false,
            confirm_quit: false,
            notice: None,
        };
        app.sync_selection();
        app
    }

    pub(crate) fn screen(&self) -> Screen {
        match self.session.state() {
            SessionState::Idle => Screen::Selector,
            SessionState::InProgress { .. } => Screen::Wizard,
            SessionState::Complete => Screen::Results,
        }
    }

    pub(crate) fn load_history(&mut self, mut history: Vec<Case>) {
        history.truncate(self.history_limit);
        self.history = history;
        if self.history.is_empty() {
            self.history_selected = 0;
        } else {
            self.history_selected = self.history_selected.min(self.history.len() - 1);
        }
        self.sync_history_selection();
    }

    pub(crate) fn set_focus(&mut self, focus: SelectorFocus) {
        self.focus = focus;
        self.sync_selection();
    }

    pub(crate) fn toggle_focus(&mut self) {
        let next = match self.focus {
            SelectorFocus::Categories => SelectorFocus::History,
            SelectorFocus::History => SelectorFocus::Categories,
        };
        self.set_focus(next);
    }

    pub(crate) fn select_next(&mut self) {
        match self.screen() {
            Screen::Selector => match self.focus {
                SelectorFocus::Categories => {
                    self.category_selected = (self.category_selected + 1) % Category::ALL.len();
                    self.sync_category_selection();
                }
                SelectorFocus::History => {
                    if self.history.is_empty() {
                        return;
                    }
                    self.history_selected = (self.history_selected + 1) % self.history.len();
                    self.sync_history_selection();
                }
            },
            Screen::Wizard => {
                let count = self.option_count();
                if count == 0 {
                    return;
                }
                self.option_selected = (self.option_selected + 1) % count;
                self.sync_option_selection();
            }
            Screen::Results => self.scroll_down(1),
        }
    }

    pub(crate) fn select_prev(&mut self) {
        match self.screen() {
            Screen::Selector => match self.focus {
                SelectorFocus::Categories => {
                    self.category_selected =
                        wrap_prev(self.category_selected, Category::ALL.len());
                    self.sync_category_selection();
                }
                SelectorFocus::History => {
                    if self.history.is_empty() {
                        return;
                    }
                    self.history_selected = wrap_prev(self.history_selected, self.history.len());
                    self.sync_history_selection();
                }
            },
            Screen::Wizard => {
                let count = self.option_count();
                if count == 0 {
                    return;
                }
                self.option_selected = wrap_prev(self.option_selected, count);
                self.sync_option_selection();
            }
            Screen::Results => self.scroll_up(1),
        }
    }

    pub(crate) fn selected_category(&self) -> Category {
        Category::ALL[self.category_selected % Category::ALL.len()]
    }

    pub(crate) fn selected_case(&self) -> Option<&Case> {
        self.history.get(self.history_selected)
    }

    /// Enter on the selector: start a diagnostic or open a saved case.
    pub(crate) fn activate_selection(&mut self) {
        match self.focus {
            SelectorFocus::Categories => self.start_diagnostic(self.selected_category()),
            SelectorFocus::History => {
                if let Some(case) = self.selected_case().cloned() {
                    self.open_case(case);
                }
            }
        }
    }

    pub(crate) fn start_diagnostic(&mut self, category: Category) {
        self.viewing_case = None;
        self.session.start(category);
        self.enter_step();
    }

    pub(crate) fn open_case(&mut self, case: Case) {
        self.session.resume_case(&case);
        tracing::debug!(case_id = case.id, "saved case opened");
        self.viewing_case = Some(case);
        self.reset_scroll();
    }

    /// Space on an option: select it (single) or flip it (multiple).
    pub(crate) fn choose_option(&mut self) {
        let Some(question) = self.session.current_question() else {
            return;
        };
        let Some(option) = question.options.get(self.option_selected) else {
            return;
        };
        match question.kind {
            QuestionKind::Single => self.session.answer(question.id, option.value),
            QuestionKind::Multiple => self.session.toggle_multi_value(question.id, option.value),
            QuestionKind::Text => {}
        }
    }

    pub(crate) fn next_step(&mut self) {
        self.session.advance();
        self.enter_step();
    }

    pub(crate) fn previous_step(&mut self) {
        self.session.retreat();
        self.enter_step();
    }

    /// Back to the selector, discarding answers.
    pub(crate) fn back_to_selector(&mut self) {
        self.session.abandon();
        self.viewing_case = None;
        self.option_selected = 0;
        self.reset_scroll();
        self.sync_selection();
    }

    pub(crate) fn current_analysis(&self) -> Option<Analysis> {
        match &self.viewing_case {
            Some(case) => Some(case.analysis.clone()),
            None => self.session.analysis(),
        }
    }

    pub(crate) fn current_category(&self) -> Option<Category> {
        self.session.category()
    }

    /// The case to persist for a freshly completed diagnostic. Reviewed
    /// cases are already stored.
    pub(crate) fn case_to_save(&self, created_at: DateTime<Utc>) -> Option<Case> {
        if self.viewing_case.is_some() || self.session.state() != SessionState::Complete {
            return None;
        }
        let category = self.session.category()?;
        Some(Case::new(category, self.session.answers().clone(), created_at))
    }

    pub(crate) fn current_question_answered(&self) -> bool {
        self.session
            .current_question()
            .is_some_and(|question| self.session.answers().get(question.id).is_some())
    }

    pub(crate) fn is_editing_text(&self) -> bool {
        self.session
            .current_question()
            .is_some_and(|question| question.kind == QuestionKind::Text)
    }

    pub(crate) fn push_text(&mut self, ch: char) {
        if self.is_editing_text() {
            self.session.draft_mut().push(ch);
        }
    }

    pub(crate) fn pop_text(&mut self) {
        if self.is_editing_text() {
            self.session.draft_mut().pop();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub(crate) fn set_result_metrics(&mut self, total_lines: usize, view_height: u16) {
        let total_lines = total_lines.max(1);
        self.result_total_lines = total_lines;
        self.result_view_height = view_height;
        self.result_max_scroll = total_lines.saturating_sub(view_height as usize);
        if self.result_scroll > self.result_max_scroll {
            self.result_scroll = self.result_max_scroll;
        }
    }

    pub(crate) fn scroll_down(&mut self, lines: usize) {
        self.result_scroll = (self.result_scroll + lines).min(self.result_max_scroll);
        self.pending_g = false;
    }

    pub(crate) fn scroll_up(&mut self, lines: usize) {
        self.result_scroll = self.result_scroll.saturating_sub(lines);
        self.pending_g = false;
    }

    pub(crate) fn scroll_to_top(&mut self) {
        self.result_scroll = 0;
        self.pending_g = false;
    }

    pub(crate) fn scroll_to_bottom(&mut self) {
        self.result_scroll = self.result_max_scroll;
        self.pending_g = false;
    }

    pub(crate) fn page_size(&self) -> usize {
        let height = self.result_view_height.max(1) as usize;
        height.saturating_sub(1).max(1)
    }

    pub(crate) fn half_page_size(&self) -> usize {
        let height = self.result_view_height.max(1) as usize;
        (height / 2).max(1)
    }

    fn option_count(&self) -> usize {
        self.session
            .current_question()
            .map_or(0, |question| question.options.len())
    }

    /// Puts the option cursor on the stored answer for the new step.
    fn enter_step(&mut self) {
        self.option_selected = self
            .session
            .current_question()
            .and_then(|question| {
                let chosen = self.session.answers().single(question.id)?;
                question
                    .options
                    .iter()
                    .position(|option| option.value == chosen)
            })
            .unwrap_or(0);
        self.sync_option_selection();
        if self.screen() == Screen::Results {
            self.reset_scroll();
        }
    }

    fn reset_scroll(&mut self) {
        self.result_scroll = 0;
        self.pending_g = false;
    }

    fn sync_selection(&mut self) {
        self.sync_category_selection();
        self.sync_history_selection();
        self.sync_option_selection();
    }

    fn sync_category_selection(&mut self) {
        self.category_list_state.select(Some(self.category_selected));
    }

    fn sync_history_selection(&mut self) {
        if self.history.is_empty() {
            self.history_list_state.select(None);
        } else {
            self.history_list_state.select(Some(self.history_selected));
        }
    }

    fn sync_option_selection(&mut self) {
        if self.option_count() == 0 {
            self.option_list_state.select(None);
        } else {
            self.option_list_state.select(Some(self.option_selected));
        }
    }
}

fn wrap_prev(index: usize, len: usize) -> usize {
    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use triage_core::{AnswerSet, QuestionId, Severity};

    fn saved_case(ms: i64) -> Case {
        let mut answers = AnswerSet::new();
        answers.set_single(QuestionId::ServiceStatus, "down");
        Case::new(
            Category::Ddos,
            answers,
            Utc.timestamp_millis_opt(ms).single().expect("time"),
        )
    }

    #[test]
    fn starts_on_selector_with_first_category() {
        let app = AppState::new(50);
        assert_eq!(app.screen(), Screen::Selector);
        assert_eq!(app.selected_category(), Category::Ransomware);
        assert_eq!(app.category_list_state.selected(), Some(0));
    }

    #[test]
    fn category_cursor_wraps_both_ways() {
        let mut app = AppState::new(50);
        app.select_prev();
        assert_eq!(app.selected_category(), Category::UnauthorizedAccess);
        app.select_next();
        assert_eq!(app.selected_category(), Category::Ransomware);
    }

    #[test]
    fn history_is_capped_and_selectable() {
        let mut app = AppState::new(2);
        app.load_history(vec![saved_case(3), saved_case(2), saved_case(1)]);
        assert_eq!(app.history.len(), 2);
        app.toggle_focus();
        app.select_next();
        assert_eq!(app.selected_case().map(|case| case.id), Some(2));
        app.activate_selection();
        assert_eq!(app.screen(), Screen::Results);
        assert!(app.case_to_save(Utc::now()).is_none());
    }

    #[test]
    fn wizard_walkthrough_reaches_results() {
        let mut app = AppState::new(50);
        app.start_diagnostic(Category::Ransomware);
        assert_eq!(app.screen(), Screen::Wizard);

        // encryption_scope: pick the fourth option (entire network)
        for _ in 0..3 {
            app.select_next();
        }
        app.choose_option();
        app.next_step();
        assert_eq!(app.session.current_step(), Some(1));

        app.previous_step();
        assert_eq!(app.option_selected, 3);

        while app.screen() == Screen::Wizard {
            app.next_step();
        }
        let analysis = app.current_analysis().expect("analysis");
        assert_eq!(analysis.severity, Severity::Critical);
        let case = app.case_to_save(Utc::now()).expect("case");
        assert_eq!(case.category, Category::Ransomware);
    }

    #[test]
    fn text_questions_capture_typed_characters() {
        let mut app = AppState::new(50);
        app.start_diagnostic(Category::Ransomware);
        while !app.is_editing_text() {
            app.next_step();
        }
        for ch in "nota!".chars() {
            app.push_text(ch);
        }
        app.pop_text();
        app.next_step();
        assert_eq!(
            app.session.answers().text(QuestionId::AdditionalInfo),
            Some("nota")
        );
    }

    #[test]
    fn multiple_choice_toggles_selected_option() {
        let mut app = AppState::new(50);
        app.start_diagnostic(Category::DataBreach);
        app.choose_option();
        app.select_next();
        app.choose_option();
        app.select_prev();
        app.choose_option();
        assert_eq!(
            app.session.answers().multiple(QuestionId::DataType),
            ["financial".to_string()]
        );
    }

    #[test]
    fn back_to_selector_discards_answers() {
        let mut app = AppState::new(50);
        app.start_diagnostic(Category::Phishing);
        app.choose_option();
        app.back_to_selector();
        assert_eq!(app.screen(), Screen::Selector);
        assert!(app.session.answers().is_empty());
    }

    #[test]
    fn result_scroll_is_clamped_to_content() {
        let mut app = AppState::new(50);
        app.set_result_metrics(30, 10);
        app.scroll_down(100);
        assert_eq!(app.result_scroll, 20);
        app.set_result_metrics(12, 10);
        assert_eq!(app.result_scroll, 2);
        app.scroll_up(5);
        assert_eq!(app.result_scroll, 0);
    }
}
