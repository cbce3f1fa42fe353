use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{AppState, Screen, UiCommand};

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut AppState) -> Option<UiCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    app.notice = None;

    if app.confirm_quit {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Some(UiCommand::Quit),
            KeyCode::Esc => {
                app.confirm_quit = false;
                return None;
            }
            _ => app.confirm_quit = false,
        }
    }

    match app.screen() {
        Screen::Selector => handle_selector_key(key, app),
        Screen::Wizard if app.is_editing_text() => handle_text_key(key, app),
        Screen::Wizard => handle_wizard_key(key, app),
        Screen::Results => handle_results_key(key, app),
    }
}

fn handle_selector_key(key: KeyEvent, app: &mut AppState) -> Option<UiCommand> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.confirm_quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_selection(),
        _ => {}
    }
    None
}

fn handle_wizard_key(key: KeyEvent, app: &mut AppState) -> Option<UiCommand> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.confirm_quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Char(' ') => app.choose_option(),
        KeyCode::Enter => {
            if !app.current_question_answered() {
                app.choose_option();
            }
            app.next_step();
        }
        KeyCode::Right | KeyCode::Char('n') => app.next_step(),
        KeyCode::Left | KeyCode::Char('p') => app.previous_step(),
        KeyCode::Esc => app.back_to_selector(),
        _ => {}
    }
    None
}

/// Free-text questions own the printable keys; navigation moves to
/// Enter, Shift+Tab and Esc.
fn handle_text_key(key: KeyEvent, app: &mut AppState) -> Option<UiCommand> {
    match key.code {
        KeyCode::Enter => app.next_step(),
        KeyCode::BackTab => app.previous_step(),
        KeyCode::Esc => app.back_to_selector(),
        KeyCode::Backspace => app.pop_text(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.push_text(ch),
        _ => {}
    }
    None
}

fn handle_results_key(key: KeyEvent, app: &mut AppState) -> Option<UiCommand> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.confirm_quit = true,
        KeyCode::Char('s') | KeyCode::Char('S') => return Some(UiCommand::SaveCase),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_down(app.half_page_size());
        }
        KeyCode::Char('d') | KeyCode::Char('D') => return Some(UiCommand::DownloadReport),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Esc => app.back_to_selector(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(app.page_size()),
        KeyCode::PageUp => app.scroll_up(app.page_size()),
        KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_down(app.page_size());
        }
        KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_up(app.page_size());
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_up(app.half_page_size());
        }
        KeyCode::Char('g') => {
            if app.pending_g {
                app.scroll_to_top();
            } else {
                app.pending_g = true;
            }
        }
        KeyCode::Char('G') => app.scroll_to_bottom(),
        _ => app.pending_g = false,
    }
    None
}
