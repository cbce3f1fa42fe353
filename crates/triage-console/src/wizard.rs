use chrono::{Local, Utc};
use crossterm::event::{self, Event};
use std::time::Duration;

use crate::commands::{CommandEnv, CASE_SAVED, REPORT_SAVED};
use crate::export::write_report;
use crate::ui::terminal::Tui;
use crate::ui::{draw_ui, handle_key_event, restore_terminal, setup_terminal, AppState, UiCommand};

pub(crate) fn run_wizard(env: &CommandEnv, history_limit: usize) -> anyhow::Result<()> {
    let mut app = AppState::new(history_limit);
    app.load_history(env.stores.cases.load_all());

    let mut terminal = setup_terminal()?;
    let outcome = event_loop(&mut terminal, &mut app, env);
    restore_terminal(&mut terminal)?;
    outcome
}

fn event_loop(terminal: &mut Tui, app: &mut AppState, env: &CommandEnv) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(100);
    loop {
        terminal.draw(|frame| draw_ui(frame, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match handle_key_event(key, app) {
                    Some(UiCommand::Quit) => return Ok(()),
                    Some(command) => perform(command, app, env),
                    None => {}
                }
            }
        }
    }
}

/// Runs a side effect and reports the outcome in the footer. Failures are
/// logged and shown, never fatal to the session.
fn perform(command: UiCommand, app: &mut AppState, env: &CommandEnv) {
    let result = match command {
        UiCommand::Quit => return,
        UiCommand::SaveCase => save_case(app, env),
        UiCommand::DownloadReport => download_report(app, env),
    };
    match result {
        Ok(notice) => app.set_notice(notice),
        Err(err) => {
            tracing::error!(error = %err, ?command, "wizard action failed");
            app.set_notice(format!("error: {err:#}"));
        }
    }
}

fn save_case(app: &mut AppState, env: &CommandEnv) -> anyhow::Result<String> {
    let Some(case) = app.case_to_save(Utc::now()) else {
        return Ok("El caso ya está guardado".to_string());
    };
    let category = case.category;
    let cases = env.stores.cases.append(case)?;
    tracing::info!(case_id = cases[0].id, category = %category, "case saved");
    app.load_history(cases);
    Ok(CASE_SAVED.to_string())
}

fn download_report(app: &AppState, env: &CommandEnv) -> anyhow::Result<String> {
    let (Some(analysis), Some(category)) = (app.current_analysis(), app.current_category()) else {
        anyhow::bail!("no completed diagnostic to export");
    };
    let category_name = app
        .viewing_case
        .as_ref()
        .map_or(category.display_name(), |case| case.type_name.as_str());
    write_report(&env.export_dir, &analysis, category_name, Local::now())?;
    Ok(REPORT_SAVED.to_string())
}
