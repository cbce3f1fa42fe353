use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Clear, Gauge, List, ListItem, Paragraph, Wrap};
use triage_core::{Category, QuestionKind};

use super::app::{AppState, Screen, SelectorFocus};
use super::format::{case_date, case_severity, kv_lines, option_marker, report_lines};
use super::text::{display_width, pad_right, truncate_with_ellipsis};
use super::theme::{Theme, ValueStyle};
use crate::commands::EMPTY_CASES;

const APP_TITLE: &str = "Asistente de Respuesta a Incidentes";

pub(crate) fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let theme = Theme::dark();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, &theme, app, chunks[0]);
    match app.screen() {
        Screen::Selector => draw_selector(frame, &theme, app, chunks[1]),
        Screen::Wizard => draw_wizard(frame, &theme, app, chunks[1]),
        Screen::Results => draw_results(frame, &theme, app, chunks[1]),
    }
    draw_footer(frame, &theme, app, chunks[2]);
}

fn draw_header(frame: &mut ratatui::Frame, theme: &Theme, app: &AppState, area: Rect) {
    let mut spans = vec![Span::styled(APP_TITLE, theme.accent_style())];
    if let Some(category) = app.current_category() {
        spans.push(Span::styled("  Tipo: ", theme.help_style()));
        spans.push(Span::styled(
            category.display_name(),
            theme.value_style(ValueStyle::Important),
        ));
    }
    if let Some(case) = &app.viewing_case {
        spans.push(Span::styled("  Caso: ", theme.help_style()));
        spans.push(Span::styled(
            case_date(case),
            theme.value_style(ValueStyle::Normal),
        ));
    }
    let header = Paragraph::new(Line::from(spans))
        .block(theme.block("Triage"))
        .style(theme.value_style(ValueStyle::Normal));
    frame.render_widget(header, area);
}

fn draw_selector(frame: &mut ratatui::Frame, theme: &Theme, app: &mut AppState, area: Rect) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let categories_focused = app.focus == SelectorFocus::Categories;
    let category_title = if categories_focused {
        "Tipo de incidente *"
    } else {
        "Tipo de incidente"
    };
    let category_items = Category::ALL
        .iter()
        .map(|category| ListItem::new(Line::from(category.display_name())))
        .collect::<Vec<_>>();
    let category_list = List::new(category_items)
        .block(theme.block(category_title))
        .style(theme.value_style(ValueStyle::Normal))
        .highlight_style(if categories_focused {
            theme.highlight_style()
        } else {
            theme.value_style(ValueStyle::Dim)
        })
        .highlight_symbol(if categories_focused { ">> " } else { "   " });
    frame.render_stateful_widget(category_list, body[0], &mut app.category_list_state);

    let history_title = if categories_focused {
        "Casos guardados"
    } else {
        "Casos guardados *"
    };
    let history_block = theme.block(history_title);
    let history_items = if app.history.is_empty() {
        vec![ListItem::new(Line::styled(
            EMPTY_CASES,
            theme.value_style(ValueStyle::Dim),
        ))]
    } else {
        let inner = history_block.inner(body[1]);
        let available = inner.width.saturating_sub(3) as usize;
        app.history
            .iter()
            .map(|case| {
                let date = case_date(case);
                let severity = case_severity(case);
                let tail = format!("{severity}  {date}");
                let tail_width = display_width(&tail);
                if available <= tail_width + 2 {
                    return ListItem::new(Line::styled(tail, theme.value_style(ValueStyle::Dim)));
                }
                let name_width = available - tail_width;
                let name = truncate_with_ellipsis(&case.type_name, name_width.saturating_sub(2));
                ListItem::new(Line::from(vec![
                    Span::styled(
                        pad_right(&name, name_width),
                        theme.value_style(ValueStyle::Normal),
                    ),
                    Span::styled(
                        severity.to_string(),
                        theme.severity_style(case.analysis.severity),
                    ),
                    Span::styled(format!("  {date}"), theme.value_style(ValueStyle::Dim)),
                ]))
            })
            .collect::<Vec<_>>()
    };
    let history_list = List::new(history_items)
        .block(history_block)
        .style(theme.value_style(ValueStyle::Normal))
        .highlight_style(if categories_focused {
            theme.value_style(ValueStyle::Dim)
        } else {
            theme.highlight_style()
        })
        .highlight_symbol(if categories_focused { "   " } else { ">> " });
    frame.render_stateful_widget(history_list, body[1], &mut app.history_list_state);
}

fn draw_wizard(frame: &mut ratatui::Frame, theme: &Theme, app: &mut AppState, area: Rect) {
    let Some(question) = app.session.current_question() else {
        return;
    };
    let (current, total) = app.session.progress();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    let gauge = Gauge::default()
        .block(theme.block("Progreso"))
        .gauge_style(theme.gauge_style())
        .percent(app.session.progress_percent().min(100))
        .label(format!("Pregunta {current} de {total}"));
    frame.render_widget(gauge, chunks[0]);

    let title_block = theme.block("Pregunta");
    let mut lines = vec![Line::styled(
        question.title,
        theme.value_style(ValueStyle::Important),
    )];
    if let Some(description) = question.description {
        lines.push(Line::styled(description, theme.value_style(ValueStyle::Dim)));
    }
    let title = Paragraph::new(Text::from(lines))
        .block(title_block)
        .wrap(Wrap { trim: true });
    frame.render_widget(Clear, chunks[1]);
    frame.render_widget(title, chunks[1]);

    if question.kind == QuestionKind::Text {
        let draft = app.session.draft();
        let body = if draft.is_empty() {
            Paragraph::new(Line::styled(
                question.placeholder.unwrap_or_default(),
                theme.value_style(ValueStyle::Dim),
            ))
        } else {
            Paragraph::new(format!("{draft}_"))
        };
        let body = body
            .block(theme.block("Respuesta"))
            .style(theme.value_style(ValueStyle::Normal))
            .wrap(Wrap { trim: false });
        frame.render_widget(body, chunks[2]);
        return;
    }

    let answers = app.session.answers();
    let items = question
        .options
        .iter()
        .map(|option| {
            let selected = answers.is_selected(question.id, option.value);
            let style = if selected {
                theme.value_style(ValueStyle::Important)
            } else {
                theme.value_style(ValueStyle::Normal)
            };
            ListItem::new(Line::from(vec![
                Span::styled(option_marker(question.kind, selected), theme.accent_style()),
                Span::styled(option.label, style),
            ]))
        })
        .collect::<Vec<_>>();
    let options_title = match question.kind {
        QuestionKind::Multiple => "Opciones (varias)",
        _ => "Opciones",
    };
    let list = List::new(items)
        .block(theme.block(options_title))
        .highlight_style(theme.highlight_style())
        .highlight_symbol(">> ");
    frame.render_stateful_widget(list, chunks[2], &mut app.option_list_state);
}

fn draw_results(frame: &mut ratatui::Frame, theme: &Theme, app: &mut AppState, area: Rect) {
    let Some(analysis) = app.current_analysis() else {
        return;
    };
    let block = theme.block("Plan de Respuesta");
    let inner = block.inner(area);
    let mut lines = Vec::new();
    if let Some(case) = &app.viewing_case {
        lines.extend(kv_lines(
            theme,
            "Guardado",
            case_date(case),
            ValueStyle::Dim,
            inner.width,
        ));
        lines.push(Line::default());
    }
    lines.extend(report_lines(theme, &analysis, inner.width));
    app.set_result_metrics(lines.len(), inner.height);

    let panel = Paragraph::new(Text::from(lines))
        .block(block)
        .style(theme.value_style(ValueStyle::Normal))
        .scroll((app.result_scroll as u16, 0));
    frame.render_widget(Clear, area);
    frame.render_widget(panel, area);
}

fn draw_footer(frame: &mut ratatui::Frame, theme: &Theme, app: &AppState, area: Rect) {
    let help = match app.screen() {
        Screen::Selector => "↑/↓=select  Tab=focus  Enter=open  Q=quit  ".to_string(),
        Screen::Wizard => wizard_help(app),
        Screen::Results => "j/k=scroll  S=save  D=download  R=restart  Q=quit  ".to_string(),
    };
    let mut spans = vec![Span::styled(help, theme.help_style())];
    if app.confirm_quit {
        spans.push(Span::styled(
            "press Q again to quit / Esc to cancel  ",
            theme.warn_style(),
        ));
    }
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(notice.clone(), theme.notice_style()));
    } else if app.screen() == Screen::Results {
        spans.push(Span::styled(
            format!(
                "line {}/{}",
                app.result_scroll.saturating_add(1),
                app.result_total_lines
            ),
            theme.accent_style(),
        ));
    }
    let footer = Paragraph::new(Line::from(spans)).block(theme.block("Controls"));
    frame.render_widget(footer, area);
}

fn wizard_help(app: &AppState) -> String {
    let next = if app.session.is_last_step() {
        "Ver Resultados"
    } else {
        "Siguiente"
    };
    let mut help = if app.is_editing_text() {
        format!("type to edit  Enter={next}  ")
    } else {
        format!("↑/↓=move  Space=choose  Enter/n={next}  ")
    };
    if !app.session.previous_disabled() {
        help.push_str(if app.is_editing_text() {
            "Shift+Tab=Anterior  "
        } else {
            "p=Anterior  "
        });
    }
    help.push_str("Esc=abandon  ");
    help
}
