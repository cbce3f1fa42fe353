use chrono::Local;
use ratatui::text::{Line, Span};
use triage_core::report::{format_report_date, sections, SectionBody};
use triage_core::{Analysis, Case, QuestionKind};

use super::text::{display_width, wrap_text_lines};
use super::theme::{Theme, ValueStyle};

/// The sectioned report, pre-wrapped to `width` so scrolling counts real rows.
pub(super) fn report_lines(theme: &Theme, analysis: &Analysis, width: u16) -> Vec<Line<'static>> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();
    for (index, section) in sections(analysis).into_iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::styled(section.title, theme.heading_style()));
        match section.body {
            SectionBody::Paragraph(text) => {
                for row in wrap_text_lines(&text, width) {
                    lines.push(Line::styled(row, theme.value_style(ValueStyle::Normal)));
                }
            }
            SectionBody::Badge {
                severity,
                label,
                note,
            } => {
                lines.push(Line::styled(
                    format!("[ {label} ]"),
                    theme.severity_style(severity),
                ));
                for row in wrap_text_lines(&note, width) {
                    lines.push(Line::styled(row, theme.value_style(ValueStyle::Dim)));
                }
            }
            SectionBody::Items(items) => {
                for (number, item) in items.iter().enumerate() {
                    lines.extend(numbered_lines(theme, number + 1, item, width));
                }
            }
        }
    }
    lines
}

fn numbered_lines(theme: &Theme, number: usize, item: &str, width: usize) -> Vec<Line<'static>> {
    let marker = format!("{number}. ");
    let marker_width = display_width(&marker);
    let indent = " ".repeat(marker_width);
    let wrapped = wrap_text_lines(item, width.saturating_sub(marker_width).max(1));
    wrapped
        .into_iter()
        .enumerate()
        .map(|(idx, segment)| {
            let prefix = if idx == 0 { marker.clone() } else { indent.clone() };
            Line::from(vec![
                Span::styled(prefix, theme.accent_style()),
                Span::styled(segment, theme.value_style(ValueStyle::Normal)),
            ])
        })
        .collect()
}

pub(super) fn kv_lines(
    theme: &Theme,
    key: &str,
    value: String,
    level: ValueStyle,
    width: u16,
) -> Vec<Line<'static>> {
    let key_label = format!("{key}: ");
    let key_width = display_width(&key_label);
    let value_width = (width.max(1) as usize).saturating_sub(key_width).max(1);
    let indent = " ".repeat(key_width);
    wrap_text_lines(&value, value_width)
        .into_iter()
        .enumerate()
        .map(|(idx, segment)| {
            let prefix = if idx == 0 {
                key_label.clone()
            } else {
                indent.clone()
            };
            Line::from(vec![
                Span::styled(prefix, theme.help_style()),
                Span::styled(segment, theme.value_style(level)),
            ])
        })
        .collect()
}

pub(super) fn case_date(case: &Case) -> String {
    format_report_date(&case.date.with_timezone(&Local))
}

/// Saved-case rows carry the severity code, as `cases list` does.
pub(super) fn case_severity(case: &Case) -> &'static str {
    case.analysis.severity.code()
}

pub(super) fn option_marker(kind: QuestionKind, selected: bool) -> &'static str {
    match (kind, selected) {
        (QuestionKind::Multiple, true) => "[x] ",
        (QuestionKind::Multiple, false) => "[ ] ",
        (_, true) => "(*) ",
        (_, false) => "( ) ",
    }
}
