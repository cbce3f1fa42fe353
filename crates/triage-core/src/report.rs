//! Report rendering: a structured breakdown for interactive views and a
//! fixed plain-text template for export.

use crate::analysis::{Analysis, Section};
use crate::Severity;
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};

pub fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "CRÍTICO",
        Severity::High => "ALTO",
        Severity::Medium => "MEDIO",
        Severity::Low => "BAJO",
    }
}

pub fn attention_sentence(severity: Severity) -> String {
    let need = match severity {
        Severity::Critical => "atención inmediata",
        Severity::High => "acción urgente",
        Severity::Medium | Severity::Low => "atención",
    };
    format!("Este incidente requiere {need} del equipo de seguridad.")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Paragraph(String),
    Badge {
        severity: Severity,
        label: &'static str,
        note: String,
    },
    Items(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: &'static str,
    pub body: SectionBody,
}

const LIST_SECTIONS: [(Section, &str); 5] = [
    (Section::Immediate, "Acciones Inmediatas"),
    (Section::Containment, "Plan de Contención"),
    (Section::Recovery, "Pasos de Recuperación"),
    (Section::LongTerm, "Recomendaciones a Largo Plazo"),
    (Section::Resources, "Recursos Adicionales"),
];

/// Situation, severity, then the five list sections in export order.
pub fn sections(analysis: &Analysis) -> Vec<ReportSection> {
    let mut out = Vec::with_capacity(2 + LIST_SECTIONS.len());
    out.push(ReportSection {
        title: "Análisis de Situación",
        body: SectionBody::Paragraph(analysis.situation.clone()),
    });
    out.push(ReportSection {
        title: "Nivel de Severidad",
        body: SectionBody::Badge {
            severity: analysis.severity,
            label: severity_label(analysis.severity),
            note: attention_sentence(analysis.severity),
        },
    });
    for (section, title) in LIST_SECTIONS {
        out.push(ReportSection {
            title,
            body: SectionBody::Items(analysis.section(section).to_vec()),
        });
    }
    out
}

/// Spanish locale short form, e.g. `5/3/2026, 9:04:05`.
pub fn format_report_date<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%-d/%-m/%Y, %-H:%M:%S").to_string()
}

pub fn report_file_name(timestamp_ms: i64) -> String {
    format!("incident-report-{timestamp_ms}.txt")
}

pub fn render_text_report(analysis: &Analysis, category_name: &str, generated_at: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "REPORTE DE RESPUESTA A INCIDENTE");
    let _ = writeln!(out, "=================================");
    let _ = writeln!(out, "Fecha: {generated_at}");
    let _ = writeln!(out, "Tipo de Incidente: {category_name}");
    let _ = writeln!(out);
    push_heading(&mut out, "ANÁLISIS DE SITUACIÓN", "---------------------");
    let _ = writeln!(out, "{}", analysis.situation);
    let _ = writeln!(out);
    let _ = writeln!(out, "NIVEL DE SEVERIDAD: {}", analysis.severity.code());
    let _ = writeln!(out);
    push_heading(&mut out, "ACCIONES INMEDIATAS", "-------------------");
    push_numbered(&mut out, &analysis.immediate_actions);
    push_heading(&mut out, "PLAN DE CONTENCIÓN", "------------------");
    push_numbered(&mut out, &analysis.containment);
    push_heading(&mut out, "PASOS DE RECUPERACIÓN", "---------------------");
    push_numbered(&mut out, &analysis.recovery);
    push_heading(&mut out, "RECOMENDACIONES A LARGO PLAZO", "------------------------------");
    push_numbered(&mut out, &analysis.long_term);
    push_heading(&mut out, "RECURSOS ADICIONALES", "--------------------");
    for resource in &analysis.resources {
        let _ = writeln!(out, "{resource}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "---");
    let _ = writeln!(out, "Generado por WebIncidentResponse");
    out.trim().to_string()
}

fn push_heading(out: &mut String, title: &str, rule: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{rule}");
}

/// Section bodies from the engine are never empty. An empty list would leave
/// only the trailing blank line under its heading.
fn push_numbered(out: &mut String, items: &[String]) {
    for (idx, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", idx + 1, item);
    }
    let _ = writeln!(out);
}
