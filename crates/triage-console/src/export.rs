use anyhow::Context;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use triage_core::report::{format_report_date, render_text_report, report_file_name};
use triage_core::Analysis;

/// Writes `incident-report-<ms>.txt` under `dir` and returns its path.
pub(crate) fn write_report(
    dir: &Path,
    analysis: &Analysis,
    category_name: &str,
    generated_at: DateTime<Local>,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export dir {}", dir.display()))?;
    let body = render_text_report(analysis, category_name, &format_report_date(&generated_at));
    let path = dir.join(report_file_name(generated_at.timestamp_millis()));
    std::fs::write(&path, body)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    tracing::info!(path = %path.display(), severity = %analysis.severity, "report exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use triage_core::{analyze, AnswerSet, Category};

    #[test]
    fn report_lands_in_export_dir_with_timestamp_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let export_dir = dir.path().join("reports");
        let analysis = analyze(Category::Malware, &AnswerSet::new());
        let generated_at = Local
            .timestamp_millis_opt(1_700_000_000_123)
            .single()
            .expect("time");

        let path = write_report(&export_dir, &analysis, "Malware", generated_at).expect("export");

        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("incident-report-1700000000123.txt")
        );
        let body = std::fs::read_to_string(&path).expect("read");
        assert!(body.starts_with("REPORTE DE RESPUESTA A INCIDENTE"));
        assert!(body.contains("Tipo de Incidente: Malware"));
        assert!(body.ends_with("Generado por WebIncidentResponse"));
    }
}
