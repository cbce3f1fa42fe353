//! Headless subcommands. Everything prints to the supplied writer.

use anyhow::{bail, Context};
use chrono::{Local, Utc};
use std::io::Write;
use std::path::PathBuf;
use triage_core::catalog::{find_question, questions_for};
use triage_core::report::{format_report_date, render_text_report, severity_label};
use triage_core::{
    count_by_severity, Analysis, Case, Category, Incident, IncidentDraft, IncidentStatus,
    QuestionId, QuestionKind, Session, SessionState, Severity,
};

use crate::cli::{AnalyzeArgs, CasesCommand, Command, IncidentAddArgs, IncidentCommand};
use crate::export::write_report;
use crate::store::Stores;

pub(crate) const EMPTY_CASES: &str = "No hay casos guardados";
pub(crate) const CASE_SAVED: &str = "Caso guardado correctamente";
pub(crate) const REPORT_SAVED: &str = "Reporte descargado correctamente";

pub(crate) struct CommandEnv {
    pub(crate) stores: Stores,
    pub(crate) export_dir: PathBuf,
}

pub(crate) fn run_command<W: Write>(
    command: Command,
    env: &CommandEnv,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Wizard => bail!("the wizard needs an interactive terminal"),
        Command::Questions { category } => print_questions(parse_category(&category)?, out),
        Command::Analyze(args) => analyze(args, env, out),
        Command::Cases(cases) => match cases {
            CasesCommand::List => list_cases(env, out),
            CasesCommand::Show { id } => show_case(id, env, out),
            CasesCommand::Export { id } => export_case(id, env, out),
        },
        Command::Incident(incident) => match incident {
            IncidentCommand::Add(args) => add_incident(args, env, out),
            IncidentCommand::List => list_incidents(env, out),
            IncidentCommand::Delete { id } => delete_incident(id, env, out),
        },
        Command::Dashboard { status } => {
            let status = parse_status(&status)?;
            print_dashboard(&env.stores.incidents.load_all(), status, out)
        }
    }
}

fn parse_category(raw: &str) -> anyhow::Result<Category> {
    Ok(raw.parse::<Category>()?)
}

fn parse_status(raw: &str) -> anyhow::Result<IncidentStatus> {
    Ok(raw.parse::<IncidentStatus>()?)
}

fn print_questions<W: Write>(category: Category, out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "{} ({})", category.display_name(), category.tag())?;
    for (index, question) in questions_for(category).iter().enumerate() {
        let kind = match question.kind {
            QuestionKind::Single => "single",
            QuestionKind::Multiple => "multiple",
            QuestionKind::Text => "text",
        };
        writeln!(out)?;
        writeln!(out, "{}. [{}] {} ({kind})", index + 1, question.id, question.title)?;
        if let Some(description) = question.description {
            writeln!(out, "   {description}")?;
        }
        for option in question.options {
            writeln!(out, "   - {}: {}", option.value, option.label)?;
        }
    }
    Ok(())
}

/// Drives a [`Session`] to completion from `id=value` pairs.
pub(crate) fn session_from_answers(
    category: Category,
    raw_answers: &[String],
) -> anyhow::Result<Session> {
    let mut session = Session::new();
    session.start(category);
    for raw in raw_answers {
        let (id, value) = raw
            .split_once('=')
            .with_context(|| format!("answer `{raw}` is not in id=value form"))?;
        let id: QuestionId = id.parse()?;
        let Some(question) = find_question(category, id) else {
            bail!("question {id} is not asked for {}", category.tag());
        };
        match question.kind {
            QuestionKind::Text => session.answer(id, value.trim()),
            QuestionKind::Single => {
                let value = value.trim();
                if question.option(value).is_none() {
                    bail!("{value} is not an option of {id}");
                }
                session.answer(id, value);
            }
            QuestionKind::Multiple => {
                for value in value.split(',').map(str::trim).filter(|v| !v.is_empty()) {
                    if question.option(value).is_none() {
                        bail!("{value} is not an option of {id}");
                    }
                    if !session.answers().is_selected(id, value) {
                        session.toggle_multi_value(id, value);
                    }
                }
            }
        }
    }
    while matches!(session.state(), SessionState::InProgress { .. }) {
        session.advance();
    }
    Ok(session)
}

fn analyze<W: Write>(args: AnalyzeArgs, env: &CommandEnv, out: &mut W) -> anyhow::Result<()> {
    let category = parse_category(&args.category)?;
    let session = session_from_answers(category, &args.answers)?;
    let Some(analysis) = session.analysis() else {
        bail!("diagnostic for {} did not complete", category.tag());
    };
    print_report(&analysis, category.display_name(), Local::now(), out)?;

    if args.save {
        let case = Case::new(category, session.answers().clone(), Utc::now());
        let cases = env.stores.cases.append(case)?;
        let id = cases[0].id;
        tracing::info!(case_id = id, category = %category, "case saved");
        writeln!(out, "\n{CASE_SAVED} ({id})")?;
    }
    if args.export {
        let path = write_report(&env.export_dir, &analysis, category.display_name(), Local::now())?;
        writeln!(out, "\n{REPORT_SAVED}: {}", path.display())?;
    }
    Ok(())
}

fn print_report<W: Write>(
    analysis: &Analysis,
    category_name: &str,
    generated_at: chrono::DateTime<Local>,
    out: &mut W,
) -> anyhow::Result<()> {
    let report = render_text_report(analysis, category_name, &format_report_date(&generated_at));
    writeln!(out, "{report}")?;
    Ok(())
}

fn list_cases<W: Write>(env: &CommandEnv, out: &mut W) -> anyhow::Result<()> {
    let cases = env.stores.cases.load_all();
    if cases.is_empty() {
        writeln!(out, "{EMPTY_CASES}")?;
        return Ok(());
    }
    for case in &cases {
        writeln!(
            out,
            "{}  {}  {:<22} {}",
            case.id,
            format_report_date(&case.date.with_timezone(&Local)),
            case.type_name,
            case.analysis.severity.code()
        )?;
    }
    Ok(())
}

fn find_case(id: i64, env: &CommandEnv) -> anyhow::Result<Case> {
    env.stores
        .cases
        .find_by_id(id)
        .with_context(|| format!("no saved case with id {id}"))
}

fn show_case<W: Write>(id: i64, env: &CommandEnv, out: &mut W) -> anyhow::Result<()> {
    let case = find_case(id, env)?;
    print_report(
        &case.analysis,
        &case.type_name,
        case.date.with_timezone(&Local),
        out,
    )
}

fn export_case<W: Write>(id: i64, env: &CommandEnv, out: &mut W) -> anyhow::Result<()> {
    let case = find_case(id, env)?;
    let path = write_report(&env.export_dir, &case.analysis, &case.type_name, Local::now())?;
    writeln!(out, "{REPORT_SAVED}: {}", path.display())?;
    Ok(())
}

fn add_incident<W: Write>(
    args: IncidentAddArgs,
    env: &CommandEnv,
    out: &mut W,
) -> anyhow::Result<()> {
    if args.title.trim().is_empty() {
        bail!("--title must not be empty");
    }
    let draft = IncidentDraft {
        title: args.title,
        description: args.description,
        severity: args.severity.parse::<Severity>()?,
        kind: args.kind,
        source: args.source,
        status: parse_status(&args.status)?,
    };
    let incident = Incident::from_draft(draft, Utc::now());
    let incidents = env.stores.incidents.append(incident)?;
    let id = incidents[0].id;
    tracing::info!(incident_id = id, "incident recorded");
    writeln!(out, "incident {id} recorded")?;
    print_dashboard(&incidents, IncidentStatus::Open, out)
}

fn list_incidents<W: Write>(env: &CommandEnv, out: &mut W) -> anyhow::Result<()> {
    let incidents = env.stores.incidents.load_all();
    if incidents.is_empty() {
        writeln!(out, "no incidents recorded")?;
        return Ok(());
    }
    for incident in &incidents {
        writeln!(
            out,
            "{}  {:<8} {:<13} {}",
            incident.id,
            incident.severity.code(),
            incident.status,
            incident.title
        )?;
        let meta = [incident.kind.as_str(), incident.source.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" / ");
        if !meta.is_empty() {
            writeln!(out, "    {meta}")?;
        }
        if !incident.description.is_empty() {
            writeln!(out, "    {}", incident.description)?;
        }
    }
    Ok(())
}

fn delete_incident<W: Write>(id: i64, env: &CommandEnv, out: &mut W) -> anyhow::Result<()> {
    let (incidents, removed) = env.stores.incidents.remove_by_id(id)?;
    if !removed {
        bail!("no incident with id {id}");
    }
    tracing::info!(incident_id = id, "incident deleted");
    writeln!(out, "incident {id} deleted")?;
    print_dashboard(&incidents, IncidentStatus::Open, out)
}

fn print_dashboard<W: Write>(
    incidents: &[Incident],
    status: IncidentStatus,
    out: &mut W,
) -> anyhow::Result<()> {
    let counts = count_by_severity(incidents, status);
    writeln!(out, "{status} incidents: {}", counts.total())?;
    for severity in Severity::ALL {
        writeln!(out, "  {:<8} {}", severity_label(severity), counts.get(severity))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Stores;

    fn env(dir: &tempfile::TempDir) -> CommandEnv {
        CommandEnv {
            stores: Stores::open(&dir.path().join("data")),
            export_dir: dir.path().join("reports"),
        }
    }

    fn run(command: Command, env: &CommandEnv) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run_command(command, env, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    fn answers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|item| item.to_string()).collect()
    }

    fn add(title: &str, severity: &str, status: &str) -> Command {
        Command::Incident(IncidentCommand::Add(IncidentAddArgs {
            title: title.to_string(),
            description: String::new(),
            severity: severity.to_string(),
            kind: "phishing".to_string(),
            source: "mail gateway".to_string(),
            status: status.to_string(),
        }))
    }

    #[test]
    fn session_from_answers_completes_and_keeps_values() {
        let session = session_from_answers(
            Category::Ransomware,
            &answers(&[
                "encryption_scope=entire_network",
                "has_backups=no",
                "additional_info=  servidor de nóminas ",
            ]),
        )
        .expect("session");
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(
            session.answers().text(QuestionId::AdditionalInfo),
            Some("servidor de nóminas")
        );
        let analysis = session.analysis().expect("analysis");
        assert_eq!(analysis.severity, Severity::Critical);
    }

    #[test]
    fn multiple_choice_values_accumulate_without_toggling_off() {
        let session = session_from_answers(
            Category::DataBreach,
            &answers(&["data_type=pii,health", "data_type=pii"]),
        )
        .expect("session");
        assert_eq!(
            session.answers().multiple(QuestionId::DataType),
            ["pii".to_string(), "health".to_string()]
        );
        assert_eq!(
            session.analysis().expect("analysis").severity,
            Severity::Critical
        );
    }

    #[test]
    fn answers_outside_the_category_are_rejected() {
        let err = session_from_answers(Category::Phishing, &answers(&["has_backups=no"]))
            .err()
            .expect("expected error");
        assert!(err.to_string().contains("has_backups"));

        assert!(session_from_answers(Category::Phishing, &answers(&["clicked_link"])).is_err());
        assert!(session_from_answers(Category::Phishing, &answers(&["clicked_link=maybe"])).is_err());
    }

    #[test]
    fn analyze_prints_report_and_saves_case() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env = env(&dir);
        let output = run(
            Command::Analyze(AnalyzeArgs {
                category: "malware".to_string(),
                answers: Vec::new(),
                save: true,
                export: true,
            }),
            &env,
        )
        .expect("analyze");

        assert!(output.contains("Tipo de Incidente: Malware"));
        assert!(output.contains(CASE_SAVED));
        assert!(output.contains(REPORT_SAVED));
        assert_eq!(env.stores.cases.load_all().len(), 1);
        let exported = std::fs::read_dir(&env.export_dir).expect("export dir").count();
        assert_eq!(exported, 1);
    }

    #[test]
    fn case_list_shows_severity_code() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env = env(&dir);
        run(
            Command::Analyze(AnalyzeArgs {
                category: "unauthorized-access".to_string(),
                answers: Vec::new(),
                save: true,
                export: false,
            }),
            &env,
        )
        .expect("analyze");

        let output = run(Command::Cases(CasesCommand::List), &env).expect("list");
        let row = output.lines().next().expect("one row");
        assert!(row.ends_with(" CRITICAL"), "{row}");
        assert!(!row.contains("CRÍTICO"), "{row}");
    }

    #[test]
    fn empty_case_history_prints_placeholder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = run(Command::Cases(CasesCommand::List), &env(&dir)).expect("list");
        assert_eq!(output.trim(), EMPTY_CASES);
        assert!(run(Command::Cases(CasesCommand::Show { id: 1 }), &env(&dir)).is_err());
    }

    #[test]
    fn incident_lifecycle_updates_dashboard() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env = env(&dir);
        run(add("Credenciales filtradas", "high", "open"), &env).expect("add");
        run(add("Alerta antigua", "critical", "closed"), &env).expect("add");

        let dashboard = run(
            Command::Dashboard {
                status: "open".to_string(),
            },
            &env,
        )
        .expect("dashboard");
        assert!(dashboard.contains("open incidents: 1"));

        let closed = run(
            Command::Dashboard {
                status: "closed".to_string(),
            },
            &env,
        )
        .expect("dashboard");
        assert!(closed.contains("closed incidents: 1"));

        let id = env.stores.incidents.load_all()[1].id;
        run(
            Command::Incident(IncidentCommand::Delete { id }),
            &env,
        )
        .expect("delete");
        assert_eq!(env.stores.incidents.load_all().len(), 1);
        assert!(run(Command::Incident(IncidentCommand::Delete { id }), &env).is_err());
    }

    #[test]
    fn blank_title_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env = env(&dir);
        assert!(run(add("   ", "low", "open"), &env).is_err());
        assert!(env.stores.incidents.load_all().is_empty());
    }
}
