use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "triage",
    version,
    about = "Incident response triage wizard and incident log"
)]
pub(crate) struct Args {
    #[arg(long, default_value = "config/triage.toml")]
    pub(crate) config: PathBuf,
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
    #[arg(long)]
    pub(crate) log_dir: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Interactive diagnostic wizard (default).
    Wizard,
    /// Print the question sequence for a category.
    Questions { category: String },
    /// Run the analysis without the interactive wizard.
    Analyze(AnalyzeArgs),
    #[command(subcommand)]
    Cases(CasesCommand),
    #[command(subcommand)]
    Incident(IncidentCommand),
    /// Tally incidents by severity.
    Dashboard {
        #[arg(long, default_value = "open")]
        status: String,
    },
}

#[derive(ClapArgs, Debug)]
pub(crate) struct AnalyzeArgs {
    pub(crate) category: String,
    /// `question_id=value`; multiple-choice values may be comma separated.
    #[arg(long = "answer", short = 'a')]
    pub(crate) answers: Vec<String>,
    #[arg(long, default_value_t = false)]
    pub(crate) save: bool,
    #[arg(long, default_value_t = false)]
    pub(crate) export: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum CasesCommand {
    List,
    Show { id: i64 },
    Export { id: i64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum IncidentCommand {
    Add(IncidentAddArgs),
    List,
    Delete { id: i64 },
}

#[derive(ClapArgs, Debug)]
pub(crate) struct IncidentAddArgs {
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long, default_value = "")]
    pub(crate) description: String,
    #[arg(long, default_value = "medium")]
    pub(crate) severity: String,
    #[arg(long = "type", default_value = "")]
    pub(crate) kind: String,
    #[arg(long, default_value = "")]
    pub(crate) source: String,
    #[arg(long, default_value = "open")]
    pub(crate) status: String,
}
