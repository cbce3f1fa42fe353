mod cli;
mod commands;
mod config;
mod export;
mod logging;
mod store;
mod ui;
mod wizard;

use crate::cli::{Args, Command};
use crate::commands::{run_command, CommandEnv};
use crate::config::Config;
use crate::logging::init_tracing;
use crate::store::Stores;
use crate::wizard::run_wizard;
use clap::Parser;
use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load_or_default(&args.config)?;

    let log_dir = args.log_dir.clone().unwrap_or_else(|| config.logging.dir.clone());
    let _file_guard = init_tracing(&log_dir, &config.logging.filter, args.log_to_stderr)?;

    let data_dir = args.data_dir.unwrap_or(config.storage.data_dir);
    let env = CommandEnv {
        stores: Stores::open(&data_dir),
        export_dir: args.export_dir.unwrap_or(config.export.dir),
    };
    tracing::info!(
        cases = %env.stores.cases.path().display(),
        incidents = %env.stores.incidents.path().display(),
        export_dir = %env.export_dir.display(),
        "triage starting"
    );

    match args.command.unwrap_or(Command::Wizard) {
        Command::Wizard => run_wizard(&env, config.ui.history_limit),
        command => {
            let mut stdout = io::stdout().lock();
            run_command(command, &env, &mut stdout)?;
            stdout.flush()?;
            Ok(())
        }
    }
}
