use anyhow::Context;
use std::io;
use std::path::Path;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "triage.log";

/// JSON lines to a daily rolling file; stderr only on request since the
/// wizard owns the terminal. `RUST_LOG` overrides `default_filter`.
pub(crate) fn init_tracing(
    log_dir: &Path,
    default_filter: &str,
    log_to_stderr: bool,
) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let filter = build_filter(
        std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        default_filter,
    )?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(false)
        .json();
    let stderr_layer = log_to_stderr.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(file_guard)
}

/// Blank `RUST_LOG` counts as unset.
fn build_filter(env_directives: Option<&str>, default_filter: &str) -> anyhow::Result<EnvFilter> {
    match env_directives.map(str::trim).filter(|value| !value.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid RUST_LOG directives `{directives}`")),
        None => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid logging.filter `{default_filter}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_that_is_a_file_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, b"not a directory").expect("write");

        let err = init_tracing(&blocker, "info", false).expect_err("file in the way");
        let message = format!("{err:#}");
        assert!(message.contains("failed to create log directory"), "{message}");
        assert!(message.contains(&blocker.display().to_string()), "{message}");
    }

    #[test]
    fn env_directives_win_over_config() {
        build_filter(Some("triage_console=debug"), "triage=loudest").expect("env filter used");
    }

    #[test]
    fn blank_env_falls_back_to_config() {
        let err = build_filter(Some("  "), "triage=loudest").expect_err("config filter used");
        assert!(format!("{err:#}").contains("invalid logging.filter"));
    }

    #[test]
    fn bad_env_filter_is_reported() {
        let err = build_filter(Some("triage=loudest"), "info").expect_err("bad level");
        assert!(format!("{err:#}").contains("invalid RUST_LOG"));
    }
}
