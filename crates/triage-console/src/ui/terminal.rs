use anyhow::Context;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;

pub(crate) type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub(crate) fn setup_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

pub(crate) fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
