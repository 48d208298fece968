use std::io::{self, IsTerminal, Stdout};

use color_eyre::eyre::Context;
use color_eyre::Result;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

/// Owns the raw-mode terminal for the interactive session. Drop restores the
/// terminal, so error paths can't leave the shell in raw mode.
pub struct TermGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TermGuard {
    pub fn acquire() -> Result<Self> {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            color_eyre::eyre::bail!("browse requires an interactive terminal (TTY)");
        }

        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("create terminal")?;
        terminal.clear().ok();
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    pub fn set_title(&mut self, title: &str) {
        execute!(self.terminal.backend_mut(), SetTitle(title)).ok();
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).ok();
        self.terminal.show_cursor().ok();
    }
}
