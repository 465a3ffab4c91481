use crossterm::ExecutableCommand;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::tty::IsTty;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{self, Stdout, stdout};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enters raw mode and the alternate screen, undoing whatever succeeded if a
/// later step fails.
pub fn setup_terminal() -> io::Result<Tui> {
    if !IsTty::is_tty(&stdout()) {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Not running in a TTY, cannot initialize terminal interface",
        ));
    }

    enable_raw_mode().map_err(|e| io::Error::other(format!("Failed to enable raw mode: {}", e)))?;

    stdout().execute(EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        io::Error::other(format!("Failed to enter alternate screen: {}", e))
    })?;

    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend).map_err(|e| {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        io::Error::other(format!("Failed to create terminal: {}", e))
    })
}

pub fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Calculate centered area with both horizontal and vertical centering
pub fn centered_area(available: Rect, needed_width: u16, needed_height: u16) -> Rect {
    let width = available.width.min(needed_width);
    let height = available.height.min(needed_height);

    Rect {
        x: available.x + (available.width - width) / 2,
        y: available.y + (available.height - height) / 2,
        width,
        height,
    }
}
