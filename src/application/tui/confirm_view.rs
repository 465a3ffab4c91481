use super::terminal::{Tui, centered_area, restore_terminal, setup_terminal};
use super::theme::Theme;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};
use ratatui::{
    layout::Alignment,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

/// `Some(true)` for yes, `Some(false)` for no, `None` to keep waiting.
pub fn confirm_answer(key: KeyEvent) -> Option<bool> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('y'), _) | (KeyCode::Char('Y'), _) => Some(true),
        (KeyCode::Char('n'), _)
        | (KeyCode::Char('N'), _)
        | (KeyCode::Char('q'), _)
        | (KeyCode::Esc, _)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(false),
        _ => None,
    }
}

/// Yes/no question in a bordered box.
pub struct ConfirmView {
    terminal: Tui,
    title: String,
    message: String,
    theme: Theme,
}

impl ConfirmView {
    pub fn new(title: impl Into<String>, message: impl Into<String>, theme: Theme) -> io::Result<Self> {
        Ok(Self {
            terminal: setup_terminal()?,
            title: title.into(),
            message: message.into(),
            theme,
        })
    }

    fn create_prompt(title: &str, message: &str, theme: &Theme) -> Paragraph<'static> {
        Paragraph::new(vec![
            Line::from(Span::styled(message.to_string(), theme.colors.normal_text.to_ratatui())),
            Line::from(""),
            Line::from(Span::styled(
                "y=Yes • n=No",
                theme.colors.help_text.to_ratatui(),
            )),
        ])
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.colors.error_text.to_ratatui())
                .title(format!(" {title} "))
                .title_style(theme.colors.error_text.to_ratatui_with_modifier(Modifier::BOLD)),
        )
    }

    pub fn run(&mut self) -> io::Result<bool> {
        let answer = loop {
            let (title, message, theme) = (&self.title, &self.message, &self.theme);
            self.terminal.draw(|frame| {
                let area = centered_area(frame.area(), 64, 9);
                frame.render_widget(Self::create_prompt(title, message, theme), area);
            })?;

            if !poll(std::time::Duration::from_millis(100))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(answer) = confirm_answer(key) {
                    break answer;
                }
            }
        };

        restore_terminal(&mut self.terminal)?;
        Ok(answer)
    }
}

impl Drop for ConfirmView {
    fn drop(&mut self) {
        let _ = restore_terminal(&mut self.terminal);
    }
}
