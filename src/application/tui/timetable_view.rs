use super::events::{KeyOutcome, Status, ViewResult, is_quit_key};
use super::terminal::{Tui, centered_area, restore_terminal, setup_terminal};
use super::theme::Theme;
use crate::application::{Screen, TimetableApp};
use crate::entities::{CellId, PERIODS, SCHOOL_DAY_LABELS, SCHOOL_DAYS};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Browse,
    /// Editing the subject of the cursor cell
    Subject(String),
    /// Editing the schedule note of the cursor cell's subject
    Note(String),
}

/// Key handling for the timetable screen, kept apart from the terminal.
#[derive(Debug, Clone)]
pub struct TimetableEditor {
    mode: EditMode,
}

impl Default for TimetableEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TimetableEditor {
    pub fn new() -> Self {
        Self {
            mode: EditMode::Browse,
        }
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn handle_key(&mut self, app: &mut TimetableApp, key: KeyEvent) -> KeyOutcome {
        if self.mode == EditMode::Browse {
            self.handle_browse_key(app, key)
        } else {
            self.handle_edit_key(app, key)
        }
    }

    fn handle_browse_key(&mut self, app: &mut TimetableApp, key: KeyEvent) -> KeyOutcome {
        if is_quit_key(&key) {
            return KeyOutcome::Exit(ViewResult::Exited);
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => app.move_cursor(0, 1),
            KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1, 0),

            KeyCode::Enter | KeyCode::Char('e') => {
                let subject = app.subject(app.cursor()).to_string();
                self.mode = EditMode::Subject(subject);
            }
            KeyCode::Char('n') => match app.note_for(app.cursor()) {
                Ok(note) => self.mode = EditMode::Note(note.to_string()),
                Err(e) => return KeyOutcome::Status(Status::Error(e.to_string())),
            },
            KeyCode::Delete | KeyCode::Char('d') => {
                let cell = app.cursor();
                return saved_or_error(app.set_subject(cell, ""), format!("Cleared {cell}"));
            }
            KeyCode::Char('c') => {
                return saved_or_error(app.commit(), "Timetable saved".to_string());
            }

            KeyCode::Tab => return KeyOutcome::Exit(ViewResult::SwitchTo(Screen::Timetable.other())),
            KeyCode::Char('?') => return KeyOutcome::ToggleHelp,
            _ => {}
        }

        KeyOutcome::Continue
    }

    fn handle_edit_key(&mut self, app: &mut TimetableApp, key: KeyEvent) -> KeyOutcome {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.mode = EditMode::Browse;
                KeyOutcome::Status(Status::Info("Edit cancelled".to_string()))
            }
            (KeyCode::Enter, _) => {
                let cell = app.cursor();
                match std::mem::replace(&mut self.mode, EditMode::Browse) {
                    EditMode::Subject(subject) => {
                        saved_or_error(app.set_subject(cell, &subject), format!("Saved {cell}"))
                    }
                    EditMode::Note(note) => match app.set_note_for(cell, &note) {
                        Ok(()) => KeyOutcome::Status(Status::Info(format!(
                            "Saved schedule for {}",
                            app.subject(cell)
                        ))),
                        Err(e) => KeyOutcome::Status(Status::Error(format!("{e:#}"))),
                    },
                    EditMode::Browse => KeyOutcome::Continue,
                }
            }
            (KeyCode::Backspace, _) => {
                if let Some(buffer) = self.buffer_mut() {
                    buffer.pop();
                }
                KeyOutcome::Continue
            }
            (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(buffer) = self.buffer_mut() {
                    buffer.push(ch);
                }
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }

    fn buffer_mut(&mut self) -> Option<&mut String> {
        match &mut self.mode {
            EditMode::Subject(buffer) | EditMode::Note(buffer) => Some(buffer),
            EditMode::Browse => None,
        }
    }
}

fn saved_or_error<E: std::fmt::Display>(result: Result<(), E>, message: String) -> KeyOutcome {
    match result {
        Ok(()) => KeyOutcome::Status(Status::Info(message)),
        Err(e) => {
            log::error!("event=save_failed error={e}");
            KeyOutcome::Status(Status::Error(e.to_string()))
        }
    }
}

pub struct TimetableView<'a> {
    terminal: Tui,
    app: &'a mut TimetableApp,
    editor: TimetableEditor,
    theme: Theme,
    show_help: bool,
    status: Option<Status>,
    result: Option<ViewResult>,
}

impl<'a> TimetableView<'a> {
    pub fn new(app: &'a mut TimetableApp, theme: Theme) -> io::Result<Self> {
        let terminal = setup_terminal()?;
        Ok(Self {
            terminal,
            app,
            editor: TimetableEditor::new(),
            theme,
            show_help: false,
            status: None,
            result: None,
        })
    }

    fn create_grid_table(app: &TimetableApp, theme: &Theme) -> Table<'static> {
        let header_style = theme.colors.header.to_ratatui_with_modifier(Modifier::BOLD);
        let mut header_cells = vec![Cell::from("")];
        header_cells.extend(
            SCHOOL_DAY_LABELS
                .iter()
                .map(|label| Cell::from(*label).style(header_style)),
        );
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = (0..PERIODS)
            .map(|period| {
                let mut cells = vec![Cell::from(format!("{}", period + 1)).style(header_style)];
                for weekday in 0..SCHOOL_DAYS {
                    let Ok(cell) = CellId::new(period, weekday) else {
                        continue;
                    };
                    let subject = app.subject(cell);
                    let style = if cell == app.cursor() {
                        theme.colors.cursor.to_ratatui_with_modifier(Modifier::BOLD)
                    } else if subject.is_empty() {
                        theme.colors.dimmed.to_ratatui()
                    } else {
                        theme.colors.normal_text.to_ratatui()
                    };
                    let text = if subject.is_empty() { "-" } else { subject };
                    cells.push(Cell::from(text.to_string()).style(style));
                }
                Row::new(cells).height(2)
            })
            .collect();

        let mut widths = vec![Constraint::Length(3)];
        widths.extend([Constraint::Min(10); SCHOOL_DAYS]);

        Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.colors.border.to_ratatui())
                    .title(" Timetable ")
                    .title_style(theme.colors.title.to_ratatui_with_modifier(Modifier::BOLD))
                    .title_alignment(Alignment::Center),
            )
            .column_spacing(1)
    }

    fn create_detail_panel(app: &TimetableApp, editor: &TimetableEditor, theme: &Theme) -> Paragraph<'static> {
        let cell = app.cursor();
        let (title, body) = match editor.mode() {
            EditMode::Subject(buffer) => (
                format!(" Subject for {cell} "),
                Line::from(vec![
                    Span::styled(buffer.clone(), theme.colors.normal_text.to_ratatui()),
                    Span::styled("_", theme.colors.help_text.to_ratatui()),
                ]),
            ),
            EditMode::Note(buffer) => (
                format!(" Schedule for {} ", app.subject(cell)),
                Line::from(vec![
                    Span::styled(buffer.clone(), theme.colors.normal_text.to_ratatui()),
                    Span::styled("_", theme.colors.help_text.to_ratatui()),
                ]),
            ),
            EditMode::Browse => match app.note_for(cell) {
                Ok(note) if note.is_empty() => (
                    format!(" Schedule for {} ", app.subject(cell)),
                    Line::from(Span::styled("No schedule yet", theme.colors.dimmed.to_ratatui())),
                ),
                Ok(note) => (
                    format!(" Schedule for {} ", app.subject(cell)),
                    Line::from(Span::styled(note.to_string(), theme.colors.normal_text.to_ratatui())),
                ),
                Err(e) => (
                    format!(" {cell} "),
                    Line::from(Span::styled(e.to_string(), theme.colors.dimmed.to_ratatui())),
                ),
            },
        };

        Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.colors.border.to_ratatui())
                    .title(title),
            )
    }

    fn create_status_line(status: Option<&Status>, theme: &Theme) -> Paragraph<'static> {
        let span = match status {
            Some(Status::Info(text)) => Span::styled(text.clone(), theme.colors.status_text.to_ratatui()),
            Some(Status::Error(text)) => Span::styled(text.clone(), theme.colors.error_text.to_ratatui()),
            None => Span::raw(""),
        };
        Paragraph::new(Line::from(span)).alignment(Alignment::Center)
    }

    fn create_help_text(editor: &TimetableEditor, theme: &Theme) -> Paragraph<'static> {
        let text = match editor.mode() {
            EditMode::Browse => {
                "←→↑↓/hjkl=Move • Enter=Edit subject • n=Schedule • d=Clear • c=Save • Tab=Calendar • q=Quit"
            }
            _ => "Enter=Save • Esc=Cancel • Backspace=Delete",
        };
        Paragraph::new(Line::from(Span::styled(text, theme.colors.help_text.to_ratatui())))
            .alignment(Alignment::Center)
    }

    pub fn run(&mut self) -> io::Result<ViewResult> {
        loop {
            if let Some(result) = self.result {
                self.cleanup()?;
                return Ok(result);
            }

            let app = &*self.app;
            let editor = &self.editor;
            let theme = &self.theme;
            let status = self.status.as_ref();
            let show_help = self.show_help || !matches!(editor.mode(), EditMode::Browse);

            self.terminal.draw(|frame| {
                const GRID_HEIGHT: u16 = 12; // 4 periods * 2 rows + header + borders
                const DETAIL_HEIGHT: u16 = 5;
                const STATUS_HEIGHT: u16 = 1;
                const HELP_HEIGHT: u16 = 2;
                const WIDTH: u16 = 72;

                let area = centered_area(
                    frame.area(),
                    WIDTH,
                    GRID_HEIGHT + DETAIL_HEIGHT + STATUS_HEIGHT + HELP_HEIGHT,
                );

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(GRID_HEIGHT),
                        Constraint::Length(DETAIL_HEIGHT),
                        Constraint::Length(STATUS_HEIGHT),
                        Constraint::Length(HELP_HEIGHT),
                    ])
                    .split(area);

                frame.render_widget(Self::create_grid_table(app, theme), chunks[0]);
                frame.render_widget(Self::create_detail_panel(app, editor, theme), chunks[1]);
                frame.render_widget(Self::create_status_line(status, theme), chunks[2]);
                if show_help {
                    frame.render_widget(Self::create_help_text(editor, theme), chunks[3]);
                }
            })?;

            if !poll(std::time::Duration::from_millis(100))? {
                continue;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match self.editor.handle_key(self.app, key) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Status(status) => self.status = Some(status),
                    KeyOutcome::ToggleHelp => self.show_help = !self.show_help,
                    KeyOutcome::Exit(result) => self.result = Some(result),
                }
            }
        }
    }

    fn cleanup(&mut self) -> io::Result<()> {
        restore_terminal(&mut self.terminal)
    }
}

impl<'a> Drop for TimetableView<'a> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tui::events::key;
    use crate::entities::{NotesStore, TimetableStore};
    use crate::infrastructure::test_utils::test_harness::{MemoryNotes, MemoryTimetable};

    fn app() -> TimetableApp {
        let timetable = TimetableStore::load(Box::new(MemoryTimetable::default())).unwrap();
        let notes = NotesStore::load(Box::new(MemoryNotes::default())).unwrap();
        TimetableApp::new(timetable, notes)
    }

    fn type_text(editor: &mut TimetableEditor, app: &mut TimetableApp, text: &str) {
        for ch in text.chars() {
            editor.handle_key(app, key(KeyCode::Char(ch)));
        }
    }

    fn cell(period: usize, weekday: usize) -> CellId {
        CellId::new(period, weekday).unwrap()
    }

    #[test]
    fn editing_a_subject_saves_the_cell() {
        let mut app = app();
        let mut editor = TimetableEditor::new();

        editor.handle_key(&mut app, key(KeyCode::Right));
        editor.handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(editor.mode(), &EditMode::Subject(String::new()));

        type_text(&mut editor, &mut app, "Maths");
        editor.handle_key(&mut app, key(KeyCode::Backspace));
        let outcome = editor.handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(
            outcome,
            KeyOutcome::Status(Status::Info("Saved Tue period 1".to_string()))
        );
        assert_eq!(editor.mode(), &EditMode::Browse);
        assert_eq!(app.subject(cell(0, 1)), "Math");
    }

    #[test]
    fn letters_are_text_while_editing() {
        let mut app = app();
        let mut editor = TimetableEditor::new();
        editor.handle_key(&mut app, key(KeyCode::Char('e')));
        type_text(&mut editor, &mut app, "quiz");
        assert_eq!(editor.mode(), &EditMode::Subject("quiz".to_string()));
    }

    #[test]
    fn escape_cancels_without_saving() {
        let mut app = app();
        let mut editor = TimetableEditor::new();
        editor.handle_key(&mut app, key(KeyCode::Enter));
        type_text(&mut editor, &mut app, "Art");
        editor.handle_key(&mut app, key(KeyCode::Esc));

        assert_eq!(editor.mode(), &EditMode::Browse);
        assert_eq!(app.subject(cell(0, 0)), "");
    }

    #[test]
    fn schedule_on_empty_cell_is_a_validation_message() {
        let mut app = app();
        let mut editor = TimetableEditor::new();
        assert_eq!(
            editor.handle_key(&mut app, key(KeyCode::Char('n'))),
            KeyOutcome::Status(Status::Error("subject not set".to_string()))
        );
        assert_eq!(editor.mode(), &EditMode::Browse);
    }

    #[test]
    fn schedule_notes_are_edited_per_subject() {
        let mut app = app();
        app.set_subject(cell(0, 0), "Math").unwrap();
        let mut editor = TimetableEditor::new();

        editor.handle_key(&mut app, key(KeyCode::Char('n')));
        type_text(&mut editor, &mut app, "Chapter 3 homework");
        assert_eq!(
            editor.handle_key(&mut app, key(KeyCode::Enter)),
            KeyOutcome::Status(Status::Info("Saved schedule for Math".to_string()))
        );
        assert_eq!(app.note_for(cell(0, 0)).unwrap(), "Chapter 3 homework");

        // Reopening starts from the saved note
        editor.handle_key(&mut app, key(KeyCode::Char('n')));
        assert_eq!(
            editor.mode(),
            &EditMode::Note("Chapter 3 homework".to_string())
        );
    }

    #[test]
    fn clear_commit_switch_and_quit() {
        let mut app = app();
        app.set_subject(cell(0, 0), "Math").unwrap();
        let mut editor = TimetableEditor::new();

        editor.handle_key(&mut app, key(KeyCode::Char('d')));
        assert_eq!(app.subject(cell(0, 0)), "");

        assert_eq!(
            editor.handle_key(&mut app, key(KeyCode::Char('c'))),
            KeyOutcome::Status(Status::Info("Timetable saved".to_string()))
        );
        assert_eq!(
            editor.handle_key(&mut app, key(KeyCode::Tab)),
            KeyOutcome::Exit(ViewResult::SwitchTo(Screen::Calendar))
        );
        assert_eq!(
            editor.handle_key(&mut app, key(KeyCode::Char('q'))),
            KeyOutcome::Exit(ViewResult::Exited)
        );
    }
}
