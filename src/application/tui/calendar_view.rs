use super::events::{KeyOutcome, Status, ViewResult, is_quit_key};
use super::terminal::{Tui, centered_area, restore_terminal, setup_terminal};
use super::theme::Theme;
use crate::application::{CalendarApp, Screen};
use crate::entities::{DAYS_IN_WEEK, DayCell, WEEKDAY_HEADERS};
use chrono::Datelike;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, poll};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::io;

/// Applies one key press to the calendar state.
pub fn handle_calendar_key(app: &mut CalendarApp, key: KeyEvent) -> KeyOutcome {
    if is_quit_key(&key) {
        return KeyOutcome::Exit(ViewResult::Exited);
    }

    let navigation = match key.code {
        KeyCode::Char('<') | KeyCode::Char('p') | KeyCode::PageUp => app.previous_month(),
        KeyCode::Char('>') | KeyCode::Char('n') | KeyCode::PageDown => app.next_month(),
        KeyCode::Char('t') => app.go_to_today(),

        KeyCode::Left | KeyCode::Char('h') => {
            app.move_cursor(-1);
            return KeyOutcome::Continue;
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.move_cursor(1);
            return KeyOutcome::Continue;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_cursor(-(DAYS_IN_WEEK as i64));
            return KeyOutcome::Continue;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_cursor(DAYS_IN_WEEK as i64);
            return KeyOutcome::Continue;
        }

        KeyCode::Enter | KeyCode::Char(' ') => {
            return match app.select_cursor() {
                Ok(_) => match app.selection_message() {
                    Some(message) => KeyOutcome::Status(Status::Info(message)),
                    None => KeyOutcome::Continue,
                },
                Err(e) => KeyOutcome::Status(Status::Error(e.to_string())),
            };
        }

        KeyCode::Tab => return KeyOutcome::Exit(ViewResult::SwitchTo(Screen::Calendar.other())),
        KeyCode::Char('?') => return KeyOutcome::ToggleHelp,
        _ => return KeyOutcome::Continue,
    };

    match navigation {
        Ok(()) => KeyOutcome::Continue,
        Err(e) => {
            log::warn!("event=navigation_failed error={e}");
            KeyOutcome::Status(Status::Error(e.to_string()))
        }
    }
}

pub struct CalendarView<'a> {
    /// Terminal instance
    terminal: Tui,
    /// Calendar state being displayed
    app: &'a mut CalendarApp,
    theme: Theme,
    show_help: bool,
    status: Option<Status>,
    result: Option<ViewResult>,
}

impl<'a> CalendarView<'a> {
    pub fn new(app: &'a mut CalendarApp, theme: Theme) -> io::Result<Self> {
        let terminal = setup_terminal()?;
        Ok(Self {
            terminal,
            app,
            theme,
            show_help: false,
            status: None,
            result: None,
        })
    }

    /// Month grid with a coloured weekday header row.
    fn create_month_table(app: &CalendarApp, theme: &Theme) -> Table<'static> {
        let header = Row::new(
            WEEKDAY_HEADERS
                .iter()
                .enumerate()
                .map(|(column, name)| {
                    Cell::from(*name).style(
                        theme
                            .for_header_column(column)
                            .to_ratatui_with_modifier(Modifier::BOLD),
                    )
                })
                .collect::<Vec<_>>(),
        )
        .height(1);

        let rows: Vec<Row> = app
            .view()
            .weeks()
            .iter()
            .map(|week| {
                let cells: Vec<Cell> = week
                    .iter()
                    .map(|cell| match cell {
                        DayCell::Empty => Cell::from(""),
                        DayCell::Filled { date, category } => {
                            let style = if date.day() == app.cursor_day() {
                                theme.colors.cursor.to_ratatui_with_modifier(Modifier::BOLD)
                            } else {
                                theme.for_category(*category).to_ratatui()
                            };
                            Cell::from(format!("{:>3}", date.day())).style(style)
                        }
                    })
                    .collect();
                Row::new(cells).height(2)
            })
            .collect();

        Table::new(rows, [Constraint::Length(5); DAYS_IN_WEEK])
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.colors.border.to_ratatui())
                    .title(format!(" < {} > ", app.label()))
                    .title_style(theme.colors.title.to_ratatui_with_modifier(Modifier::BOLD))
                    .title_alignment(Alignment::Center),
            )
            .column_spacing(1)
    }

    fn create_status_line(
        app: &CalendarApp,
        status: Option<&Status>,
        theme: &Theme,
    ) -> Paragraph<'static> {
        let line = match status {
            Some(Status::Info(text)) => Span::styled(text.clone(), theme.colors.status_text.to_ratatui()),
            Some(Status::Error(text)) => Span::styled(text.clone(), theme.colors.error_text.to_ratatui()),
            None => {
                let cursor = app
                    .view()
                    .cell_for(app.cursor_day())
                    .and_then(DayCell::date);
                let text = match cursor {
                    Some(date) => match app.holiday_name(date) {
                        Some(holiday) => format!("{} - {}", date.format("%A, %B %d, %Y"), holiday),
                        None => date.format("%A, %B %d, %Y").to_string(),
                    },
                    None => String::new(),
                };
                Span::styled(text, theme.colors.normal_text.to_ratatui())
            }
        };

        Paragraph::new(Line::from(vec![line])).alignment(Alignment::Center)
    }

    fn create_help_text(theme: &Theme) -> Paragraph<'static> {
        Paragraph::new(vec![Line::from(vec![Span::styled(
            "←→↑↓/hjkl=Day • </>=Month • t=Today • Enter=Select • Tab=Timetable • ?=Help • q=Quit",
            theme.colors.help_text.to_ratatui(),
        )])])
        .block(Block::default().borders(Borders::NONE))
        .alignment(Alignment::Center)
    }

    pub fn run(&mut self) -> io::Result<ViewResult> {
        loop {
            if let Some(result) = self.result {
                self.cleanup()?;
                return Ok(result);
            }

            let app = &*self.app;
            let theme = &self.theme;
            let status = self.status.as_ref();
            let show_help = self.show_help;

            self.terminal.draw(|frame| {
                // 6 weeks * 2 rows + header + borders
                const CALENDAR_HEIGHT: u16 = 16;
                const CALENDAR_WIDTH: u16 = 44;
                const STATUS_HEIGHT: u16 = 2;
                const HELP_HEIGHT: u16 = 2;

                let total_height = if show_help {
                    CALENDAR_HEIGHT + STATUS_HEIGHT + HELP_HEIGHT
                } else {
                    CALENDAR_HEIGHT + STATUS_HEIGHT
                };
                let area = centered_area(frame.area(), CALENDAR_WIDTH + 30, total_height);

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(CALENDAR_HEIGHT),
                        Constraint::Length(STATUS_HEIGHT),
                        Constraint::Length(if show_help { HELP_HEIGHT } else { 0 }),
                    ])
                    .split(area);

                let table_area = centered_area(chunks[0], CALENDAR_WIDTH, CALENDAR_HEIGHT);
                frame.render_widget(Self::create_month_table(app, theme), table_area);
                frame.render_widget(Self::create_status_line(app, status, theme), chunks[1]);
                if show_help {
                    frame.render_widget(Self::create_help_text(theme), chunks[2]);
                }
            })?;

            if !poll(std::time::Duration::from_millis(100))? {
                continue;
            }

            // Other events (mouse, focus, resize) just trigger a redraw
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_calendar_key(self.app, key) {
                    KeyOutcome::Continue => self.status = None,
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

impl<'a> Drop for CalendarView<'a> {
    fn drop(&mut self) {
        // Fallback cleanup if run() exited early
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tui::events::key;
    use crate::infrastructure::JapaneseHolidays;
    use chrono::NaiveDate;

    fn app() -> CalendarApp {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        CalendarApp::new(today, Box::new(JapaneseHolidays)).unwrap()
    }

    #[test]
    fn month_keys_navigate() {
        let mut app = app();
        assert_eq!(handle_calendar_key(&mut app, key(KeyCode::Char('>'))), KeyOutcome::Continue);
        assert_eq!(app.label(), "November 2026");

        handle_calendar_key(&mut app, key(KeyCode::PageUp));
        handle_calendar_key(&mut app, key(KeyCode::Char('p')));
        assert_eq!(app.label(), "September 2026");

        handle_calendar_key(&mut app, key(KeyCode::Char('t')));
        assert_eq!(app.label(), "October 2026");
        assert_eq!(app.cursor_day(), 19);
    }

    #[test]
    fn arrow_keys_move_the_cursor_by_day_and_week() {
        let mut app = app();
        handle_calendar_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.cursor_day(), 26);
        handle_calendar_key(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.cursor_day(), 25);
        handle_calendar_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.cursor_day(), 18);
    }

    #[test]
    fn enter_reports_the_selected_date() {
        let mut app = app();
        assert_eq!(
            handle_calendar_key(&mut app, key(KeyCode::Enter)),
            KeyOutcome::Status(Status::Info("You selected: 2026-10-19".to_string()))
        );
    }

    #[test]
    fn tab_switches_and_q_quits() {
        let mut app = app();
        assert_eq!(
            handle_calendar_key(&mut app, key(KeyCode::Tab)),
            KeyOutcome::Exit(ViewResult::SwitchTo(Screen::Timetable))
        );
        assert_eq!(
            handle_calendar_key(&mut app, key(KeyCode::Char('q'))),
            KeyOutcome::Exit(ViewResult::Exited)
        );
        assert_eq!(
            handle_calendar_key(&mut app, key(KeyCode::Char('?'))),
            KeyOutcome::ToggleHelp
        );
    }
}
