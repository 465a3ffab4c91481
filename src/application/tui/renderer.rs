use super::theme::{ColorPair, Theme};
use crate::application::CalendarApp;
use crate::entities::{CellId, DayCell, PERIODS, SCHOOL_DAY_LABELS, SCHOOL_DAYS, TimetableGrid, WEEKDAY_HEADERS};
use chrono::Datelike;
use ratatui::text::Span;
use std::io::IsTerminal;

/// Plain stdout rendering for the non-interactive commands.
pub struct TextRenderer {
    theme: Theme,
    color: bool,
}

impl TextRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme, color: true }
    }

    pub fn plain() -> Self {
        Self {
            theme: Theme::minimal(),
            color: false,
        }
    }

    /// Coloured on a terminal, plain when stdout is piped.
    pub fn for_stdout(theme: Theme) -> Self {
        if std::io::stdout().is_terminal() {
            Self::new(theme)
        } else {
            Self::plain()
        }
    }

    fn paint(&self, colors: &ColorPair, text: &str) -> String {
        if self.color {
            colors.colorize(text)
        } else {
            text.to_string()
        }
    }

    pub fn render_month(&self, app: &CalendarApp) -> String {
        let view = app.view();
        let width = WEEKDAY_HEADERS.len() * 4 - 1;
        let mut lines = Vec::new();

        let title = format!("{:^width$}", app.label());
        lines.push(if self.color {
            self.theme.colors.title.colorize_bold(title.trim_end())
        } else {
            title.trim_end().to_string()
        });

        let header: Vec<String> = WEEKDAY_HEADERS
            .iter()
            .enumerate()
            .map(|(column, name)| self.paint(self.theme.for_header_column(column), name))
            .collect();
        lines.push(header.join(" "));

        for week in view.weeks() {
            let cells: Vec<String> = week
                .iter()
                .map(|cell| match cell {
                    DayCell::Empty => "   ".to_string(),
                    DayCell::Filled { date, category } => {
                        self.paint(self.theme.for_category(*category), &format!("{:>3}", date.day()))
                    }
                })
                .collect();
            lines.push(cells.join(" ").trim_end().to_string());
        }

        let holidays: Vec<String> = view
            .filled_days()
            .filter_map(|(date, _)| {
                app.holiday_name(date)
                    .map(|name| format!("{:>3} {}", date.day(), name))
            })
            .collect();
        if !holidays.is_empty() {
            lines.push(String::new());
            lines.push("Holidays:".to_string());
            lines.extend(
                holidays
                    .iter()
                    .map(|line| self.paint(&self.theme.colors.holiday, line)),
            );
        }

        lines.join("\n")
    }

    pub fn render_timetable(&self, grid: &TimetableGrid) -> String {
        let display = |subject: &str| -> String {
            if subject.is_empty() {
                "-".to_string()
            } else {
                subject.to_string()
            }
        };

        let widths: Vec<usize> = (0..SCHOOL_DAYS)
            .map(|weekday| {
                grid.rows()
                    .iter()
                    .map(|row| display_width(&display(&row[weekday])))
                    .chain(std::iter::once(SCHOOL_DAY_LABELS[weekday].len()))
                    .max()
                    .unwrap_or(3)
            })
            .collect();

        let mut lines = Vec::with_capacity(PERIODS + 1);

        let mut header = "  ".to_string();
        for (label, width) in SCHOOL_DAY_LABELS.iter().zip(&widths) {
            header.push(' ');
            header.push_str(&self.paint(&self.theme.colors.header, &pad(label, *width)));
        }
        lines.push(header.trim_end().to_string());

        for period in 0..PERIODS {
            let mut line = self.paint(&self.theme.colors.header, &format!("{:>2}", period + 1));
            for (weekday, width) in widths.iter().enumerate() {
                let Ok(cell) = CellId::new(period, weekday) else {
                    continue;
                };
                let subject = grid.get(cell);
                let colors = if subject.is_empty() {
                    &self.theme.colors.dimmed
                } else {
                    &self.theme.colors.normal_text
                };
                line.push(' ');
                line.push_str(&self.paint(colors, &pad(&display(subject), *width)));
            }
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }
}

/// Terminal columns taken by `text`; CJK characters are two wide.
fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

fn pad(text: &str, width: usize) -> String {
    format!("{}{}", text, " ".repeat(width.saturating_sub(display_width(text))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::JapaneseHolidays;
    use chrono::NaiveDate;

    #[test]
    fn plain_month_page() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let app = CalendarApp::new(today, Box::new(JapaneseHolidays)).unwrap();
        let text = TextRenderer::plain().render_month(&app);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "       February 2026");
        assert_eq!(lines[1], "Sun Mon Tue Wed Thu Fri Sat");
        assert_eq!(lines[2], "  1   2   3   4   5   6   7");
        assert_eq!(lines[5], " 22  23  24  25  26  27  28");
        assert_eq!(
            &lines[6..],
            &["", "Holidays:", " 11 National Foundation Day", " 23 Emperor's Birthday"]
        );
    }

    #[test]
    fn leading_blanks_are_kept() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let app = CalendarApp::new(today, Box::new(JapaneseHolidays)).unwrap();
        let text = TextRenderer::plain().render_month(&app);
        // October 2026 starts on a Thursday
        assert_eq!(text.lines().nth(2), Some("                  1   2   3"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 5).unwrap();
        let app = CalendarApp::new(today, Box::new(JapaneseHolidays)).unwrap();
        let text = TextRenderer::plain().render_month(&app);
        assert!(!text.contains('\u{1b}'));
        assert!(text.contains("  3 Constitution Memorial Day"));
        assert!(text.contains("  6 Substitute Holiday"));
    }

    #[test]
    fn plain_timetable() {
        let mut grid = TimetableGrid::empty();
        grid.set(CellId::new(0, 0).unwrap(), "Math");
        let text = TextRenderer::plain().render_timetable(&grid);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), PERIODS + 1);
        assert_eq!(lines[0], "   Mon  Tue Wed Thu Fri");
        assert_eq!(lines[1], " 1 Math -   -   -   -");
        assert_eq!(lines[2], " 2 -    -   -   -   -");
    }

    #[test]
    fn wide_subjects_are_padded_by_display_width() {
        let mut grid = TimetableGrid::empty();
        grid.set(CellId::new(0, 0).unwrap(), "数学");
        grid.set(CellId::new(1, 1).unwrap(), "英語");
        let text = TextRenderer::plain().render_timetable(&grid);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "   Mon  Tue  Wed Thu Fri");
        assert_eq!(lines[1], " 1 数学 -    -   -   -");
        assert_eq!(lines[2], " 2 -    英語 -   -   -");
    }
}
