use crate::entities::{
    CalendarError, CellId, DayCell, MonthNavigator, MonthView, NotesStore, TimetableError,
    TimetableGrid, TimetableStore,
};
use crate::infrastructure::{HolidayOracle, NotesRepository, StoreError, TimetableRepository};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};

/// The screens the planner can show. Views hand one of these back to the
/// shell when the user asks to switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Calendar,
    Timetable,
}

impl Screen {
    pub fn other(&self) -> Self {
        match self {
            Self::Calendar => Self::Timetable,
            Self::Timetable => Self::Calendar,
        }
    }
}

// ============================================================================
// Calendar
// ============================================================================

/// Month calendar state, independent of any terminal.
pub struct CalendarApp {
    navigator: MonthNavigator,
    today: NaiveDate,
    holidays: Box<dyn HolidayOracle>,
    view: MonthView,
    label: String,
    cursor_day: u32,
    selected: Option<NaiveDate>,
}

impl CalendarApp {
    pub fn new(today: NaiveDate, holidays: Box<dyn HolidayOracle>) -> Result<Self, CalendarError> {
        Self::starting_at(MonthNavigator::new(today), today, holidays)
    }

    pub fn starting_at(
        navigator: MonthNavigator,
        today: NaiveDate,
        holidays: Box<dyn HolidayOracle>,
    ) -> Result<Self, CalendarError> {
        let view = MonthView::build(navigator.year(), navigator.month(), today, holidays.as_ref())?;
        let mut app = Self {
            navigator,
            today,
            holidays,
            label: navigator.label(),
            view,
            cursor_day: 1,
            selected: None,
        };
        app.cursor_day = app.default_cursor_day();
        Ok(app)
    }

    pub fn view(&self) -> &MonthView {
        &self.view
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn cursor_day(&self) -> u32 {
        self.cursor_day
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn next_month(&mut self) -> Result<(), CalendarError> {
        self.navigate(MonthNavigator::next_month)
    }

    pub fn previous_month(&mut self) -> Result<(), CalendarError> {
        self.navigate(MonthNavigator::previous_month)
    }

    pub fn go_to_today(&mut self) -> Result<(), CalendarError> {
        let today = self.today;
        self.navigate(|navigator| navigator.go_to(today))
    }

    /// Moves the highlighted day, staying inside the displayed month.
    pub fn move_cursor(&mut self, days: i64) {
        let last = i64::from(self.view.days_in_month());
        let target = (i64::from(self.cursor_day) + days).clamp(1, last);
        self.cursor_day = target as u32;
    }

    pub fn select_cursor(&mut self) -> Result<NaiveDate, CalendarError> {
        self.select_day(self.cursor_day)
    }

    pub fn select_day(&mut self, day: u32) -> Result<NaiveDate, CalendarError> {
        let date = self
            .view
            .cell_for(day)
            .and_then(DayCell::date)
            .ok_or(CalendarError::InvalidDay {
                year: self.view.year,
                month: self.view.month,
                day,
            })?;

        self.cursor_day = day;
        self.selected = Some(date);
        log::debug!("event=date_selected date={date}");
        Ok(date)
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<&'static str> {
        self.holidays.holiday_name(date)
    }

    /// Status line text for the current selection.
    pub fn selection_message(&self) -> Option<String> {
        let date = self.selected?;
        Some(match self.holiday_name(date) {
            Some(holiday) => format!("You selected: {date} ({holiday})"),
            None => format!("You selected: {date}"),
        })
    }

    /// Regenerates the whole page after the navigator moves; the state is
    /// left untouched if the new month cannot be built.
    fn navigate(&mut self, step: impl FnOnce(&mut MonthNavigator)) -> Result<(), CalendarError> {
        let mut navigator = self.navigator;
        step(&mut navigator);

        let view = MonthView::build(
            navigator.year(),
            navigator.month(),
            self.today,
            self.holidays.as_ref(),
        )?;

        self.navigator = navigator;
        self.view = view;
        self.label = navigator.label();
        self.selected = None;
        self.cursor_day = self.default_cursor_day();
        Ok(())
    }

    fn default_cursor_day(&self) -> u32 {
        if self.view.year == self.today.year() && self.view.month == self.today.month() {
            self.today.day()
        } else {
            1
        }
    }
}

// ============================================================================
// Timetable
// ============================================================================

/// Timetable plus schedule notes, with a highlighted cell.
pub struct TimetableApp {
    timetable: TimetableStore,
    notes: NotesStore,
    cursor: CellId,
}

impl TimetableApp {
    pub fn new(timetable: TimetableStore, notes: NotesStore) -> Self {
        Self {
            timetable,
            notes,
            cursor: CellId::default(),
        }
    }

    pub fn open<R>(repository: R) -> Result<Self, StoreError>
    where
        R: TimetableRepository + NotesRepository + Clone + 'static,
    {
        let timetable = TimetableStore::load(Box::new(repository.clone()))?;
        let notes = NotesStore::load(Box::new(repository))?;
        Ok(Self::new(timetable, notes))
    }

    pub fn grid(&self) -> &TimetableGrid {
        self.timetable.grid()
    }

    pub fn subject(&self, cell: CellId) -> &str {
        self.timetable.cell(cell)
    }

    pub fn cursor(&self) -> CellId {
        self.cursor
    }

    pub fn move_cursor(&mut self, d_period: isize, d_weekday: isize) {
        self.cursor = self.cursor.offset(d_period, d_weekday);
    }

    /// Commits one cell; the whole timetable document is rewritten.
    pub fn set_subject(&mut self, cell: CellId, subject: &str) -> Result<(), StoreError> {
        let subject = subject.trim();
        self.timetable.set_cell(cell, subject)?;
        log::info!("event=subject_set cell={cell:?} subject={subject:?}");
        Ok(())
    }

    pub fn commit(&self) -> Result<(), StoreError> {
        self.timetable.commit()
    }

    /// The note of the subject in `cell`; empty cells have no schedule.
    pub fn note_for(&self, cell: CellId) -> Result<&str, TimetableError> {
        let subject = self.subject_in(cell)?;
        Ok(self.notes.get(subject))
    }

    pub fn set_note_for(&mut self, cell: CellId, note: &str) -> Result<()> {
        let subject = self.subject_in(cell)?.to_string();
        self.notes.set(subject.as_str(), note)?;
        log::info!("event=note_set subject={subject:?} bytes={}", note.len());
        Ok(())
    }

    fn subject_in(&self, cell: CellId) -> Result<&str, TimetableError> {
        let subject = self.timetable.cell(cell);
        if subject.is_empty() {
            return Err(TimetableError::SubjectNotSet);
        }
        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DayCategory;
    use crate::infrastructure::test_utils::test_harness::{MemoryNotes, MemoryTimetable, TestDataDir};
    use crate::infrastructure::{JapaneseHolidays, NoHolidays};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar(today: NaiveDate) -> CalendarApp {
        CalendarApp::new(today, Box::new(JapaneseHolidays)).unwrap()
    }

    fn timetable_app() -> TimetableApp {
        let timetable = TimetableStore::load(Box::new(MemoryTimetable::default())).unwrap();
        let notes = NotesStore::load(Box::new(MemoryNotes::default())).unwrap();
        TimetableApp::new(timetable, notes)
    }

    fn cell(period: usize, weekday: usize) -> CellId {
        CellId::new(period, weekday).unwrap()
    }

    #[test]
    fn starts_on_todays_month() {
        let app = calendar(date(2026, 10, 19));
        assert_eq!(app.label(), "October 2026");
        assert_eq!(app.cursor_day(), 19);
        assert_eq!(
            app.view().cell_for(19).unwrap().category(),
            Some(DayCategory::Today)
        );
    }

    #[test]
    fn navigation_regenerates_view_and_label() {
        let mut app = calendar(date(2026, 12, 5));
        app.next_month().unwrap();
        assert_eq!(app.label(), "January 2027");
        assert_eq!((app.view().year, app.view().month), (2027, 1));
        assert_eq!(app.cursor_day(), 1);

        app.previous_month().unwrap();
        app.previous_month().unwrap();
        assert_eq!(app.label(), "November 2026");

        app.go_to_today().unwrap();
        assert_eq!(app.label(), "December 2026");
        assert_eq!(app.cursor_day(), 5);
    }

    #[test]
    fn navigation_clears_selection() {
        let mut app = calendar(date(2026, 10, 19));
        app.select_day(3).unwrap();
        assert!(app.selected().is_some());
        app.next_month().unwrap();
        assert!(app.selected().is_none());
    }

    #[test]
    fn selecting_days() {
        let mut app = calendar(date(2026, 10, 19));
        assert_eq!(app.select_day(12).unwrap(), date(2026, 10, 12));
        assert_eq!(
            app.selection_message().unwrap(),
            "You selected: 2026-10-12 (Sports Day)"
        );

        app.select_day(20).unwrap();
        assert_eq!(app.selection_message().unwrap(), "You selected: 2026-10-20");

        assert_eq!(
            app.select_day(32),
            Err(CalendarError::InvalidDay {
                year: 2026,
                month: 10,
                day: 32
            })
        );
    }

    #[test]
    fn cursor_stays_inside_month() {
        let mut app = CalendarApp::starting_at(
            MonthNavigator::at(2024, 2).unwrap(),
            date(2026, 10, 19),
            Box::new(NoHolidays),
        )
        .unwrap();
        assert_eq!(app.cursor_day(), 1);

        app.move_cursor(-7);
        assert_eq!(app.cursor_day(), 1);
        app.move_cursor(27);
        assert_eq!(app.cursor_day(), 28);
        app.move_cursor(7);
        assert_eq!(app.cursor_day(), 29);
        assert_eq!(app.select_cursor().unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn screens_toggle() {
        assert_eq!(Screen::Calendar.other(), Screen::Timetable);
        assert_eq!(Screen::Timetable.other(), Screen::Calendar);
    }

    #[test]
    fn notes_require_a_subject() {
        let mut app = timetable_app();
        let empty = cell(1, 1);

        assert_eq!(app.note_for(empty), Err(TimetableError::SubjectNotSet));
        let err = app.set_note_for(empty, "anything").unwrap_err();
        assert_eq!(err.to_string(), "subject not set");
    }

    #[test]
    fn notes_follow_the_subject_name() {
        let mut app = timetable_app();
        app.set_subject(cell(0, 0), "Math").unwrap();
        app.set_subject(cell(2, 3), "Math").unwrap();
        app.set_note_for(cell(0, 0), "Chapter 3 homework").unwrap();

        // Same subject in another slot shares the note
        assert_eq!(app.note_for(cell(2, 3)).unwrap(), "Chapter 3 homework");

        // Renaming orphans the note
        app.set_subject(cell(0, 0), "Algebra").unwrap();
        assert_eq!(app.note_for(cell(0, 0)).unwrap(), "");
        assert_eq!(app.note_for(cell(2, 3)).unwrap(), "Chapter 3 homework");
    }

    #[test]
    fn subjects_are_trimmed() {
        let mut app = timetable_app();
        app.set_subject(cell(0, 1), "  English \n").unwrap();
        assert_eq!(app.subject(cell(0, 1)), "English");
    }

    #[test]
    fn cursor_moves_within_grid() {
        let mut app = timetable_app();
        app.move_cursor(-1, 0);
        assert_eq!(app.cursor(), cell(0, 0));
        app.move_cursor(2, 3);
        assert_eq!(app.cursor(), cell(2, 3));
        app.move_cursor(5, 5);
        assert_eq!(app.cursor(), cell(3, 4));
    }

    #[test]
    fn open_reads_both_documents_from_disk() {
        let dir = TestDataDir::new();
        {
            let mut app = TimetableApp::open(dir.repository()).unwrap();
            app.set_subject(cell(0, 0), "Math").unwrap();
            app.set_note_for(cell(0, 0), "Chapter 3 homework").unwrap();
            app.commit().unwrap();
        }

        let app = TimetableApp::open(dir.repository()).unwrap();
        assert_eq!(app.subject(cell(0, 0)), "Math");
        assert_eq!(app.note_for(cell(0, 0)).unwrap(), "Chapter 3 homework");
    }
}
