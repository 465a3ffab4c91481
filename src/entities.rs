use crate::infrastructure::{HolidayOracle, NotesRepository, StoreError, TimetableRepository};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;

// ============================================================================
// Calendar Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The (year, month) pair does not name a real month.
    InvalidDate { year: i32, month: u32 },
    /// The day does not exist in the displayed month.
    InvalidDay { year: i32, month: u32, day: u32 },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDate { year, month } => {
                write!(f, "invalid calendar month: {year}-{month:02}")
            }
            Self::InvalidDay { year, month, day } => {
                write!(f, "day {day} does not exist in {year}-{month:02}")
            }
        }
    }
}

impl std::error::Error for CalendarError {}

// ============================================================================
// Day Cells and Month View
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCategory {
    Today,
    Saturday,
    Sunday,
    Holiday,
    Weekday,
}

impl DayCategory {
    /// Today wins over everything, weekends over holidays, holidays over
    /// plain weekdays.
    pub fn classify(date: NaiveDate, today: NaiveDate, holidays: &dyn HolidayOracle) -> Self {
        if date == today {
            return Self::Today;
        }

        match date.weekday() {
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
            _ if holidays.is_holiday(date) => Self::Holiday,
            _ => Self::Weekday,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    Empty,
    Filled { date: NaiveDate, category: DayCategory },
}

impl DayCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Empty => None,
            Self::Filled { date, .. } => Some(*date),
        }
    }

    pub fn category(&self) -> Option<DayCategory> {
        match self {
            Self::Empty => None,
            Self::Filled { category, .. } => Some(*category),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

pub const DAYS_IN_WEEK: usize = 7;
pub const WEEKDAY_HEADERS: [&str; DAYS_IN_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One calendar page: leading blanks followed by every day of the month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<DayCell>,
}

impl MonthView {
    pub fn build(
        year: i32,
        month: u32,
        today: NaiveDate,
        holidays: &dyn HolidayOracle,
    ) -> Result<Self, CalendarError> {
        let first = first_of_month(year, month)?;

        // Sunday is column 0
        let leading_blanks = ((first.weekday().num_days_from_monday() + 1) % 7) as usize;
        let days = days_in_month(year, month)?;

        let mut cells = Vec::with_capacity(leading_blanks + days as usize);
        cells.extend(std::iter::repeat_n(DayCell::Empty, leading_blanks));

        for day in 1..=days {
            let date = NaiveDate::from_ymd_opt(year, month, day)
                .ok_or(CalendarError::InvalidDay { year, month, day })?;
            cells.push(DayCell::Filled {
                date,
                category: DayCategory::classify(date, today, holidays),
            });
        }

        Ok(Self { year, month, cells })
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|cell| cell.is_empty()).count()
    }

    pub fn filled_days(&self) -> impl Iterator<Item = (NaiveDate, DayCategory)> + '_ {
        self.cells.iter().filter_map(|cell| match cell {
            DayCell::Filled { date, category } => Some((*date, *category)),
            DayCell::Empty => None,
        })
    }

    pub fn days_in_month(&self) -> u32 {
        self.filled_days().count() as u32
    }

    pub fn cell_for(&self, day: u32) -> Option<&DayCell> {
        self.cells
            .iter()
            .find(|cell| cell.date().is_some_and(|date| date.day() == day))
    }

    /// Rows of seven cells; the last row is padded with blanks.
    pub fn weeks(&self) -> Vec<[DayCell; DAYS_IN_WEEK]> {
        self.cells
            .chunks(DAYS_IN_WEEK)
            .map(|chunk| {
                let mut row = [DayCell::Empty; DAYS_IN_WEEK];
                row[..chunk.len()].copy_from_slice(chunk);
                row
            })
            .collect()
    }
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidDate { year, month })
}

/// Last day of the month, computed as the day before the first of the next
/// month. December is always 31 days, which also covers the last year chrono
/// can represent.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    first_of_month(year, month)?;
    if month == 12 {
        return Ok(31);
    }

    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .and_then(|date| date.pred_opt())
        .map(|date| date.day())
        .ok_or(CalendarError::InvalidDate { year, month })
}

// ============================================================================
// Month Navigator
// ============================================================================

/// The month currently on display. Lives only as long as the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthNavigator {
    year: i32,
    month: u32,
}

impl MonthNavigator {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn at(year: i32, month: u32) -> Result<Self, CalendarError> {
        first_of_month(year, month)?;
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.year += 1;
            self.month = 1;
        } else {
            self.month += 1;
        }
    }

    pub fn previous_month(&mut self) {
        if self.month == 1 {
            self.year -= 1;
            self.month = 12;
        } else {
            self.month -= 1;
        }
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.year = date.year();
        self.month = date.month();
    }

    /// Display label such as "October 2026".
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => first.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }
}

// ============================================================================
// Timetable
// ============================================================================

pub const PERIODS: usize = 4;
pub const SCHOOL_DAYS: usize = 5;
pub const SCHOOL_DAY_LABELS: [&str; SCHOOL_DAYS] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    CellOutOfRange { period: usize, weekday: usize },
    /// The selected cell has no subject, so it has no schedule either.
    SubjectNotSet,
}

impl fmt::Display for TimetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOutOfRange { period, weekday } => write!(
                f,
                "timetable cell out of range: period {period}, weekday {weekday} (grid is {PERIODS}x{SCHOOL_DAYS})"
            ),
            Self::SubjectNotSet => write!(f, "subject not set"),
        }
    }
}

impl std::error::Error for TimetableError {}

/// Address of one timetable cell: period 0..4, Monday-based weekday 0..5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    period: usize,
    weekday: usize,
}

impl CellId {
    pub fn new(period: usize, weekday: usize) -> Result<Self, TimetableError> {
        if period >= PERIODS || weekday >= SCHOOL_DAYS {
            return Err(TimetableError::CellOutOfRange { period, weekday });
        }
        Ok(Self { period, weekday })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn weekday(&self) -> usize {
        self.weekday
    }

    pub fn all() -> impl Iterator<Item = CellId> {
        (0..PERIODS).flat_map(|period| (0..SCHOOL_DAYS).map(move |weekday| CellId { period, weekday }))
    }

    /// Neighbouring cell, clamped to the grid edges.
    pub fn offset(&self, d_period: isize, d_weekday: isize) -> Self {
        let clamp = |value: usize, delta: isize, len: usize| {
            value.saturating_add_signed(delta).min(len - 1)
        };
        Self {
            period: clamp(self.period, d_period, PERIODS),
            weekday: clamp(self.weekday, d_weekday, SCHOOL_DAYS),
        }
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self {
            period: 0,
            weekday: 0,
        }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} period {}",
            SCHOOL_DAY_LABELS[self.weekday],
            self.period + 1
        )
    }
}

/// Subject names, serialized as row-major nested arrays (periods of weekdays).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TimetableGrid {
    rows: [[String; SCHOOL_DAYS]; PERIODS],
}

impl TimetableGrid {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[[String; SCHOOL_DAYS]; PERIODS] {
        &self.rows
    }

    pub fn get(&self, cell: CellId) -> &str {
        &self.rows[cell.period][cell.weekday]
    }

    pub fn set(&mut self, cell: CellId, subject: impl Into<String>) {
        self.rows[cell.period][cell.weekday] = subject.into();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|subject| subject.is_empty())
    }
}

/// In-memory timetable backed by a repository; every edit rewrites the
/// whole document.
pub struct TimetableStore {
    grid: TimetableGrid,
    repository: Box<dyn TimetableRepository>,
}

impl TimetableStore {
    /// A missing document is a first run and yields an empty grid.
    pub fn load(repository: Box<dyn TimetableRepository>) -> Result<Self, StoreError> {
        let grid = repository.load()?.unwrap_or_default();
        Ok(Self { grid, repository })
    }

    /// Discards whatever is stored and writes an empty grid.
    pub fn reset(repository: Box<dyn TimetableRepository>) -> Result<Self, StoreError> {
        let store = Self {
            grid: TimetableGrid::empty(),
            repository,
        };
        store.commit()?;
        Ok(store)
    }

    pub fn grid(&self) -> &TimetableGrid {
        &self.grid
    }

    pub fn cell(&self, cell: CellId) -> &str {
        self.grid.get(cell)
    }

    /// The in-memory grid only changes once the new document is saved.
    pub fn set_cell(&mut self, cell: CellId, subject: impl Into<String>) -> Result<(), StoreError> {
        let mut grid = self.grid.clone();
        grid.set(cell, subject);
        self.repository.save(&grid)?;
        self.grid = grid;
        Ok(())
    }

    pub fn commit(&self) -> Result<(), StoreError> {
        self.repository.save(&self.grid)
    }
}

// ============================================================================
// Schedule Notes
// ============================================================================

/// Subject name to free-text note, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleNotes {
    entries: Vec<(String, String)>,
}

impl ScheduleNotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut notes = Self::new();
        for (subject, text) in pairs {
            notes.set(subject, text);
        }
        notes
    }

    pub fn get(&self, subject: &str) -> &str {
        self.entries
            .iter()
            .find(|(key, _)| key == subject)
            .map(|(_, text)| text.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, subject: impl Into<String>, text: impl Into<String>) {
        let subject = subject.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(key, _)| *key == subject) {
            Some((_, existing)) => *existing = text,
            None => self.entries.push((subject, text)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(subject, text)| (subject.as_str(), text.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct NotesStore {
    notes: ScheduleNotes,
    repository: Box<dyn NotesRepository>,
}

impl NotesStore {
    pub fn load(repository: Box<dyn NotesRepository>) -> Result<Self, StoreError> {
        let notes = repository.load()?.unwrap_or_default();
        Ok(Self { notes, repository })
    }

    pub fn reset(repository: Box<dyn NotesRepository>) -> Result<Self, StoreError> {
        let notes = ScheduleNotes::new();
        repository.save(&notes)?;
        Ok(Self { notes, repository })
    }

    pub fn notes(&self) -> &ScheduleNotes {
        &self.notes
    }

    pub fn get(&self, subject: &str) -> &str {
        self.notes.get(subject)
    }

    pub fn set(&mut self, subject: impl Into<String>, text: impl Into<String>) -> Result<(), StoreError> {
        let mut notes = self.notes.clone();
        notes.set(subject, text);
        self.repository.save(&notes)?;
        self.notes = notes;
        Ok(())
    }
}
