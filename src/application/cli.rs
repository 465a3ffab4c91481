use crate::application::{
    CalendarApp, CalendarView, Config, ConfirmView, Screen, TextRenderer, Theme, TimetableApp, TimetableView,
    ViewResult,
};
use crate::entities::{CellId, MonthNavigator, NotesStore, TimetableStore};
use crate::infrastructure::{FileSystemRepository, HookRegistry, SaveLoggerHook, StoreError, init_logging};
use anyhow::{Context, bail};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "A terminal month calendar with a weekly school timetable")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the month calendar (default)
    Calendar {
        /// Month to open (YYYY-MM format, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Print one month page to stdout
    Month {
        /// Month to print (YYYY-MM format, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Open the timetable editor, or manage the timetable directly
    Timetable {
        #[command(subcommand)]
        action: Option<TimetableAction>,
    },
    /// Print the schedule note of a subject, or replace it when TEXT is given
    Note { subject: String, text: Option<String> },
}

#[derive(Subcommand)]
pub enum TimetableAction {
    /// Print the timetable grid
    Show,
    /// Set one cell
    Set {
        /// Period, 1 to 4
        period: usize,
        /// Weekday, mon..fri or 1..5
        weekday: String,
        subject: String,
    },
    /// Overwrite the timetable with an empty grid
    Reset,
}

impl Cli {
    pub fn run() -> anyhow::Result<()> {
        let cli = Self::parse();
        let config = Config::from_env();

        // Held until exit; dropping the handle flushes the log file
        let _logger = match init_logging(&config.log_level, &config.log_dir) {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("warning: logging disabled: {e:#}");
                None
            }
        };

        let session = Session::new(config);

        match cli.command {
            None => session.run_screens(Screen::Calendar, None)?,
            Some(Commands::Calendar { month }) => {
                let month = month.as_deref().map(parse_month).transpose()?;
                session.run_screens(Screen::Calendar, month)?;
            }
            Some(Commands::Month { month }) => {
                let month = month.as_deref().map(parse_month).transpose()?;
                let app = session.calendar_app(month)?;
                println!("{}", TextRenderer::for_stdout(session.theme.clone()).render_month(&app));
            }
            Some(Commands::Timetable { action: None }) => session.run_screens(Screen::Timetable, None)?,
            Some(Commands::Timetable {
                action: Some(TimetableAction::Show),
            }) => {
                let store = session.load_timetable()?;
                println!("{}", TextRenderer::for_stdout(session.theme.clone()).render_timetable(store.grid()));
            }
            Some(Commands::Timetable {
                action: Some(TimetableAction::Set {
                    period,
                    weekday,
                    subject,
                }),
            }) => {
                let cell = parse_cell(period, &weekday)?;
                let mut store = session.load_timetable()?;
                let subject = subject.trim();
                store
                    .set_cell(cell, subject)
                    .with_context(|| format!("failed to save {cell}"))?;
                log::info!("event=subject_set cell={cell:?} subject={subject:?} source=cli");
                println!("{cell}: {subject}");
            }
            Some(Commands::Timetable {
                action: Some(TimetableAction::Reset),
            }) => {
                TimetableStore::reset(Box::new(session.repository.clone()))
                    .context("failed to reset the timetable")?;
                println!("Timetable reset: {}", session.config.timetable_path().display());
            }
            Some(Commands::Note { subject, text }) => {
                let mut notes = session.load_notes()?;
                match text {
                    Some(text) => {
                        notes
                            .set(subject.as_str(), text)
                            .with_context(|| format!("failed to save the note for {subject}"))?;
                        println!("Saved schedule for {subject}");
                    }
                    None => println!("{}", notes.get(&subject)),
                }
            }
        }

        Ok(())
    }
}

/// Everything the commands share once configuration is read.
struct Session {
    config: Config,
    theme: Theme,
    repository: FileSystemRepository,
    today: NaiveDate,
}

impl Session {
    fn new(config: Config) -> Self {
        let mut hooks = HookRegistry::new();
        hooks.register(SaveLoggerHook);

        Self {
            theme: Theme::by_name(&config.theme),
            repository: FileSystemRepository::with_hooks(config.data_dir.clone(), hooks),
            today: Local::now().date_naive(),
            config,
        }
    }

    fn calendar_app(&self, month: Option<(i32, u32)>) -> anyhow::Result<CalendarApp> {
        let navigator = match month {
            Some((year, month)) => MonthNavigator::at(year, month)?,
            None => MonthNavigator::new(self.today),
        };
        Ok(CalendarApp::starting_at(
            navigator,
            self.today,
            self.config.holidays.oracle(),
        )?)
    }

    fn load_timetable(&self) -> anyhow::Result<TimetableStore> {
        TimetableStore::load(Box::new(self.repository.clone())).map_err(|e| self.with_recovery_hint(e))
    }

    fn load_notes(&self) -> anyhow::Result<NotesStore> {
        NotesStore::load(Box::new(self.repository.clone())).map_err(|e| self.with_recovery_hint(e))
    }

    fn with_recovery_hint(&self, error: StoreError) -> anyhow::Error {
        let hint = match &error {
            StoreError::Corrupt { path, .. } if *path == self.config.timetable_path() => {
                Some("run `almanac timetable reset` to start over with an empty timetable".to_string())
            }
            StoreError::Corrupt { path, .. } if *path == self.config.notes_path() => Some(format!(
                "fix or remove {} to start over without schedule notes",
                path.display()
            )),
            _ => None,
        };
        match hint {
            Some(hint) => anyhow::Error::new(error).context(hint),
            None => error.into(),
        }
    }

    /// Runs the TUI, switching between calendar and timetable until the user
    /// quits.
    fn run_screens(&self, start: Screen, month: Option<(i32, u32)>) -> anyhow::Result<()> {
        let mut calendar = self.calendar_app(month)?;
        let mut timetable: Option<TimetableApp> = None;
        let mut screen = start;

        loop {
            let result = match screen {
                Screen::Calendar => {
                    let mut view = CalendarView::new(&mut calendar, self.theme.clone())?;
                    view.run()?
                }
                Screen::Timetable => {
                    if timetable.is_none() {
                        match self.open_timetable()? {
                            Some(app) => timetable = Some(app),
                            None => match screen_after_declined_reset(start) {
                                Some(next) => {
                                    screen = next;
                                    continue;
                                }
                                None => break,
                            },
                        }
                    }
                    let Some(app) = timetable.as_mut() else {
                        break;
                    };
                    let mut view = TimetableView::new(app, self.theme.clone())?;
                    view.run()?
                }
            }; // the view is dropped here, restoring the terminal

            match result {
                ViewResult::Exited => break,
                ViewResult::SwitchTo(next) => {
                    log::debug!("event=screen_switch from={screen:?} to={next:?}");
                    screen = next;
                }
            }
        }

        Ok(())
    }

    /// Loads both documents. A corrupt file is only overwritten after the
    /// user confirms; declining returns `None`.
    fn open_timetable(&self) -> anyhow::Result<Option<TimetableApp>> {
        loop {
            match TimetableApp::open(self.repository.clone()) {
                Ok(app) => return Ok(Some(app)),
                Err(StoreError::Corrupt { path, reason }) => {
                    log::warn!("event=corrupt_document path={} reason={reason}", path.display());
                    let message = format!(
                        "{} cannot be read: {reason}. Press y to reset it to an empty document.",
                        path.display()
                    );
                    let confirmed = ConfirmView::new("Data file corrupt", message, self.theme.clone())?.run()?;
                    if !confirmed {
                        return Ok(None);
                    }

                    if path == self.config.timetable_path() {
                        TimetableStore::reset(Box::new(self.repository.clone()))?;
                    } else {
                        NotesStore::reset(Box::new(self.repository.clone()))?;
                    }
                }
                Err(e) => return Err(e).context("failed to open the timetable"),
            }
        }
    }
}

/// Screen to return to when the user keeps a corrupt file. A session that
/// started on the calendar goes back to it; one that started on the
/// timetable has nothing to show and ends.
fn screen_after_declined_reset(start: Screen) -> Option<Screen> {
    match start {
        Screen::Calendar => Some(Screen::Calendar),
        Screen::Timetable => None,
    }
}

/// Parses `YYYY-MM` into a year and month.
pub fn parse_month(value: &str) -> anyhow::Result<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .with_context(|| format!("invalid month {value:?}, expected YYYY-MM"))?;
    Ok((date.year(), date.month()))
}

/// Zero-based school-day column for `mon`..`fri` or `1`..`5`.
pub fn parse_weekday(value: &str) -> anyhow::Result<usize> {
    let weekday = match value.to_lowercase().as_str() {
        "mon" | "monday" | "1" => 0,
        "tue" | "tuesday" | "2" => 1,
        "wed" | "wednesday" | "3" => 2,
        "thu" | "thursday" | "4" => 3,
        "fri" | "friday" | "5" => 4,
        _ => bail!("invalid weekday {value:?}, expected mon..fri or 1..5"),
    };
    Ok(weekday)
}

/// Cell from a 1-based period and a weekday argument.
pub fn parse_cell(period: usize, weekday: &str) -> anyhow::Result<CellId> {
    let weekday = parse_weekday(weekday)?;
    let Some(period) = period.checked_sub(1) else {
        bail!("invalid period 0, expected 1..4");
    };
    Ok(CellId::new(period, weekday)?)
}
