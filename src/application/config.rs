use crate::infrastructure::{HolidayOracle, JapaneseHolidays, NOTES_FILE, NoHolidays, TIMETABLE_FILE};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayCalendar {
    Japan,
    None,
}

impl HolidayCalendar {
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "none" | "off" => Self::None,
            _ => Self::Japan, // default
        }
    }

    pub fn oracle(&self) -> Box<dyn HolidayOracle> {
        match self {
            Self::Japan => Box::new(JapaneseHolidays),
            Self::None => Box::new(NoHolidays),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Holds the timetable and notes files. Defaults to the working
    /// directory so the files keep their plain relative names.
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub theme: String,
    pub holidays: HolidayCalendar,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("ALMANAC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let log_dir = lookup("ALMANAC_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_local_dir()
                    .map(|dir| dir.join("almanac"))
                    .unwrap_or_else(|| data_dir.clone())
                    .join("logs")
            });

        let log_level = lookup("ALMANAC_LOG").unwrap_or_else(|| "info".to_string());
        let theme = lookup("ALMANAC_THEME").unwrap_or_else(|| "dark".to_string());
        let holidays = lookup("ALMANAC_HOLIDAYS")
            .map(|name| HolidayCalendar::by_name(&name))
            .unwrap_or(HolidayCalendar::Japan);

        Self {
            data_dir,
            log_dir,
            log_level,
            theme,
            holidays,
        }
    }

    pub fn timetable_path(&self) -> PathBuf {
        self.data_dir.join(TIMETABLE_FILE)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(NOTES_FILE)
    }
}
