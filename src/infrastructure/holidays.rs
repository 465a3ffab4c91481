//! Public holiday lookup.
//!
//! [`JapaneseHolidays`] follows the National Holidays Act from its enactment
//! on 1948-07-20:
//! * fixed-date holidays, moved around as the law changed
//! * "Happy Monday" holidays (Coming of Age, Marine, Respect for the Aged,
//!   Sports Day)
//! * vernal and autumnal equinox days from the astronomical approximation,
//!   valid for 1900-2150
//! * one-off imperial ceremonies and the 2020/2021 Olympic reshuffle
//! * substitute holidays (from 1973-04-12) and citizens' holidays sandwiched
//!   between two holidays (from 1985-12-27)

use chrono::{Datelike, NaiveDate, Weekday};

/// Answers whether a date is a public holiday.
pub trait HolidayOracle: Send + Sync {
    fn holiday_name(&self, date: NaiveDate) -> Option<&'static str>;

    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }
}

/// Oracle for calendars without public holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayOracle for NoHolidays {
    fn holiday_name(&self, _date: NaiveDate) -> Option<&'static str> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JapaneseHolidays;

const SUBSTITUTE_HOLIDAY: &str = "Substitute Holiday";
const CITIZENS_HOLIDAY: &str = "Citizens' Holiday";

impl HolidayOracle for JapaneseHolidays {
    fn holiday_name(&self, date: NaiveDate) -> Option<&'static str> {
        if let Some(name) = statutory_holiday(date) {
            return Some(name);
        }
        if is_substitute_holiday(date) {
            return Some(SUBSTITUTE_HOLIDAY);
        }
        if is_citizens_holiday(date) {
            return Some(CITIZENS_HOLIDAY);
        }
        None
    }
}

type Ymd = (i32, u32, u32);

const ACT_ENACTED: Ymd = (1948, 7, 20);
const SUBSTITUTES_FROM: Ymd = (1973, 4, 12);
const EXTENDED_SUBSTITUTES_FROM: Ymd = (2007, 1, 1);
const CITIZENS_HOLIDAYS_FROM: Ymd = (1985, 12, 27);

fn ymd(date: NaiveDate) -> Ymd {
    (date.year(), date.month(), date.day())
}

fn nth_monday(year: i32, month: u32, n: u8) -> Option<u32> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, n).map(|date| date.day())
}

fn vernal_equinox_day(year: i32) -> Option<u32> {
    let base = match year {
        1900..=1979 => 20.8357,
        1980..=2099 => 20.8431,
        2100..=2150 => 21.8510,
        _ => return None,
    };
    Some(equinox(year, base))
}

fn autumnal_equinox_day(year: i32) -> Option<u32> {
    let base = match year {
        1900..=1979 => 23.2588,
        1980..=2099 => 23.2488,
        2100..=2150 => 24.2488,
        _ => return None,
    };
    Some(equinox(year, base))
}

fn equinox(year: i32, base: f64) -> u32 {
    let leap_correction = if year < 1980 {
        (year - 1983) / 4
    } else {
        (year - 1980) / 4
    };
    (base + 0.242194 * f64::from(year - 1980) - f64::from(leap_correction)) as u32
}

/// Holidays named by the act itself, excluding substitute and citizens'
/// holidays.
fn statutory_holiday(date: NaiveDate) -> Option<&'static str> {
    let (year, month, day) = ymd(date);
    if (year, month, day) < ACT_ENACTED {
        return None;
    }

    if let Some(name) = ceremonial_holiday(year, month, day) {
        return Some(name);
    }

    match month {
        1 if day == 1 => Some("New Year's Day"),
        1 if year <= 1999 && day == 15 => Some("Coming of Age Day"),
        1 if year >= 2000 && Some(day) == nth_monday(year, 1, 2) => Some("Coming of Age Day"),
        2 if year >= 1967 && day == 11 => Some("National Foundation Day"),
        2 if year >= 2020 && day == 23 => Some("Emperor's Birthday"),
        3 if Some(day) == vernal_equinox_day(year) => Some("Vernal Equinox Day"),
        4 if day == 29 => Some(match year {
            2007.. => "Showa Day",
            1989.. => "Greenery Day",
            _ => "Emperor's Birthday",
        }),
        5 if day == 3 => Some("Constitution Memorial Day"),
        5 if year >= 2007 && day == 4 => Some("Greenery Day"),
        5 if day == 5 => Some("Children's Day"),
        7 => match year {
            1996..=2002 if day == 20 => Some("Marine Day"),
            2020 if day == 23 => Some("Marine Day"),
            2020 if day == 24 => Some("Sports Day"),
            2021 if day == 22 => Some("Marine Day"),
            2021 if day == 23 => Some("Sports Day"),
            2003.. if year != 2020 && year != 2021 && Some(day) == nth_monday(year, 7, 3) => {
                Some("Marine Day")
            }
            _ => None,
        },
        8 => match year {
            2020 if day == 10 => Some("Mountain Day"),
            2021 if day == 8 => Some("Mountain Day"),
            2016.. if year != 2020 && year != 2021 && day == 11 => Some("Mountain Day"),
            _ => None,
        },
        9 if (1966..=2002).contains(&year) && day == 15 => Some("Respect for the Aged Day"),
        9 if year >= 2003 && Some(day) == nth_monday(year, 9, 3) => {
            Some("Respect for the Aged Day")
        }
        9 if Some(day) == autumnal_equinox_day(year) => Some("Autumnal Equinox Day"),
        10 if (1966..=1999).contains(&year) && day == 10 => Some("Sports Day"),
        10 if year >= 2000 && year != 2020 && year != 2021 && Some(day) == nth_monday(year, 10, 2) => {
            Some("Sports Day")
        }
        11 if day == 3 => Some("Culture Day"),
        11 if day == 23 => Some("Labour Thanksgiving Day"),
        12 if (1989..=2018).contains(&year) && day == 23 => Some("Emperor's Birthday"),
        _ => None,
    }
}

fn ceremonial_holiday(year: i32, month: u32, day: u32) -> Option<&'static str> {
    match (year, month, day) {
        (1959, 4, 10) => Some("Wedding of Crown Prince Akihito"),
        (1989, 2, 24) => Some("Funeral of Emperor Showa"),
        (1990, 11, 12) => Some("Enthronement Ceremony"),
        (1993, 6, 9) => Some("Wedding of Crown Prince Naruhito"),
        (2019, 5, 1) => Some("Enthronement Day"),
        (2019, 10, 22) => Some("Enthronement Ceremony"),
        _ => None,
    }
}

/// Before 2007 only the Monday after a Sunday holiday; since 2007 the first
/// non-holiday after a Sunday holiday, however many holidays follow it.
fn is_substitute_holiday(date: NaiveDate) -> bool {
    if ymd(date) < SUBSTITUTES_FROM || statutory_holiday(date).is_some() {
        return false;
    }

    if ymd(date) < EXTENDED_SUBSTITUTES_FROM {
        return date.weekday() == Weekday::Mon
            && date.pred_opt().and_then(statutory_holiday).is_some();
    }

    let mut cursor = date.pred_opt();
    while let Some(day) = cursor {
        if statutory_holiday(day).is_none() {
            return false;
        }
        if day.weekday() == Weekday::Sun {
            return true;
        }
        cursor = day.pred_opt();
    }
    false
}

fn is_citizens_holiday(date: NaiveDate) -> bool {
    if ymd(date) < CITIZENS_HOLIDAYS_FROM || date.weekday() == Weekday::Sun {
        return false;
    }
    if statutory_holiday(date).is_some() {
        return false;
    }

    let before = date.pred_opt().and_then(statutory_holiday);
    let after = date.succ_opt().and_then(statutory_holiday);
    before.is_some() && after.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn name(y: i32, m: u32, d: u32) -> Option<&'static str> {
        JapaneseHolidays.holiday_name(date(y, m, d))
    }

    #[test]
    fn fixed_date_holidays() {
        assert_eq!(name(2024, 1, 1), Some("New Year's Day"));
        assert_eq!(name(2024, 2, 23), Some("Emperor's Birthday"));
        assert_eq!(name(2024, 5, 3), Some("Constitution Memorial Day"));
        assert_eq!(name(2024, 11, 3), Some("Culture Day"));
        assert_eq!(name(2018, 12, 23), Some("Emperor's Birthday"));
        assert_eq!(name(2019, 12, 23), None);
    }

    #[test]
    fn april_29_was_renamed() {
        assert_eq!(name(1988, 4, 29), Some("Emperor's Birthday"));
        assert_eq!(name(2000, 4, 29), Some("Greenery Day"));
        assert_eq!(name(2024, 4, 29), Some("Showa Day"));
    }

    #[test]
    fn happy_monday_holidays() {
        assert_eq!(name(2024, 1, 8), Some("Coming of Age Day"));
        assert_eq!(name(1999, 1, 15), Some("Coming of Age Day"));
        assert_eq!(name(2024, 9, 16), Some("Respect for the Aged Day"));
        assert_eq!(name(2026, 10, 12), Some("Sports Day"));
        assert_eq!(name(2024, 7, 15), Some("Marine Day"));
    }

    #[test]
    fn equinoxes() {
        assert_eq!(name(2024, 3, 20), Some("Vernal Equinox Day"));
        assert_eq!(name(2025, 3, 20), Some("Vernal Equinox Day"));
        assert_eq!(name(2024, 9, 22), Some("Autumnal Equinox Day"));
        assert_eq!(name(2015, 9, 23), Some("Autumnal Equinox Day"));
    }

    #[test]
    fn olympic_reshuffle() {
        assert_eq!(name(2020, 7, 23), Some("Marine Day"));
        assert_eq!(name(2020, 7, 24), Some("Sports Day"));
        assert_eq!(name(2020, 8, 10), Some("Mountain Day"));
        assert_eq!(name(2020, 10, 12), None);
        assert_eq!(name(2021, 7, 22), Some("Marine Day"));
        assert_eq!(name(2021, 8, 8), Some("Mountain Day"));
    }

    #[test]
    fn substitute_holidays() {
        // Sunday holidays move to the next free day
        assert_eq!(name(2024, 2, 12), Some(SUBSTITUTE_HOLIDAY));
        assert_eq!(name(2024, 9, 23), Some(SUBSTITUTE_HOLIDAY));
        assert_eq!(name(2021, 8, 9), Some(SUBSTITUTE_HOLIDAY));
        // Golden Week: Sunday 2008-05-04 pushes the substitute past Children's Day
        assert_eq!(name(2008, 5, 6), Some(SUBSTITUTE_HOLIDAY));
        assert_eq!(name(2019, 5, 6), Some(SUBSTITUTE_HOLIDAY));
    }

    #[test]
    fn citizens_holidays() {
        assert_eq!(name(2019, 4, 30), Some(CITIZENS_HOLIDAY));
        assert_eq!(name(2019, 5, 1), Some("Enthronement Day"));
        assert_eq!(name(2019, 5, 2), Some(CITIZENS_HOLIDAY));
        assert_eq!(name(2015, 9, 22), Some(CITIZENS_HOLIDAY));
    }

    #[test]
    fn ordinary_days() {
        assert!(!JapaneseHolidays.is_holiday(date(2024, 6, 10)));
        assert!(!JapaneseHolidays.is_holiday(date(2026, 10, 19)));
        assert!(!JapaneseHolidays.is_holiday(date(1948, 1, 1)));
        assert!(!NoHolidays.is_holiday(date(2024, 1, 1)));
    }
}
