//! Rule-computed holiday data for a few bundled jurisdictions.
//!
//! Holidays are generated for an inclusive window of years. Both the actual
//! date and the observed/substitute date are included when a holiday is
//! moved off a weekend.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};

use crate::error::{CalendarError, Result};
use crate::provider::{CalendarInfo, HolidayProvider};

/// First and last years the Gregorian rules below are valid for.
const EARLIEST_YEAR: i32 = 1583;
const LATEST_YEAR: i32 = 9999;

type YearRule = fn(i32) -> Vec<NaiveDate>;

const JURISDICTIONS: &[(&str, &str, YearRule)] = &[
    ("DE", "Germany", germany),
    ("GB", "United Kingdom", united_kingdom),
    ("US", "United States", united_states),
];

/// Holiday provider computing US, GB and DE holidays for a window of years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinProvider {
    years: RangeInclusive<i32>,
}

impl BuiltinProvider {
    /// Provider for the years `first_year..=last_year`.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidArgument` if the window is empty or
    /// falls outside 1583–9999.
    pub fn new(first_year: i32, last_year: i32) -> Result<Self> {
        if first_year > last_year {
            return Err(CalendarError::InvalidArgument(format!(
                "year window {}..={} is empty",
                first_year, last_year
            )));
        }
        if first_year < EARLIEST_YEAR || last_year > LATEST_YEAR {
            return Err(CalendarError::InvalidArgument(format!(
                "year window {}..={} outside supported range {}..={}",
                first_year, last_year, EARLIEST_YEAR, LATEST_YEAR
            )));
        }
        Ok(BuiltinProvider {
            years: first_year..=last_year,
        })
    }

    /// The current local year and the next one.
    pub fn current() -> Result<Self> {
        let year = Local::now().year();
        Self::new(year, year + 1)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.years.clone()
    }
}

impl HolidayProvider for BuiltinProvider {
    fn holidays_for(&self, id: &str) -> Option<BTreeSet<NaiveDate>> {
        let (_, _, rule) = JURISDICTIONS.iter().find(|(code, _, _)| *code == id)?;
        Some(self.years.clone().flat_map(rule).collect())
    }

    fn calendars(&self) -> Vec<CalendarInfo> {
        JURISDICTIONS
            .iter()
            .map(|(code, name, _)| CalendarInfo::new(*code, *name))
            .collect()
    }
}

/// Federal holidays, with the Friday/Monday observance for fixed dates.
fn united_states(year: i32) -> Vec<NaiveDate> {
    let mut fixed = vec![ymd(year, 1, 1), ymd(year, 7, 4), ymd(year, 11, 11), ymd(year, 12, 25)];
    if year >= 2021 {
        fixed.push(ymd(year, 6, 19));
    }

    let mut days: Vec<NaiveDate> = fixed
        .into_iter()
        .flatten()
        .flat_map(|date| [date, nearest_weekday(date)])
        .collect();

    let mut floating = vec![
        nth_weekday(year, 2, Weekday::Mon, 3),
        last_weekday(year, 5, Weekday::Mon),
        nth_weekday(year, 9, Weekday::Mon, 1),
        nth_weekday(year, 10, Weekday::Mon, 2),
        nth_weekday(year, 11, Weekday::Thu, 4),
    ];
    if year >= 1986 {
        floating.push(nth_weekday(year, 1, Weekday::Mon, 3));
    }
    days.extend(floating.into_iter().flatten());
    days
}

/// England & Wales bank holidays.
fn united_kingdom(year: i32) -> Vec<NaiveDate> {
    let mut days = Vec::new();

    if let Some(new_year) = ymd(year, 1, 1) {
        days.push(new_year);
        days.push(following_weekday(new_year));
    }

    if let Some(easter) = easter_sunday(year) {
        days.extend(easter.checked_sub_days(Days::new(2)));
        days.extend(easter.checked_add_days(Days::new(1)));
    }

    // Early May: moved to VE Day in 2020.
    days.extend(match year {
        2020 => ymd(2020, 5, 8),
        _ => nth_weekday(year, 5, Weekday::Mon, 1),
    });

    // Spring: moved for the 2002, 2012 and 2022 jubilees.
    days.extend(match year {
        2002 | 2012 => ymd(year, 6, 4),
        2022 => ymd(2022, 6, 2),
        _ => last_weekday(year, 5, Weekday::Mon),
    });

    days.extend(last_weekday(year, 8, Weekday::Mon));

    if let (Some(christmas), Some(boxing_day)) = (ymd(year, 12, 25), ymd(year, 12, 26)) {
        days.push(christmas);
        days.push(boxing_day);
        let substitutes: &[u32] = match christmas.weekday() {
            Weekday::Fri => &[28],
            Weekday::Sat => &[27, 28],
            Weekday::Sun => &[27],
            _ => &[],
        };
        days.extend(substitutes.iter().filter_map(|&day| ymd(year, 12, day)));
    }

    let one_off: &[(i32, u32, u32)] = &[
        (1999, 12, 31),
        (2002, 6, 3),
        (2011, 4, 29),
        (2012, 6, 5),
        (2022, 6, 3),
        (2022, 9, 19),
        (2023, 5, 8),
    ];
    days.extend(
        one_off
            .iter()
            .filter(|(y, _, _)| *y == year)
            .filter_map(|&(y, m, d)| ymd(y, m, d)),
    );

    days
}

/// Nationwide German public holidays.
fn germany(year: i32) -> Vec<NaiveDate> {
    let mut days = vec![
        ymd(year, 1, 1),
        ymd(year, 5, 1),
        ymd(year, 12, 25),
        ymd(year, 12, 26),
    ];

    if let Some(easter) = easter_sunday(year) {
        days.push(easter.checked_sub_days(Days::new(2)));
        days.push(easter.checked_add_days(Days::new(1)));
        days.push(easter.checked_add_days(Days::new(39)));
        days.push(easter.checked_add_days(Days::new(50)));
    }

    match year {
        1954..=1989 => days.push(ymd(year, 6, 17)),
        1990.. => days.push(ymd(year, 10, 3)),
        _ => {}
    }
    if year == 2017 {
        days.push(ymd(2017, 10, 31));
    }

    days.into_iter().flatten().collect()
}

/// Easter Sunday by the anonymous Gregorian computus.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    ymd(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let next_month = if month == 12 {
        ymd(year + 1, 1, 1)
    } else {
        ymd(year, month + 1, 1)
    }?;
    let mut date = next_month.pred_opt()?;
    while date.weekday() != weekday {
        date = date.pred_opt()?;
    }
    Some(date)
}

/// Saturday moves back to Friday, Sunday forward to Monday.
fn nearest_weekday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date.pred_opt().unwrap_or(date),
        Weekday::Sun => date.succ_opt().unwrap_or(date),
        _ => date,
    }
}

/// Weekend dates move forward to the following Monday.
fn following_weekday(date: NaiveDate) -> NaiveDate {
    let mut current = date;
    while matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}
