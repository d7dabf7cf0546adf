//! Resolved calendar rules: weekend definition, holidays and makeup days.
//!
//! A [`CalendarRuleSet`] is a self-contained value. Once built it is never
//! mutated; every business-day computation in [`crate::calculator`] takes one
//! by reference and touches nothing else.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// Weekday indices that are non-working by default, 0 = Monday … 6 = Sunday.
///
/// Stored as a seven-bit mask. Serializes as a sorted list of indices, e.g.
/// `[5, 6]` for a Saturday/Sunday weekend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekendDays(u8);

impl WeekendDays {
    const ALL: u8 = 0b111_1111;

    /// Build a weekend from weekday indices. Duplicates are ignored.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidArgument` for an index outside `0..=6`.
    pub fn from_indices<I: IntoIterator<Item = u8>>(indices: I) -> Result<Self> {
        let mut mask = 0u8;
        for index in indices {
            if index > 6 {
                return Err(CalendarError::InvalidArgument(format!(
                    "weekday index {} out of range (0=Monday … 6=Sunday)",
                    index
                )));
            }
            mask |= 1u8 << index;
        }
        Ok(WeekendDays(mask))
    }

    /// A calendar where every weekday is a working day.
    pub fn none() -> Self {
        WeekendDays(0)
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0 & (1u8 << weekday.num_days_from_monday()) != 0
    }

    /// Sorted weekday indices in the weekend.
    pub fn indices(&self) -> Vec<u8> {
        (0u8..7).filter(|&i| self.0 & (1u8 << i) != 0).collect()
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when all seven weekdays are non-working.
    pub fn is_full_week(&self) -> bool {
        self.0 == Self::ALL
    }

    pub fn union(self, other: WeekendDays) -> WeekendDays {
        WeekendDays(self.0 | other.0)
    }
}

impl Default for WeekendDays {
    /// Saturday and Sunday.
    fn default() -> Self {
        WeekendDays((1 << 5) | (1 << 6))
    }
}

impl fmt::Debug for WeekendDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.indices()).finish()
    }
}

impl TryFrom<Vec<u8>> for WeekendDays {
    type Error = CalendarError;

    fn try_from(indices: Vec<u8>) -> Result<Self> {
        WeekendDays::from_indices(indices)
    }
}

impl From<WeekendDays> for Vec<u8> {
    fn from(days: WeekendDays) -> Self {
        days.indices()
    }
}

/// The fully-resolved rule set used for all date arithmetic.
///
/// Makeup days take precedence: a date listed in `makeup_days` is a business
/// day even when it is a weekend day or a holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRuleSet {
    #[serde(default = "WeekendDays::none")]
    weekend_days: WeekendDays,
    #[serde(default)]
    holidays: BTreeSet<NaiveDate>,
    #[serde(default)]
    makeup_days: BTreeSet<NaiveDate>,
}

impl CalendarRuleSet {
    pub fn new(
        weekend_days: WeekendDays,
        holidays: BTreeSet<NaiveDate>,
        makeup_days: BTreeSet<NaiveDate>,
    ) -> Self {
        CalendarRuleSet {
            weekend_days,
            holidays,
            makeup_days,
        }
    }

    pub fn weekend_days(&self) -> WeekendDays {
        self.weekend_days
    }

    pub fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    pub fn makeup_days(&self) -> &BTreeSet<NaiveDate> {
        &self.makeup_days
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend_days.contains(date.weekday())
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_makeup_day(&self, date: NaiveDate) -> bool {
        self.makeup_days.contains(&date)
    }

    /// Merge several rule sets into one for a team spanning calendars.
    ///
    /// A day is non-working if it is a weekend day or holiday in *any* of the
    /// inputs; makeup days are unioned as well. An empty input yields a rule
    /// set with no weekend, no holidays and no makeup days. A single input is
    /// returned as-is.
    pub fn union<I>(rule_sets: I) -> CalendarRuleSet
    where
        I: IntoIterator<Item = CalendarRuleSet>,
    {
        let mut iter = rule_sets.into_iter();
        let Some(mut merged) = iter.next() else {
            return CalendarRuleSet::new(WeekendDays::none(), BTreeSet::new(), BTreeSet::new());
        };

        for rules in iter {
            merged.weekend_days = merged.weekend_days.union(rules.weekend_days);
            merged.holidays.extend(rules.holidays);
            merged.makeup_days.extend(rules.makeup_days);
        }
        merged
    }

    /// One-line description used in error messages.
    pub fn summary(&self) -> String {
        format!(
            "weekend_days={:?}, {} holidays, {} makeup days",
            self.weekend_days.indices(),
            self.holidays.len(),
            self.makeup_days.len()
        )
    }
}

impl Default for CalendarRuleSet {
    /// Saturday/Sunday weekend with no holidays and no makeup days.
    fn default() -> Self {
        CalendarRuleSet::new(WeekendDays::default(), BTreeSet::new(), BTreeSet::new())
    }
}
