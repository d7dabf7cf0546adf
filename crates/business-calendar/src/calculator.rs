//! Business-day arithmetic over a resolved [`CalendarRuleSet`].
//!
//! Every function here is pure: the result depends only on the explicit
//! arguments. Intervals follow an exclusive-start, inclusive-end convention,
//! i.e. `(start, end]`.

use std::ops::Bound::{Excluded, Included, Unbounded};

use chrono::{Days, NaiveDate};

use crate::error::{CalendarError, Result};
use crate::rules::CalendarRuleSet;

/// Is `date` a business day under `rules`?
///
/// Makeup days are checked first and always win. Otherwise a date is a
/// business day when it is neither a weekend day nor a holiday.
pub fn is_business_day(date: NaiveDate, rules: &CalendarRuleSet) -> bool {
    if rules.is_makeup_day(date) {
        return true;
    }
    !rules.is_weekend(date) && !rules.is_holiday(date)
}

/// Count business days in `(start, end]`.
///
/// `start` itself is never counted; `end` is counted when it is a business
/// day. `start == end` yields 0. When `start > end` the result is the
/// negated count over `(end, start]`, so
/// `days_between(a, b) == -days_between(b, a)` always holds.
///
/// Runs in time proportional to the number of holidays and makeup days in
/// range rather than the number of calendar days; the result is identical to
/// [`days_between_enumerated`].
pub fn days_between(start: NaiveDate, end: NaiveDate, rules: &CalendarRuleSet) -> i64 {
    if start > end {
        return -days_between(end, start, rules);
    }

    let span = (end - start).num_days();
    let full_weeks = span / 7;
    let remainder = span % 7;
    let weekend = rules.weekend_days();

    // Days that fall outside the weekend. The leftover days after the full
    // weeks share their weekdays with the first `remainder` days of the range.
    let working_per_week = 7 - i64::from(weekend.len());
    let leftover = (1..=remainder)
        .filter(|&offset| !rules.is_weekend(start + Days::new(offset as u64)))
        .count() as i64;
    let mut count = full_weeks * working_per_week + leftover;

    // Holidays on working weekdays remove a day.
    count -= rules
        .holidays()
        .range((Excluded(start), Included(end)))
        .filter(|&&date| !rules.is_weekend(date))
        .count() as i64;

    // Makeup days add back any date that would otherwise be off.
    count += rules
        .makeup_days()
        .range((Excluded(start), Included(end)))
        .filter(|&&date| rules.is_weekend(date) || rules.is_holiday(date))
        .count() as i64;

    count
}

/// Reference implementation of [`days_between`]: walk `(start, end]` one
/// calendar day at a time.
pub fn days_between_enumerated(start: NaiveDate, end: NaiveDate, rules: &CalendarRuleSet) -> i64 {
    if start > end {
        return -days_between_enumerated(end, start, rules);
    }

    let mut count = 0;
    let mut current = start;
    while current < end {
        // `current < end` guarantees a successor exists.
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if is_business_day(current, rules) {
            count += 1;
        }
    }
    count
}

/// Find the date `count` business days strictly after `start`.
///
/// `count == 0` returns `start` unchanged, whether or not it is a business
/// day.
///
/// # Errors
/// Returns `CalendarError::InvalidArgument` if `count` is negative.
/// Returns `CalendarError::UnsatisfiableCalendar` if the rule set cannot
/// supply `count` business days: either no weekday is a working day and too
/// few makeup days follow `start`, or the scan runs past the bound of
/// `7 × (count + holidays + 1)` days or past the last representable date.
pub fn project_business_date(
    start: NaiveDate,
    count: i64,
    rules: &CalendarRuleSet,
) -> Result<NaiveDate> {
    if count < 0 {
        return Err(CalendarError::InvalidArgument(format!(
            "business day count must be non-negative, got {}",
            count
        )));
    }
    if count == 0 {
        return Ok(start);
    }

    // With a seven-day weekend only makeup days are business days, so the
    // answer is read straight from the makeup set.
    if rules.weekend_days().is_full_week() {
        let mut after_start = rules.makeup_days().range((Excluded(start), Unbounded));
        let scanned_days = rules
            .makeup_days()
            .last()
            .filter(|&&last| last > start)
            .map(|&last| (last - start).num_days())
            .unwrap_or(0);
        return usize::try_from(count - 1)
            .ok()
            .and_then(|n| after_start.nth(n))
            .copied()
            .ok_or_else(|| unsatisfiable(count, scanned_days, rules));
    }

    // Every run of seven days holds at least one working weekday, and each
    // holiday can cancel at most one of them.
    let holidays = i64::try_from(rules.holidays().len()).unwrap_or(i64::MAX);
    let scan_bound = count
        .saturating_add(holidays)
        .saturating_add(1)
        .saturating_mul(7);

    let mut current = start;
    let mut found = 0;
    let mut scanned_days = 0;
    while scanned_days < scan_bound {
        current = current
            .succ_opt()
            .ok_or_else(|| unsatisfiable(count, scanned_days, rules))?;
        scanned_days += 1;

        if is_business_day(current, rules) {
            found += 1;
            if found == count {
                return Ok(current);
            }
        }
    }

    Err(unsatisfiable(count, scanned_days, rules))
}

fn unsatisfiable(count: i64, scanned_days: i64, rules: &CalendarRuleSet) -> CalendarError {
    CalendarError::UnsatisfiableCalendar {
        count,
        scanned_days,
        rules: rules.summary(),
    }
}
