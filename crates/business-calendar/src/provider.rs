//! Holiday-data providers.
//!
//! The resolver only sees the [`HolidayProvider`] trait. [`StaticProvider`]
//! serves literal data (fixtures, embedded tables) and
//! [`crate::builtin::BuiltinProvider`] computes holidays from rules.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A calendar identifier paired with its human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub name: String,
}

impl CalendarInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        CalendarInfo {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Read-only source of holiday dates keyed by calendar identifier.
pub trait HolidayProvider: Send + Sync {
    /// Holidays for `id`, or `None` when the provider does not know `id`.
    fn holidays_for(&self, id: &str) -> Option<BTreeSet<NaiveDate>>;

    /// Every identifier this provider recognizes, with a default name.
    fn calendars(&self) -> Vec<CalendarInfo>;
}

/// A provider backed by fixed, literal holiday lists.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    calendars: BTreeMap<String, (String, BTreeSet<NaiveDate>)>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a calendar.
    pub fn with_calendar<I>(mut self, id: &str, name: &str, holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.calendars.insert(
            id.to_string(),
            (name.to_string(), holidays.into_iter().collect()),
        );
        self
    }
}

impl HolidayProvider for StaticProvider {
    fn holidays_for(&self, id: &str) -> Option<BTreeSet<NaiveDate>> {
        self.calendars.get(id).map(|(_, holidays)| holidays.clone())
    }

    fn calendars(&self) -> Vec<CalendarInfo> {
        self.calendars
            .iter()
            .map(|(id, (name, _))| CalendarInfo::new(id.as_str(), name.as_str()))
            .collect()
    }
}
