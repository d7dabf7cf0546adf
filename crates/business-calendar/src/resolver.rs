//! Calendar rule resolution: provider holidays merged with user overrides.
//!
//! Resolution starts from a Saturday/Sunday weekend, unions in whatever the
//! [`HolidayProvider`] knows about the identifier, then applies the
//! [`OverrideStore`] entry if one exists:
//!
//! 1. `weekend_days` replaces the weekend outright.
//! 2. A non-empty `holidays` list is unioned into the holidays. An empty or
//!    absent list changes nothing.
//! 3. `makeup_days` is unioned into the makeup days.
//!
//! Overrides only ever add dates; nothing the provider reports is removed.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{CalendarError, Result};
use crate::overrides::OverrideStore;
use crate::provider::{CalendarInfo, HolidayProvider};
use crate::rules::{CalendarRuleSet, WeekendDays};

/// Resolves calendar identifiers against one provider and one override
/// snapshot. Cheap to build; construct one per snapshot.
pub struct CalendarResolver<'a, P: ?Sized, O: ?Sized> {
    provider: &'a P,
    overrides: &'a O,
}

impl<'a, P, O> CalendarResolver<'a, P, O>
where
    P: HolidayProvider + ?Sized,
    O: OverrideStore + ?Sized,
{
    pub fn new(provider: &'a P, overrides: &'a O) -> Self {
        CalendarResolver {
            provider,
            overrides,
        }
    }

    /// Produce the rule set for `id`.
    ///
    /// # Errors
    /// Returns `CalendarError::UnknownCalendar` if neither the provider nor
    /// the override store knows `id`.
    pub fn resolve(&self, id: &str) -> Result<CalendarRuleSet> {
        let provider_holidays = self.provider.holidays_for(id);
        let entry = self.overrides.override_for(id);

        let mut holidays = match (provider_holidays, entry) {
            (Some(holidays), _) => holidays,
            (None, Some(_)) => {
                debug!("Calendar '{}' not known to the holiday provider", id);
                BTreeSet::new()
            }
            (None, None) => return Err(CalendarError::UnknownCalendar(id.to_string())),
        };
        let mut weekend_days = WeekendDays::default();
        let mut makeup_days = BTreeSet::new();

        if let Some(entry) = entry {
            if let Some(weekend) = entry.weekend_days {
                weekend_days = weekend;
            }
            if let Some(extra) = entry.holidays.as_deref().filter(|extra| !extra.is_empty()) {
                holidays.extend(extra.iter().copied());
            }
            if let Some(makeup) = &entry.makeup_days {
                makeup_days.extend(makeup.iter().copied());
            }
            debug!(
                "Applied override for '{}': weekend={:?}, {} holidays, {} makeup days",
                id,
                weekend_days,
                holidays.len(),
                makeup_days.len()
            );
        }

        Ok(CalendarRuleSet::new(weekend_days, holidays, makeup_days))
    }

    /// Resolve several identifiers and union the results.
    ///
    /// See [`CalendarRuleSet::union`] for how rule sets combine.
    pub fn resolve_all<S: AsRef<str>>(&self, ids: &[S]) -> Result<CalendarRuleSet> {
        let rule_sets = ids
            .iter()
            .map(|id| self.resolve(id.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(CalendarRuleSet::union(rule_sets))
    }

    /// Every identifier known to the provider or the override store, sorted
    /// by id.
    ///
    /// An override's `display_name` takes precedence over the provider's name.
    /// Override-only calendars without a `display_name` are named by their id.
    pub fn list_calendars(&self) -> Vec<CalendarInfo> {
        let mut names: BTreeMap<String, String> = self
            .provider
            .calendars()
            .into_iter()
            .map(|info| (info.id, info.name))
            .collect();

        for id in self.overrides.override_ids() {
            let display_name = self
                .overrides
                .override_for(&id)
                .and_then(|entry| entry.display_name.clone());
            match display_name {
                Some(name) => {
                    names.insert(id, name);
                }
                None => {
                    names.entry(id.clone()).or_insert(id);
                }
            }
        }

        names
            .into_iter()
            .map(|(id, name)| CalendarInfo { id, name })
            .collect()
    }
}
