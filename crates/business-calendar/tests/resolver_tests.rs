//! Tests for merging provider holidays with override entries.

use business_calendar::overrides::SAMPLE_OVERRIDES;
use business_calendar::{
    is_business_day, BuiltinProvider, CalendarError, CalendarInfo, CalendarOverride,
    CalendarResolver, HolidayProvider, OverrideSnapshot, OverrideStore, StaticProvider,
    WeekendDays,
};
use chrono::{Datelike, NaiveDate};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn weekend(indices: &[u8]) -> WeekendDays {
    WeekendDays::from_indices(indices.iter().copied()).unwrap()
}

/// Provider that knows `US` (new year only) and `GB` (no holidays).
fn provider() -> StaticProvider {
    StaticProvider::new()
        .with_calendar("US", "United States", [date(2024, 1, 1)])
        .with_calendar("GB", "United Kingdom", Vec::new())
}

fn with_override(id: &str, entry: CalendarOverride) -> OverrideSnapshot {
    OverrideSnapshot::new().with_override(id, entry)
}

// ── resolve: no override ────────────────────────────────────────────────────

#[test]
fn provider_only_calendar_uses_default_weekend() {
    let provider = provider();
    let overrides = OverrideSnapshot::new();
    let rules = CalendarResolver::new(&provider, &overrides).resolve("US").unwrap();

    assert_eq!(rules.weekend_days(), weekend(&[5, 6]));
    assert_eq!(rules.holidays().iter().copied().collect::<Vec<_>>(), vec![date(2024, 1, 1)]);
    assert!(rules.makeup_days().is_empty());
}

#[test]
fn unknown_everywhere_is_unknown_calendar() {
    let provider = provider();
    let overrides = OverrideSnapshot::new();
    let err = CalendarResolver::new(&provider, &overrides)
        .resolve("ZZ")
        .unwrap_err();
    match err {
        CalendarError::UnknownCalendar(id) => assert_eq!(id, "ZZ"),
        other => panic!("expected UnknownCalendar, got {:?}", other),
    }
}

// ── resolve: holiday merge asymmetry ────────────────────────────────────────

#[test]
fn empty_override_holidays_do_not_clear_provider_holidays() {
    let provider = provider();
    let overrides = with_override(
        "US",
        CalendarOverride {
            holidays: Some(vec![]),
            ..Default::default()
        },
    );
    let rules = CalendarResolver::new(&provider, &overrides).resolve("US").unwrap();
    assert!(rules.holidays().contains(&date(2024, 1, 1)));
    assert_eq!(rules.holidays().len(), 1);
}

#[test]
fn non_empty_override_holidays_are_added() {
    let provider = provider();
    let overrides = with_override(
        "US",
        CalendarOverride {
            holidays: Some(vec![date(2024, 7, 4)]),
            ..Default::default()
        },
    );
    let rules = CalendarResolver::new(&provider, &overrides).resolve("US").unwrap();
    assert!(rules.holidays().contains(&date(2024, 1, 1)));
    assert!(rules.holidays().contains(&date(2024, 7, 4)));
    assert_eq!(rules.holidays().len(), 2);
}

#[test]
fn absent_override_holidays_leave_provider_holidays() {
    let provider = provider();
    let overrides = with_override(
        "US",
        CalendarOverride {
            display_name: Some("Renamed".to_string()),
            ..Default::default()
        },
    );
    let rules = CalendarResolver::new(&provider, &overrides).resolve("US").unwrap();
    assert_eq!(rules.holidays().len(), 1);
    assert_eq!(rules.weekend_days(), weekend(&[5, 6]));
}

// ── resolve: weekend and makeup days ────────────────────────────────────────

#[test]
fn weekend_override_replaces_default() {
    let provider = provider();
    let overrides = with_override(
        "US",
        CalendarOverride {
            weekend_days: Some(weekend(&[4, 5])),
            ..Default::default()
        },
    );
    let rules = CalendarResolver::new(&provider, &overrides).resolve("US").unwrap();
    assert_eq!(rules.weekend_days().indices(), vec![4, 5]);
}

#[test]
fn empty_weekend_override_makes_every_weekday_working() {
    let provider = provider();
    let overrides = with_override(
        "GB",
        CalendarOverride {
            weekend_days: Some(WeekendDays::none()),
            ..Default::default()
        },
    );
    let rules = CalendarResolver::new(&provider, &overrides).resolve("GB").unwrap();
    assert!(rules.weekend_days().is_empty());
    assert!(is_business_day(date(2024, 10, 19), &rules));
}

#[test]
fn makeup_days_are_added_and_win() {
    let provider = provider();
    let overrides = with_override(
        "US",
        CalendarOverride {
            makeup_days: Some(vec![date(2024, 1, 1), date(2024, 2, 4)]),
            ..Default::default()
        },
    );
    let rules = CalendarResolver::new(&provider, &overrides).resolve("US").unwrap();
    assert_eq!(rules.makeup_days().len(), 2);
    // New Year's Day stays a holiday but the makeup entry wins.
    assert!(rules.is_holiday(date(2024, 1, 1)));
    assert!(is_business_day(date(2024, 1, 1), &rules));
    assert!(is_business_day(date(2024, 2, 4), &rules));
}

#[test]
fn empty_makeup_list_is_accepted() {
    let provider = provider();
    let overrides = with_override(
        "US",
        CalendarOverride {
            makeup_days: Some(vec![]),
            ..Default::default()
        },
    );
    let rules = CalendarResolver::new(&provider, &overrides).resolve("US").unwrap();
    assert!(rules.makeup_days().is_empty());
}

#[test]
fn override_only_calendar_starts_from_empty_holidays() {
    let provider = provider();
    let overrides = with_override(
        "X-CORP",
        CalendarOverride {
            holidays: Some(vec![date(2024, 12, 24)]),
            ..Default::default()
        },
    );
    let rules = CalendarResolver::new(&provider, &overrides)
        .resolve("X-CORP")
        .unwrap();
    assert_eq!(rules.holidays().iter().copied().collect::<Vec<_>>(), vec![date(2024, 12, 24)]);
    assert_eq!(rules.weekend_days(), WeekendDays::default());
}

#[test]
fn resolution_has_no_side_effects() {
    let provider = provider();
    let overrides = with_override(
        "US",
        CalendarOverride {
            holidays: Some(vec![date(2024, 7, 4)]),
            ..Default::default()
        },
    );
    let before = overrides.clone();
    let resolver = CalendarResolver::new(&provider, &overrides);

    let first = resolver.resolve("US").unwrap();
    let second = resolver.resolve("US").unwrap();

    assert_eq!(first, second);
    assert_eq!(overrides, before);
    assert_eq!(provider.holidays_for("US").unwrap().len(), 1);
}

#[test]
fn resolver_accepts_trait_objects() {
    let provider = provider();
    let overrides = OverrideSnapshot::new();
    let dyn_provider: &dyn HolidayProvider = &provider;
    let dyn_overrides: &dyn OverrideStore = &overrides;

    let rules = CalendarResolver::new(dyn_provider, dyn_overrides)
        .resolve("GB")
        .unwrap();
    assert!(rules.holidays().is_empty());
}

// ── resolve_all ─────────────────────────────────────────────────────────────

#[test]
fn resolve_all_unions_weekends_and_holidays() {
    let provider = provider();
    let overrides = with_override(
        "GB",
        CalendarOverride {
            weekend_days: Some(weekend(&[4, 5])),
            holidays: Some(vec![date(2024, 12, 26)]),
            makeup_days: Some(vec![date(2024, 2, 4)]),
            ..Default::default()
        },
    );
    let rules = CalendarResolver::new(&provider, &overrides)
        .resolve_all(&["US", "GB"])
        .unwrap();

    assert_eq!(rules.weekend_days().indices(), vec![4, 5, 6]);
    assert!(rules.is_holiday(date(2024, 1, 1)));
    assert!(rules.is_holiday(date(2024, 12, 26)));
    assert!(rules.is_makeup_day(date(2024, 2, 4)));
}

#[test]
fn resolve_all_fails_on_any_unknown_id() {
    let provider = provider();
    let overrides = OverrideSnapshot::new();
    let err = CalendarResolver::new(&provider, &overrides)
        .resolve_all(&["US", "NOPE"])
        .unwrap_err();
    assert!(matches!(err, CalendarError::UnknownCalendar(ref id) if id == "NOPE"));
}

// ── list_calendars ──────────────────────────────────────────────────────────

#[test]
fn list_merges_sources_sorted_by_id() {
    let provider = provider();
    let overrides = OverrideSnapshot::new()
        .with_override(
            "US",
            CalendarOverride {
                display_name: Some("US (Custom)".to_string()),
                ..Default::default()
            },
        )
        .with_override(
            "GB",
            CalendarOverride {
                holidays: Some(vec![date(2024, 12, 27)]),
                ..Default::default()
            },
        )
        .with_override(
            "CN",
            CalendarOverride {
                display_name: Some("China (National)".to_string()),
                ..Default::default()
            },
        )
        .with_override("ZZ", CalendarOverride::default());

    let calendars = CalendarResolver::new(&provider, &overrides).list_calendars();

    assert_eq!(
        calendars,
        vec![
            CalendarInfo::new("CN", "China (National)"),
            CalendarInfo::new("GB", "United Kingdom"),
            CalendarInfo::new("US", "US (Custom)"),
            CalendarInfo::new("ZZ", "ZZ"),
        ]
    );
}

#[test]
fn list_without_overrides_is_provider_list() {
    let provider = provider();
    let overrides = OverrideSnapshot::new();
    let calendars = CalendarResolver::new(&provider, &overrides).list_calendars();
    assert_eq!(calendars, provider.calendars());
}

// ── Built-in provider with the sample override file ─────────────────────────

#[test]
fn builtin_us_2024_federal_holidays() {
    let provider = BuiltinProvider::new(2024, 2024).unwrap();
    let overrides = OverrideSnapshot::new();
    let rules = CalendarResolver::new(&provider, &overrides).resolve("US").unwrap();

    for holiday in [
        date(2024, 1, 1),
        date(2024, 1, 15),
        date(2024, 2, 19),
        date(2024, 5, 27),
        date(2024, 6, 19),
        date(2024, 7, 4),
        date(2024, 9, 2),
        date(2024, 10, 14),
        date(2024, 11, 11),
        date(2024, 11, 28),
        date(2024, 12, 25),
    ] {
        assert!(rules.is_holiday(holiday), "missing US holiday {}", holiday);
    }
    assert!(!rules.is_holiday(date(2024, 3, 29)));
}

#[test]
fn builtin_gb_and_de_follow_easter() {
    let provider = BuiltinProvider::new(2024, 2025).unwrap();
    let gb = provider.holidays_for("GB").unwrap();
    assert!(gb.contains(&date(2024, 3, 29))); // Good Friday
    assert!(gb.contains(&date(2024, 4, 1))); // Easter Monday
    assert!(gb.contains(&date(2025, 4, 21)));

    let de = provider.holidays_for("DE").unwrap();
    assert!(de.contains(&date(2024, 5, 9))); // Ascension
    assert!(de.contains(&date(2024, 5, 20))); // Whit Monday
    assert!(de.contains(&date(2024, 10, 3)));
}

#[test]
fn builtin_window_limits_years() {
    let provider = BuiltinProvider::new(2025, 2025).unwrap();
    let us = provider.holidays_for("US").unwrap();
    assert!(us.iter().all(|d| d.year() == 2025));
    assert!(provider.holidays_for("CN").is_none());
}

#[test]
fn sample_overrides_make_china_sunday_a_business_day() {
    let provider = BuiltinProvider::new(2024, 2025).unwrap();
    let overrides = OverrideSnapshot::from_json_str(SAMPLE_OVERRIDES).unwrap();
    let resolver = CalendarResolver::new(&provider, &overrides);

    let cn = resolver.resolve("CN").unwrap();
    assert!(cn.holidays().is_empty());
    assert!(is_business_day(date(2024, 2, 4), &cn));

    let ids: Vec<String> = resolver.list_calendars().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["CN", "DE", "GB", "IN-AP", "IN-KA", "US", "X-CORP"]);
}
