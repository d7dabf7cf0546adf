//! # business-calendar
//!
//! Business-day counts and projected dates across regional calendars.
//!
//! Holiday data comes from a [`HolidayProvider`]; users layer custom weekends,
//! extra holidays and makeup working days on top through an override file.
//! The [`CalendarResolver`] merges the two into a self-contained
//! [`CalendarRuleSet`], and the [`calculator`] functions do date arithmetic
//! on that rule set alone.
//!
//! ## Quick start
//!
//! ```rust
//! use business_calendar::{
//!     days_between, project_business_date, CalendarResolver, OverrideSnapshot, StaticProvider,
//! };
//! use chrono::NaiveDate;
//!
//! let wednesday = NaiveDate::from_ymd_opt(2024, 10, 16).unwrap();
//! let provider = StaticProvider::new().with_calendar("XX", "Example", [wednesday]);
//! let overrides = OverrideSnapshot::new();
//! let rules = CalendarResolver::new(&provider, &overrides).resolve("XX").unwrap();
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 10, 14).unwrap();
//! let friday = NaiveDate::from_ymd_opt(2024, 10, 18).unwrap();
//! assert_eq!(days_between(monday, friday, &rules), 3);
//! assert_eq!(
//!     project_business_date(monday, 5, &rules).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 10, 22).unwrap()
//! );
//! ```
//!
//! ## Modules
//!
//! - [`rules`]: `CalendarRuleSet` and `WeekendDays` value types
//! - [`calculator`]: `is_business_day`, `days_between`, `project_business_date`
//! - [`resolver`]: provider + override merge, calendar listing
//! - [`provider`]: `HolidayProvider` trait and a literal-data provider
//! - [`builtin`]: rule-computed US, GB and DE holidays
//! - [`overrides`]: override file schema, snapshots and reload registry
//! - [`request`]: JSON calculation requests
//! - [`error`]: Error types

pub mod builtin;
pub mod calculator;
pub mod error;
pub mod overrides;
pub mod provider;
pub mod request;
pub mod resolver;
pub mod rules;

pub use builtin::BuiltinProvider;
pub use calculator::{days_between, is_business_day, project_business_date};
pub use error::CalendarError;
pub use overrides::{CalendarOverride, OverrideRegistry, OverrideSnapshot, OverrideStore};
pub use provider::{CalendarInfo, HolidayProvider, StaticProvider};
pub use request::{CalculationRequest, CalculationResponse, Operation};
pub use resolver::CalendarResolver;
pub use rules::{CalendarRuleSet, WeekendDays};
