//! JSON calculation requests.
//!
//! A request names an operation, a start date, and either literal
//! `calendar_rules` or a list of `calendar_ids` to resolve and union:
//!
//! ```json
//! {
//!   "operation": "get_future_date",
//!   "start_date": "2024-10-14",
//!   "business_days": 5,
//!   "calendar_ids": ["US", "X-CORP"]
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculator::{days_between, project_business_date};
use crate::error::{CalendarError, Result};
use crate::overrides::OverrideStore;
use crate::provider::HolidayProvider;
use crate::resolver::CalendarResolver;
use crate::rules::CalendarRuleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Count business days in `(start_date, end_date]`.
    DaysBetween,
    /// Project `business_days` business days forward from `start_date`.
    #[serde(rename = "get_future_date")]
    FutureDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub operation: Operation,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Raw JSON; must hold a non-negative integer.
    #[serde(default)]
    pub business_days: Option<serde_json::Value>,
    #[serde(default)]
    pub calendar_rules: Option<CalendarRuleSet>,
    #[serde(default)]
    pub calendar_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// The rule set the calculation ran against.
    pub calendar_rules: CalendarRuleSet,
}

impl CalculationRequest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run the request.
    ///
    /// Non-empty `calendar_ids` take precedence over `calendar_rules`. A
    /// `days_between` request needs `end_date` strictly after `start_date`.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidArgument` for missing or malformed
    /// fields, `CalendarError::UnknownCalendar` for an unresolvable id, and
    /// `CalendarError::UnsatisfiableCalendar` when projection cannot finish.
    pub fn evaluate<P, O>(&self, resolver: &CalendarResolver<'_, P, O>) -> Result<CalculationResponse>
    where
        P: HolidayProvider + ?Sized,
        O: OverrideStore + ?Sized,
    {
        let rules = match (&self.calendar_ids, &self.calendar_rules) {
            (Some(ids), _) if !ids.is_empty() => resolver.resolve_all(ids.as_slice())?,
            (_, Some(rules)) => rules.clone(),
            _ => {
                return Err(CalendarError::InvalidArgument(
                    "calendar_rules or calendar_ids is required".to_string(),
                ))
            }
        };
        let start_date = parse_date("start_date", &self.start_date)?;

        match self.operation {
            Operation::DaysBetween => {
                let raw_end = self.end_date.as_deref().ok_or_else(|| {
                    CalendarError::InvalidArgument(
                        "end_date is required for days_between operation".to_string(),
                    )
                })?;
                let end_date = parse_date("end_date", raw_end)?;
                if end_date <= start_date {
                    return Err(CalendarError::InvalidArgument(
                        "end_date must be after start_date".to_string(),
                    ));
                }
                Ok(CalculationResponse {
                    business_days: Some(days_between(start_date, end_date, &rules)),
                    future_date: None,
                    start_date,
                    end_date: Some(end_date),
                    calendar_rules: rules,
                })
            }
            Operation::FutureDate => {
                let raw_count = self.business_days.as_ref().ok_or_else(|| {
                    CalendarError::InvalidArgument(
                        "business_days is required for get_future_date operation".to_string(),
                    )
                })?;
                let count = raw_count.as_i64().filter(|&n| n >= 0).ok_or_else(|| {
                    CalendarError::InvalidArgument(
                        "business_days must be a non-negative integer".to_string(),
                    )
                })?;
                let future_date = project_business_date(start_date, count, &rules)?;
                Ok(CalculationResponse {
                    business_days: Some(count),
                    future_date: Some(future_date),
                    start_date,
                    end_date: None,
                    calendar_rules: rules,
                })
            }
        }
    }
}

/// Parse a `YYYY-MM-DD` date, naming `field` in the error.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        CalendarError::InvalidArgument(format!("Invalid {} format: {}", field, raw))
    })
}
