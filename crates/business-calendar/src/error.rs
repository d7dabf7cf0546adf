//! Error types for calendar resolution and business-day arithmetic.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Unknown calendar: {0}")]
    UnknownCalendar(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Forward projection cannot find enough business days.
    /// `rules` is a one-line summary of the offending rule set.
    #[error(
        "Unsatisfiable calendar: no {count} business days found within {scanned_days} days ({rules})"
    )]
    UnsatisfiableCalendar {
        count: i64,
        scanned_days: i64,
        rules: String,
    },

    #[error("Override file {}: {source}", path.display())]
    OverrideIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
