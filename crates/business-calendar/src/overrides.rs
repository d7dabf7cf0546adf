//! User-supplied calendar overrides.
//!
//! The override file is a JSON object keyed by calendar identifier:
//!
//! ```json
//! {
//!   "CN": {
//!     "display_name": "China (National)",
//!     "holidays": [],
//!     "makeup_days": ["2024-02-04", "2024-02-18"]
//!   },
//!   "X-CORP": {
//!     "display_name": "INTERNAL - My Company Calendar",
//!     "weekend_days": [5, 6],
//!     "holidays": ["2024-12-24", "2024-12-31"]
//!   }
//! }
//! ```
//!
//! Every field is optional. An absent `holidays` and an empty one both add
//! nothing; neither clears provider holidays.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CalendarError, Result};
use crate::rules::WeekendDays;

/// Starter override file written by [`OverrideSnapshot::write_sample`].
pub const SAMPLE_OVERRIDES: &str = r#"{
  "IN-KA": {
    "display_name": "India - Karnataka (Custom Week)",
    "weekend_days": [5, 6]
  },
  "IN-AP": {
    "display_name": "India - Andhra Pradesh (Custom Week)",
    "weekend_days": [5, 6]
  },
  "CN": {
    "display_name": "China (National)",
    "holidays": [],
    "makeup_days": [
      "2024-02-04", "2024-02-18", "2024-04-28",
      "2024-05-11", "2024-09-29", "2024-10-12",
      "2025-01-26", "2025-02-08"
    ]
  },
  "X-CORP": {
    "display_name": "INTERNAL - My Company Calendar",
    "weekend_days": [5, 6],
    "holidays": ["2024-12-24", "2024-12-31", "2025-12-24", "2025-12-31"],
    "makeup_days": []
  }
}
"#;

/// Override entry for one calendar identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Replaces the weekend definition entirely when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekend_days: Option<WeekendDays>,
    /// Added to provider holidays when present and non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holidays: Option<Vec<NaiveDate>>,
    /// Added to the makeup-day set when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub makeup_days: Option<Vec<NaiveDate>>,
}

/// Read-only lookup of overrides by calendar identifier.
pub trait OverrideStore: Send + Sync {
    fn override_for(&self, id: &str) -> Option<&CalendarOverride>;

    /// Every identifier with an override entry, sorted.
    fn override_ids(&self) -> Vec<String>;
}

/// An immutable, fully-parsed override file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideSnapshot {
    entries: BTreeMap<String, CalendarOverride>,
}

impl OverrideSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the override for `id`.
    pub fn with_override(mut self, id: &str, entry: CalendarOverride) -> Self {
        self.entries.insert(id.to_string(), entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse override JSON.
    ///
    /// # Errors
    /// Returns `CalendarError::Json` for malformed JSON, bad dates, or
    /// weekday indices outside 0–6.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load an override file.
    ///
    /// # Errors
    /// Returns `CalendarError::OverrideIo` if the file cannot be read and
    /// `CalendarError::Json` if it is not a valid override file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CalendarError::OverrideIo {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json_str(&json)?;
        info!(
            "Loaded {} custom calendar configurations from {}",
            snapshot.len(),
            path.display()
        );
        Ok(snapshot)
    }

    /// Load an override file, treating a missing file as empty.
    pub fn load_if_exists(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No override file at {}, using none", path.display());
            return Ok(Self::new());
        }
        Self::load(path)
    }

    /// Load an override file, first writing [`SAMPLE_OVERRIDES`] there if it
    /// does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::write_sample(path)?;
        }
        Self::load(path)
    }

    /// Write [`SAMPLE_OVERRIDES`] to `path`, replacing any existing file.
    pub fn write_sample(path: &Path) -> Result<()> {
        std::fs::write(path, SAMPLE_OVERRIDES).map_err(|source| CalendarError::OverrideIo {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Created sample override file at {}", path.display());
        Ok(())
    }
}

impl OverrideStore for OverrideSnapshot {
    fn override_for(&self, id: &str) -> Option<&CalendarOverride> {
        self.entries.get(id)
    }

    fn override_ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Holds the current override snapshot and swaps in new ones atomically.
///
/// Readers take an `Arc` to a snapshot and keep using it for as long as they
/// need; a concurrent [`reload`](Self::reload) never changes data under them.
#[derive(Debug, Default)]
pub struct OverrideRegistry {
    current: RwLock<Arc<OverrideSnapshot>>,
}

impl OverrideRegistry {
    pub fn new(snapshot: OverrideSnapshot) -> Self {
        OverrideRegistry {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<OverrideSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install `snapshot`, returning the one it replaced.
    pub fn replace(&self, snapshot: OverrideSnapshot) -> Arc<OverrideSnapshot> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(snapshot))
    }

    /// Re-read `path` and install it. On error the current snapshot stays.
    pub fn reload(&self, path: &Path) -> Result<Arc<OverrideSnapshot>> {
        let snapshot = OverrideSnapshot::load(path)?;
        self.replace(snapshot);
        info!("Reloaded override file {}", path.display());
        Ok(self.snapshot())
    }
}
