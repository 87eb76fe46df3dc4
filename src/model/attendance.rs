use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::{IntoParams, ToSchema};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn allowed_message() -> String {
        use strum::IntoEnumIterator;
        let names = Self::iter().map(|s| s.to_string()).collect::<Vec<_>>();
        format!("Status must be one of: {}.", names.join(", "))
    }
}

impl TryFrom<String> for AttendanceStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One stored row of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,

    #[schema(example = "2024-01-10T09:00:00Z", format = "date-time", value_type = String)]
    pub marked_at: DateTime<Utc>,
}

/// A ledger row joined with the employee's current name, for listings.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceEntry {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,

    #[schema(example = "2024-01-10T09:00:00Z", format = "date-time", value_type = String)]
    pub marked_at: DateTime<Utc>,
}

/// Raw `mark` payload; fields stay strings so every bad field can be reported.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "EMP-001")]
    #[serde(default)]
    pub employee_id: String,

    #[schema(example = "2024-01-10", format = "date")]
    #[serde(default)]
    pub date: String,

    #[schema(example = "Present")]
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAttendance {
    #[schema(example = "Absent")]
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BulkEntry {
    #[schema(example = "EMP-001")]
    #[serde(default)]
    pub employee_id: String,

    #[schema(example = "Present")]
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BulkMarkAttendance {
    #[schema(example = "2024-01-10", format = "date")]
    #[serde(default)]
    pub date: String,

    #[serde(default, alias = "records")]
    pub entries: Vec<BulkEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum BulkEntryOutcome {
    Marked {
        #[schema(example = "EMP-001")]
        employee_id: String,
        record: AttendanceRecord,
    },
    Failed {
        #[schema(example = "EMP-404")]
        employee_id: String,
        /// validation | conflict | not_found | integrity | database
        #[schema(example = "not_found")]
        kind: String,
        #[schema(example = "Employee 'EMP-404' not found.")]
        error: String,
    },
}

impl BulkEntryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BulkEntryOutcome::Marked { .. })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkMarkReport {
    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 2)]
    pub created: usize,
    #[schema(example = 1)]
    pub failed: usize,
    /// One outcome per submitted entry, in submission order
    pub outcomes: Vec<BulkEntryOutcome>,
}

/// Query string of the attendance listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    /// Exact employee id (case-insensitive)
    pub employee_id: Option<String>,
    /// Exact day, YYYY-MM-DD
    pub date: Option<String>,
    /// Calendar month, YYYY-MM
    pub month: Option<String>,
}

/// Query string of the per-employee summary.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct SummaryFilter {
    /// Calendar month, YYYY-MM
    pub month: Option<String>,
    /// Inclusive lower bound, YYYY-MM-DD
    pub from: Option<String>,
    /// Inclusive upper bound, YYYY-MM-DD
    pub to: Option<String>,
}

/// Inclusive date bounds; an open side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    /// Both ranges at once.
    pub fn intersect(self, other: DateRange) -> DateRange {
        let from = match (self.from, other.from) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let to = match (self.to, other.to) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        DateRange { from, to }
    }
}

/// Validated form of [`AttendanceFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceQuery {
    pub employee_id: Option<String>,
    pub range: DateRange,
}
