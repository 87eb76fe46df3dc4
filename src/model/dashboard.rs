use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::attendance::AttendanceEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DepartmentCount {
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 2)]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({
    "date": "2024-01-10",
    "total_employees": 3,
    "present": 1,
    "absent": 1,
    "not_marked": 1,
    "department_breakdown": [
        {"department": "Engineering", "count": 2},
        {"department": "Sales", "count": 1}
    ],
    "total_attendance_records": 2
}))]
pub struct DashboardSnapshot {
    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub total_employees: u32,
    pub present: u32,
    pub absent: u32,
    pub not_marked: u32,
    /// Headcount per department over the whole directory, largest first
    pub department_breakdown: Vec<DepartmentCount>,
    /// Size of the whole ledger, all dates
    pub total_attendance_records: u64,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct DashboardQuery {
    /// Day to report on, YYYY-MM-DD; defaults to today
    pub date: Option<String>,
}

/// Present/absent tally and attendance rate for one record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub present: u32,
    pub absent: u32,
    /// Whole percent, 0 when nothing is recorded
    pub rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyBreakdown {
    #[schema(example = "2024-01")]
    pub month: String,
    pub present: u32,
    pub absent: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeAttendanceSummary {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    pub present: u32,
    pub absent: u32,
    pub total_records: u32,
    #[schema(example = 75)]
    pub rate: u32,
    /// Newest month first
    pub monthly_breakdown: Vec<MonthlyBreakdown>,
    /// Up to ten latest records, newest first
    pub recent_records: Vec<AttendanceEntry>,
}
