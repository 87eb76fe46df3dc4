use crate::model::attendance::{
    AttendanceEntry, AttendanceFilter, AttendanceRecord, AttendanceStatus, BulkEntry,
    BulkEntryOutcome, BulkMarkAttendance, BulkMarkReport, MarkAttendance, SummaryFilter,
    UpdateAttendance,
};
use crate::model::dashboard::{
    DashboardQuery, DashboardSnapshot, DepartmentCount, EmployeeAttendanceSummary,
    MonthlyBreakdown,
};
use crate::model::employee::{
    DeletedEmployee, Employee, EmployeeFilter, EmployeeListResponse, NewEmployee,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Attendance API",
        version = "1.0.0",
        description = r#"
## Employee directory and attendance ledger

- **Employees**: create, list, view and delete employees. Deleting an employee removes all of their attendance.
- **Attendance**: one Present/Absent record per employee per day. Marks, updates, deletes and bulk marks for a single day.
- **Dashboard**: present, absent and not-marked counts for a day, with headcount per department.
- **Summaries**: per-employee totals, attendance rate and a month-by-month breakdown.

### Response format
Successful responses are `{"success": true, "data": ...}`.
Failures are `{"success": false, "error": "...", "fields": {...}}`, where `fields` is present for validation errors.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::list_departments,

        crate::api::attendance::list_attendance,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::bulk_mark_attendance,
        crate::api::attendance::employee_summary,

        crate::api::dashboard::dashboard
    ),
    components(
        schemas(
            Employee,
            NewEmployee,
            EmployeeFilter,
            EmployeeListResponse,
            DeletedEmployee,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceEntry,
            MarkAttendance,
            UpdateAttendance,
            BulkEntry,
            BulkMarkAttendance,
            BulkEntryOutcome,
            BulkMarkReport,
            AttendanceFilter,
            SummaryFilter,
            DashboardQuery,
            DashboardSnapshot,
            DepartmentCount,
            MonthlyBreakdown,
            EmployeeAttendanceSummary
        )
    ),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Attendance ledger and summary APIs"),
        (name = "Dashboard", description = "Daily attendance dashboard"),
    )
)]
pub struct ApiDoc;
