//! Read-side views. The pure functions take a snapshot of directory and ledger
//! rows; the async loaders read that snapshot inside one transaction so both
//! tables are seen at the same moment. Nothing here is cached.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{AppError, FieldErrors};
use crate::model::attendance::{
    AttendanceEntry, AttendanceQuery, AttendanceRecord, AttendanceStatus, DateRange,
    SummaryFilter,
};
use crate::model::dashboard::{
    AttendanceSummary, DashboardSnapshot, DepartmentCount, EmployeeAttendanceSummary,
    MonthlyBreakdown,
};
use crate::model::employee::Employee;
use crate::service::{directory, ledger};
use crate::utils::validation::{parse_month, parse_optional_date};

const RECENT_RECORDS: usize = 10;

/// Whole-percent rate, rounded half up; 0 when nothing was recorded.
pub fn attendance_rate(present: u32, absent: u32) -> u32 {
    let total = u64::from(present) + u64::from(absent);
    if total == 0 {
        return 0;
    }
    let rate = (u64::from(present) * 200 + total) / (2 * total);
    rate as u32
}

/// Headcount per department, largest first, ties by name.
pub fn department_breakdown(employees: &[Employee]) -> Vec<DepartmentCount> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for employee in employees {
        *counts.entry(employee.department.as_str()).or_default() += 1;
    }

    let mut breakdown: Vec<DepartmentCount> = counts
        .into_iter()
        .map(|(department, count)| DepartmentCount {
            department: department.to_string(),
            count,
        })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.department.cmp(&b.department)));
    breakdown
}

/// Classifies every employee as present, absent or not marked on `date`.
/// Records for other dates or for unknown employees are ignored, so
/// `present + absent + not_marked == total_employees` always holds.
pub fn dashboard_snapshot(
    date: NaiveDate,
    employees: &[Employee],
    records: &[AttendanceRecord],
    total_attendance_records: u64,
) -> DashboardSnapshot {
    let on_date: HashMap<&str, AttendanceStatus> = records
        .iter()
        .filter(|r| r.date == date)
        .map(|r| (r.employee_id.as_str(), r.status))
        .collect();

    let (mut present, mut absent, mut not_marked) = (0u32, 0u32, 0u32);
    for employee in employees {
        match on_date.get(employee.employee_id.as_str()) {
            Some(AttendanceStatus::Present) => present += 1,
            Some(AttendanceStatus::Absent) => absent += 1,
            None => not_marked += 1,
        }
    }

    DashboardSnapshot {
        date,
        total_employees: present + absent + not_marked,
        present,
        absent,
        not_marked,
        department_breakdown: department_breakdown(employees),
        total_attendance_records,
    }
}

/// Tally for one employee; rows belonging to anyone else are skipped.
pub fn employee_summary(employee_id: &str, records: &[AttendanceEntry]) -> AttendanceSummary {
    let (mut present, mut absent) = (0u32, 0u32);
    for record in records.iter().filter(|r| r.employee_id == employee_id) {
        match record.status {
            AttendanceStatus::Present => present += 1,
            AttendanceStatus::Absent => absent += 1,
        }
    }
    AttendanceSummary {
        present,
        absent,
        rate: attendance_rate(present, absent),
    }
}

/// Per `YYYY-MM` tallies, newest month first.
pub fn monthly_breakdown(records: &[AttendanceEntry]) -> Vec<MonthlyBreakdown> {
    let mut months: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for record in records {
        let slot = months
            .entry(record.date.format("%Y-%m").to_string())
            .or_default();
        match record.status {
            AttendanceStatus::Present => slot.0 += 1,
            AttendanceStatus::Absent => slot.1 += 1,
        }
    }
    months
        .into_iter()
        .rev()
        .map(|(month, (present, absent))| MonthlyBreakdown {
            month,
            present,
            absent,
        })
        .collect()
}

pub async fn load_dashboard(pool: &SqlitePool, date: NaiveDate) -> Result<DashboardSnapshot, AppError> {
    let mut tx = pool.begin().await?;

    let employees = directory::all(&mut tx).await?;
    let records = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT employee_id, date, status, marked_at FROM attendance WHERE date = ?",
    )
    .bind(date)
    .fetch_all(&mut *tx)
    .await?;
    let total_records = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    debug!(%date, employees = employees.len(), records = records.len(), "Dashboard snapshot loaded");
    Ok(dashboard_snapshot(
        date,
        &employees,
        &records,
        u64::try_from(total_records).unwrap_or_default(),
    ))
}

pub fn parse_summary_filter(filter: &SummaryFilter) -> Result<DateRange, AppError> {
    let mut errors = FieldErrors::new();
    let month = parse_month("month", filter.month.as_deref(), &mut errors);
    let from = parse_optional_date("from", filter.from.as_deref(), &mut errors);
    let to = parse_optional_date("to", filter.to.as_deref(), &mut errors);

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            errors.add("from", "'from' must not be after 'to'.");
        }
    }
    errors.into_result()?;

    let explicit = DateRange { from, to };
    Ok(match month {
        Some(month) => month.intersect(explicit),
        None => explicit,
    })
}

pub async fn load_employee_summary(
    pool: &SqlitePool,
    employee_id: &str,
    filter: &SummaryFilter,
) -> Result<EmployeeAttendanceSummary, AppError> {
    let range = parse_summary_filter(filter)?;
    let employee_id = directory::normalize_id(employee_id);

    let mut tx = pool.begin().await?;
    let employee = directory::find(&mut tx, &employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee '{employee_id}' not found.")))?;
    let query = AttendanceQuery {
        employee_id: Some(employee_id.clone()),
        range,
    };
    let records = ledger::fetch_entries(&mut tx, &query).await?;
    tx.commit().await?;

    let summary = employee_summary(&employee_id, &records);
    Ok(EmployeeAttendanceSummary {
        employee_id,
        employee_name: employee.full_name,
        present: summary.present,
        absent: summary.absent,
        total_records: summary.present + summary.absent,
        rate: summary.rate,
        monthly_breakdown: monthly_breakdown(&records),
        recent_records: records.into_iter().take(RECENT_RECORDS).collect(),
    })
}
