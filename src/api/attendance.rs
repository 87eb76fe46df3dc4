use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::instrument;

use crate::error::AppError;
use crate::model::attendance::{
    AttendanceEntry, AttendanceFilter, AttendanceRecord, BulkMarkAttendance, BulkMarkReport,
    MarkAttendance, SummaryFilter, UpdateAttendance,
};
use crate::model::dashboard::EmployeeAttendanceSummary;
use crate::service::{aggregation, ledger, today};

#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance records, newest date first", body = [AttendanceEntry]),
        (status = 400, description = "Malformed date or month filter")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, AppError> {
    let records = ledger::list(pool.get_ref(), &query).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "total": records.len(),
        "data": records,
    })))
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance marked successfully", body = AttendanceRecord),
        (status = 400, description = "Invalid field, unknown status or future date", body = Object, example = json!({
            "success": false,
            "error": "Validation failed.",
            "fields": {"date": "Date cannot be in the future."}
        })),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Attendance already marked for that day", body = Object, example = json!({
            "success": false,
            "error": "Attendance already marked for employee 'EMP-001' on 2024-01-10. Use update to change it."
        }))
    ),
    tag = "Attendance"
)]
#[instrument(
    name = "mark_attendance",
    skip(pool, payload),
    fields(employee_id = %payload.employee_id, date = %payload.date)
)]
pub async fn mark_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, AppError> {
    let record = ledger::mark(pool.get_ref(), &payload, today()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": record,
        "message": "Attendance marked successfully."
    })))
}

#[utoipa::path(
    put,
    path = "/api/attendance/{employee_id}/{date}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        ("date", Path, description = "Day of the record, YYYY-MM-DD")
    ),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Attendance updated", body = AttendanceRecord),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Attendance record not found", body = Object, example = json!({
            "success": false,
            "error": "Attendance record for employee 'EMP-001' on 2024-01-10 not found."
        }))
    ),
    tag = "Attendance"
)]
#[instrument(name = "update_attendance", skip(pool, payload))]
pub async fn update_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateAttendance>,
) -> Result<HttpResponse, AppError> {
    let (employee_id, date) = path.into_inner();
    let record = ledger::update(pool.get_ref(), &employee_id, &date, &payload).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": record,
        "message": "Attendance updated."
    })))
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{employee_id}/{date}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        ("date", Path, description = "Day of the record, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Attendance record deleted", body = Object, example = json!({
            "success": true,
            "message": "Attendance record deleted."
        })),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
#[instrument(name = "delete_attendance", skip(pool))]
pub async fn delete_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (employee_id, date) = path.into_inner();
    ledger::delete(pool.get_ref(), &employee_id, &date).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Attendance record deleted."
    })))
}

/// Mark attendance for many employees on one day. Entries succeed or fail
/// independently; the response carries one outcome per entry.
#[utoipa::path(
    post,
    path = "/api/attendance/bulk",
    request_body = BulkMarkAttendance,
    responses(
        (status = 200, description = "Per-entry outcomes", body = BulkMarkReport),
        (status = 400, description = "Missing entries or invalid/future date")
    ),
    tag = "Attendance"
)]
#[instrument(
    name = "bulk_mark_attendance",
    skip(pool, payload),
    fields(date = %payload.date, entries = payload.entries.len())
)]
pub async fn bulk_mark_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<BulkMarkAttendance>,
) -> Result<HttpResponse, AppError> {
    let report = ledger::bulk_mark(pool.get_ref(), &payload, today()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": report
    })))
}

#[utoipa::path(
    get,
    path = "/api/attendance/summary/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        SummaryFilter
    ),
    responses(
        (status = 200, description = "Attendance summary for one employee", body = EmployeeAttendanceSummary),
        (status = 400, description = "Malformed month or date range"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn employee_summary(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    query: web::Query<SummaryFilter>,
) -> Result<HttpResponse, AppError> {
    let summary = aggregation::load_employee_summary(pool.get_ref(), &path.into_inner(), &query).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": summary
    })))
}
