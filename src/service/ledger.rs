use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::db::WriteTx;
use crate::error::{AppError, FieldErrors, map_constraint};
use crate::model::attendance::{
    AttendanceEntry, AttendanceFilter, AttendanceQuery, AttendanceRecord, AttendanceStatus,
    BulkEntryOutcome, BulkMarkAttendance, BulkMarkReport, DateRange, MarkAttendance,
    UpdateAttendance,
};
use crate::service::directory;
use crate::utils::validation::{
    ensure_not_future, parse_date, parse_month, parse_optional_date, parse_status,
    require_employee_id,
};

// Helper enum for typed SQLx binding
enum FilterValue {
    Str(String),
    Date(NaiveDate),
}

fn record_not_found(employee_id: &str, date: NaiveDate) -> AppError {
    AppError::NotFound(format!(
        "Attendance record for employee '{employee_id}' on {date} not found."
    ))
}

fn already_marked(employee_id: &str, date: NaiveDate) -> AppError {
    AppError::Conflict(format!(
        "Attendance already marked for employee '{employee_id}' on {date}. Use update to change it."
    ))
}

fn employee_not_found(employee_id: &str) -> AppError {
    AppError::NotFound(format!("Employee '{employee_id}' not found."))
}

fn employee_vanished(employee_id: &str) -> AppError {
    AppError::Integrity(format!(
        "Employee '{employee_id}' no longer exists; attendance cannot reference it."
    ))
}

async fn find_record(
    conn: &mut SqliteConnection,
    employee_id: &str,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT employee_id, date, status, marked_at
        FROM attendance
        WHERE employee_id = ? AND date = ?
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .fetch_optional(&mut *conn)
    .await
}

/// Existence checks and the insert share one write transaction; the primary
/// key and the foreign key catch anything that bypasses the checks.
async fn insert_checked(
    pool: &SqlitePool,
    employee_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<AttendanceRecord, AppError> {
    let mut tx = WriteTx::begin(pool).await?;
    let result = insert_record(tx.conn()?, employee_id, date, status).await;
    let record = tx.finish(result).await?;

    info!(employee_id, %date, status = %status, "Attendance marked");
    Ok(record)
}

async fn insert_record(
    conn: &mut SqliteConnection,
    employee_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<AttendanceRecord, AppError> {
    if !directory::exists(conn, employee_id).await? {
        return Err(employee_not_found(employee_id));
    }
    if find_record(conn, employee_id, date).await?.is_some() {
        return Err(already_marked(employee_id, date));
    }

    let record = AttendanceRecord {
        employee_id: employee_id.to_string(),
        date,
        status,
        marked_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, status, marked_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&record.employee_id)
    .bind(record.date)
    .bind(record.status.as_str())
    .bind(record.marked_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        map_constraint(
            e,
            || already_marked(employee_id, date),
            || employee_vanished(employee_id),
        )
    })?;

    Ok(record)
}

/// Creates the record for `(employee_id, date)`; only valid when none exists.
pub async fn mark(
    pool: &SqlitePool,
    input: &MarkAttendance,
    today: NaiveDate,
) -> Result<AttendanceRecord, AppError> {
    let mut errors = FieldErrors::new();
    let employee_id = require_employee_id("employee_id", &input.employee_id, &mut errors);
    let date = parse_date("date", &input.date, &mut errors);
    let status = parse_status("status", &input.status, &mut errors);

    let (Some(employee_id), Some(date), Some(status)) = (employee_id, date, status) else {
        return Err(AppError::Validation(errors));
    };
    ensure_not_future("date", date, today, &mut errors);
    errors.into_result()?;

    insert_checked(pool, &employee_id, date, status).await
}

/// Overwrites the status of an existing record and refreshes `marked_at`, even
/// when the status does not change.
pub async fn update(
    pool: &SqlitePool,
    employee_id: &str,
    date: &str,
    input: &UpdateAttendance,
) -> Result<AttendanceRecord, AppError> {
    let mut errors = FieldErrors::new();
    let employee_id = require_employee_id("employee_id", employee_id, &mut errors);
    let date = parse_date("date", date, &mut errors);
    let status = parse_status("status", &input.status, &mut errors);

    let (Some(employee_id), Some(date), Some(status)) = (employee_id, date, status) else {
        return Err(AppError::Validation(errors));
    };

    let mut tx = WriteTx::begin(pool).await?;
    let result = overwrite_status(tx.conn()?, &employee_id, date, status).await;
    let record = tx.finish(result).await?;

    info!(employee_id = %record.employee_id, %date, status = %status, "Attendance updated");
    Ok(record)
}

async fn overwrite_status(
    conn: &mut SqliteConnection,
    employee_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<AttendanceRecord, AppError> {
    if find_record(conn, employee_id, date).await?.is_none() {
        return Err(record_not_found(employee_id, date));
    }
    // A record can never be rewritten for an employee that is being removed.
    if !directory::exists(conn, employee_id).await? {
        warn!(employee_id, %date, "Attendance record without employee");
        return Err(employee_vanished(employee_id));
    }

    let marked_at = Utc::now();
    let affected = sqlx::query(
        r#"
        UPDATE attendance
        SET status = ?, marked_at = ?
        WHERE employee_id = ? AND date = ?
        "#,
    )
    .bind(status.as_str())
    .bind(marked_at)
    .bind(employee_id)
    .bind(date)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(record_not_found(employee_id, date));
    }

    Ok(AttendanceRecord {
        employee_id: employee_id.to_string(),
        date,
        status,
        marked_at,
    })
}

pub async fn delete(pool: &SqlitePool, employee_id: &str, date: &str) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    let employee_id = require_employee_id("employee_id", employee_id, &mut errors);
    let date = parse_date("date", date, &mut errors);

    let (Some(employee_id), Some(date)) = (employee_id, date) else {
        return Err(AppError::Validation(errors));
    };

    let affected = sqlx::query("DELETE FROM attendance WHERE employee_id = ? AND date = ?")
        .bind(&employee_id)
        .bind(date)
        .execute(pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(record_not_found(&employee_id, date));
    }

    info!(employee_id = %employee_id, %date, "Attendance deleted");
    Ok(())
}

/// Marks every entry independently for one shared date. A failing entry is
/// reported in its outcome and never blocks the others.
pub async fn bulk_mark(
    pool: &SqlitePool,
    input: &BulkMarkAttendance,
    today: NaiveDate,
) -> Result<BulkMarkReport, AppError> {
    let mut errors = FieldErrors::new();
    let date = parse_date("date", &input.date, &mut errors);
    if let Some(date) = date {
        ensure_not_future("date", date, today, &mut errors);
    }
    if input.entries.is_empty() {
        errors.add("entries", "No records provided.");
    }
    let Some(date) = date else {
        return Err(AppError::Validation(errors));
    };
    errors.into_result()?;

    let mut outcomes = Vec::with_capacity(input.entries.len());
    for entry in &input.entries {
        let mut entry_errors = FieldErrors::new();
        let employee_id = require_employee_id("employee_id", &entry.employee_id, &mut entry_errors);
        let status = parse_status("status", &entry.status, &mut entry_errors);

        let result = match (employee_id.as_deref(), status) {
            (Some(id), Some(status)) => insert_checked(pool, id, date, status).await,
            _ => Err(AppError::Validation(entry_errors)),
        };

        let employee_id = employee_id.unwrap_or_else(|| entry.employee_id.trim().to_string());
        outcomes.push(match result {
            Ok(record) => BulkEntryOutcome::Marked {
                employee_id,
                record,
            },
            Err(err) => {
                debug!(employee_id = %employee_id, error = %err, "Bulk entry rejected");
                BulkEntryOutcome::Failed {
                    employee_id,
                    kind: err.kind().to_string(),
                    error: err.to_string(),
                }
            }
        });
    }

    let created = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = outcomes.len() - created;
    info!(%date, created, failed, "Bulk attendance processed");

    Ok(BulkMarkReport {
        date,
        created,
        failed,
        outcomes,
    })
}

/// Validates the listing query string into an [`AttendanceQuery`].
pub fn parse_filter(filter: &AttendanceFilter) -> Result<AttendanceQuery, AppError> {
    let mut errors = FieldErrors::new();

    let employee_id = filter
        .employee_id
        .as_deref()
        .map(directory::normalize_id)
        .filter(|id| !id.is_empty());
    let day = parse_optional_date("date", filter.date.as_deref(), &mut errors);
    let month = parse_month("month", filter.month.as_deref(), &mut errors);
    errors.into_result()?;

    let mut range = DateRange::default();
    if let Some(day) = day {
        range = range.intersect(DateRange::day(day));
    }
    if let Some(month) = month {
        range = range.intersect(month);
    }

    Ok(AttendanceQuery { employee_id, range })
}

/// Ledger rows joined with current employee names, newest date first, then by
/// name.
pub(crate) async fn fetch_entries(
    conn: &mut SqliteConnection,
    query: &AttendanceQuery,
) -> Result<Vec<AttendanceEntry>, sqlx::Error> {
    let mut conditions = Vec::new();
    let mut bindings = Vec::new();

    if let Some(employee_id) = &query.employee_id {
        conditions.push("a.employee_id = ?");
        bindings.push(FilterValue::Str(employee_id.clone()));
    }
    if let Some(from) = query.range.from {
        conditions.push("a.date >= ?");
        bindings.push(FilterValue::Date(from));
    }
    if let Some(to) = query.range.to {
        conditions.push("a.date <= ?");
        bindings.push(FilterValue::Date(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        r#"
        SELECT a.employee_id, e.full_name AS employee_name, a.date, a.status, a.marked_at
        FROM attendance a
        JOIN employees e ON e.employee_id = a.employee_id
        {where_clause}
        ORDER BY a.date DESC, e.full_name ASC, a.employee_id ASC
        "#
    );
    debug!(sql = %sql, "Fetching attendance");

    let mut q = sqlx::query_as::<_, AttendanceEntry>(&sql);
    for b in bindings {
        q = match b {
            FilterValue::Str(v) => q.bind(v),
            FilterValue::Date(v) => q.bind(v),
        };
    }
    q.fetch_all(&mut *conn).await
}

pub async fn list(pool: &SqlitePool, filter: &AttendanceFilter) -> Result<Vec<AttendanceEntry>, AppError> {
    let query = parse_filter(filter)?;
    let mut conn = pool.acquire().await?;
    Ok(fetch_entries(&mut conn, &query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{file_pool, memory_pool};
    use crate::model::attendance::BulkEntry;
    use crate::service::test_support::{date, mark_input, seed_directory, test_today};
    use futures::future::join_all;

    fn by_employee(id: &str) -> AttendanceFilter {
        AttendanceFilter {
            employee_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn mark_creates_record_with_timestamp() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;

        let before = Utc::now();
        let record = mark(&pool, &mark_input("e1", "2024-01-10", "Present"), test_today())
            .await
            .unwrap();
        assert_eq!(record.employee_id, "E1");
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.marked_at >= before);

        let rows = list(&pool, &by_employee("E1")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_name, "Alice Smith");
        assert_eq!(rows[0].date, date("2024-01-10"));
    }

    #[actix_web::test]
    async fn second_mark_conflicts_and_keeps_first_status() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;

        mark(&pool, &mark_input("E1", "2024-01-10", "Present"), test_today())
            .await
            .unwrap();
        let err = mark(&pool, &mark_input("E1", "2024-01-10", "Absent"), test_today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let rows = list(&pool, &by_employee("E1")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, AttendanceStatus::Present);
    }

    #[actix_web::test]
    async fn mark_for_unknown_employee_is_not_found() {
        let pool = memory_pool().await;
        let err = mark(&pool, &mark_input("GHOST", "2024-01-10", "Present"), test_today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn future_date_is_rejected_without_writing() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;

        let err = mark(&pool, &mark_input("E1", "2099-01-01", "Present"), test_today())
            .await
            .unwrap_err();
        assert!(err.fields().is_some_and(|f| f.contains("date")));
        assert!(list(&pool, &by_employee("E1")).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn mark_reports_all_bad_fields_together() {
        let pool = memory_pool().await;
        let err = mark(&pool, &mark_input("", "10/01/2024", "Late"), test_today())
            .await
            .unwrap_err();
        let fields = err.fields().unwrap();
        assert!(fields.contains("employee_id"));
        assert!(fields.contains("date"));
        assert!(fields.contains("status"));
    }

    #[actix_web::test]
    async fn update_flips_status_and_refreshes_timestamp() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;

        let first = mark(&pool, &mark_input("E1", "2024-01-10", "Present"), test_today())
            .await
            .unwrap();
        let same = UpdateAttendance {
            status: "Present".into(),
        };
        let touched = update(&pool, "E1", "2024-01-10", &same).await.unwrap();
        assert_eq!(touched.status, AttendanceStatus::Present);
        assert!(touched.marked_at >= first.marked_at);

        let flip = UpdateAttendance {
            status: "Absent".into(),
        };
        update(&pool, "e1", "2024-01-10", &flip).await.unwrap();
        let rows = list(&pool, &by_employee("E1")).await.unwrap();
        assert_eq!(rows[0].status, AttendanceStatus::Absent);
        assert!(rows[0].marked_at >= touched.marked_at);
    }

    #[actix_web::test]
    async fn update_and_delete_of_missing_key_leave_ledger_unchanged() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;
        mark(&pool, &mark_input("E2", "2024-01-10", "Absent"), test_today())
            .await
            .unwrap();

        let upd = UpdateAttendance {
            status: "Present".into(),
        };
        let err = update(&pool, "E1", "2024-01-10", &upd).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = delete(&pool, "E1", "2024-01-10").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let rows = list(&pool, &AttendanceFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_id, "E2");
        assert_eq!(rows[0].status, AttendanceStatus::Absent);
    }

    #[actix_web::test]
    async fn update_rejects_unknown_status() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;
        mark(&pool, &mark_input("E1", "2024-01-10", "Present"), test_today())
            .await
            .unwrap();

        let bad = UpdateAttendance {
            status: "Holiday".into(),
        };
        let err = update(&pool, "E1", "2024-01-10", &bad).await.unwrap_err();
        assert!(err.fields().is_some_and(|f| f.contains("status")));
    }

    #[actix_web::test]
    async fn delete_returns_key_to_no_record() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;
        mark(&pool, &mark_input("E1", "2024-01-10", "Present"), test_today())
            .await
            .unwrap();

        delete(&pool, "E1", "2024-01-10").await.unwrap();
        assert!(list(&pool, &by_employee("E1")).await.unwrap().is_empty());

        // NoRecord again, so mark is valid once more.
        mark(&pool, &mark_input("E1", "2024-01-10", "Absent"), test_today())
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn bulk_mark_is_best_effort() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;
        mark(&pool, &mark_input("E3", "2024-01-10", "Present"), test_today())
            .await
            .unwrap();

        let input: BulkMarkAttendance = serde_json::from_value(serde_json::json!({
            "date": "2024-01-10",
            "entries": [
                {"employee_id": "GHOST", "status": "Present"},
                {"employee_id": "E1", "status": "Present"},
                {"employee_id": "E3", "status": "Absent"},
                {"employee_id": "E2", "status": "Sick"}
            ]
        }))
        .unwrap();

        let report = bulk_mark(&pool, &input, test_today()).await.unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 3);

        let kinds: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| match o {
                BulkEntryOutcome::Marked { .. } => "ok",
                BulkEntryOutcome::Failed { kind, .. } => kind.as_str(),
            })
            .collect();
        assert_eq!(kinds, ["not_found", "ok", "conflict", "validation"]);

        let e1 = list(&pool, &by_employee("E1")).await.unwrap();
        assert_eq!(e1.len(), 1);
        let e3 = list(&pool, &by_employee("E3")).await.unwrap();
        assert_eq!(e3[0].status, AttendanceStatus::Present);
        assert!(list(&pool, &by_employee("GHOST")).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn bulk_mark_rejects_bad_shared_date_and_empty_entries() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;

        let future = BulkMarkAttendance {
            date: "2099-01-01".into(),
            entries: vec![BulkEntry {
                employee_id: "E1".into(),
                status: "Present".into(),
            }],
        };
        let err = bulk_mark(&pool, &future, test_today()).await.unwrap_err();
        assert!(err.fields().is_some_and(|f| f.contains("date")));

        let empty = BulkMarkAttendance {
            date: "2024-01-10".into(),
            entries: vec![],
        };
        let err = bulk_mark(&pool, &empty, test_today()).await.unwrap_err();
        assert!(err.fields().is_some_and(|f| f.contains("entries")));

        assert!(list(&pool, &AttendanceFilter::default()).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn list_orders_by_date_desc_then_name_and_filters() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;
        for (id, day, status) in [
            ("E2", "2024-01-10", "Present"),
            ("E1", "2024-01-10", "Absent"),
            ("E3", "2024-01-11", "Present"),
            ("E1", "2024-02-01", "Present"),
        ] {
            mark(&pool, &mark_input(id, day, status), test_today())
                .await
                .unwrap();
        }

        let all = list(&pool, &AttendanceFilter::default()).await.unwrap();
        let keys: Vec<_> = all
            .iter()
            .map(|r| (r.date.to_string(), r.employee_name.as_str()))
            .collect();
        assert_eq!(
            keys,
            [
                ("2024-02-01".to_string(), "Alice Smith"),
                ("2024-01-11".to_string(), "Carol White"),
                ("2024-01-10".to_string(), "Alice Smith"),
                ("2024-01-10".to_string(), "Bob Jones"),
            ]
        );

        let jan = AttendanceFilter {
            month: Some("2024-01".into()),
            ..Default::default()
        };
        assert_eq!(list(&pool, &jan).await.unwrap().len(), 3);

        let day = AttendanceFilter {
            date: Some("2024-01-10".into()),
            employee_id: Some("e2".into()),
            ..Default::default()
        };
        let rows = list(&pool, &day).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_id, "E2");

        let bad = AttendanceFilter {
            month: Some("January".into()),
            ..Default::default()
        };
        assert!(matches!(list(&pool, &bad).await, Err(AppError::Validation(_))));
    }

    #[actix_web::test]
    async fn cascade_delete_removes_all_records() {
        let pool = memory_pool().await;
        seed_directory(&pool).await;
        for day in ["2024-01-08", "2024-01-09", "2024-01-10"] {
            mark(&pool, &mark_input("E1", day, "Present"), test_today())
                .await
                .unwrap();
        }
        mark(&pool, &mark_input("E2", "2024-01-10", "Absent"), test_today())
            .await
            .unwrap();

        let report = directory::delete(&pool, "E1").await.unwrap();
        assert_eq!(report.attendance_removed, 3);
        assert!(list(&pool, &by_employee("E1")).await.unwrap().is_empty());
        assert_eq!(list(&pool, &by_employee("E2")).await.unwrap().len(), 1);

        let err = mark(&pool, &mark_input("E1", "2024-01-11", "Present"), test_today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn racing_marks_on_one_key_have_one_winner() {
        let (pool, _dir) = file_pool(5).await;
        seed_directory(&pool).await;

        let days: Vec<String> = (1..=14).map(|d| format!("2024-03-{d:02}")).collect();
        let inputs: Vec<MarkAttendance> = days
            .iter()
            .flat_map(|day| {
                ["Present", "Absent", "Present", "Absent"]
                    .into_iter()
                    .map(move |status| mark_input("E1", day, status))
            })
            .collect();

        let results = join_all(inputs.iter().map(|input| mark(&pool, input, test_today()))).await;

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, days.len());
        for result in &results {
            if let Err(err) = result {
                assert!(matches!(err, AppError::Conflict(_)), "unexpected {err:?}");
            }
        }
        for day in &days {
            let filter = AttendanceFilter {
                employee_id: Some("E1".into()),
                date: Some(day.clone()),
                ..Default::default()
            };
            assert_eq!(list(&pool, &filter).await.unwrap().len(), 1);
        }
    }

    #[actix_web::test]
    async fn racing_marks_on_distinct_keys_all_succeed() {
        let (pool, _dir) = file_pool(5).await;
        seed_directory(&pool).await;

        let inputs: Vec<MarkAttendance> = ["E1", "E2", "E3"]
            .into_iter()
            .flat_map(|id| (1..=20).map(move |d| mark_input(id, &format!("2024-04-{d:02}"), "Present")))
            .collect();

        let results = join_all(inputs.iter().map(|input| mark(&pool, input, test_today()))).await;

        for result in &results {
            assert!(result.is_ok(), "unexpected {result:?}");
        }
        assert_eq!(list(&pool, &AttendanceFilter::default()).await.unwrap().len(), 60);
    }

    #[actix_web::test]
    async fn delete_racing_marks_leaves_no_orphans() {
        let (pool, _dir) = file_pool(5).await;
        seed_directory(&pool).await;

        let inputs: Vec<MarkAttendance> = (1..=20)
            .map(|d| mark_input("E1", &format!("2024-05-{d:02}"), "Present"))
            .collect();

        let marks = join_all(inputs.iter().map(|input| mark(&pool, input, test_today())));
        let (marks, deleted) = futures::join!(marks, directory::delete(&pool, "E1"));

        deleted.unwrap();
        for result in &marks {
            if let Err(err) = result {
                assert!(
                    matches!(err, AppError::NotFound(_) | AppError::Integrity(_)),
                    "unexpected {err:?}"
                );
            }
        }

        let orphans = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM attendance WHERE employee_id = 'E1'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(orphans, 0);
    }
}
