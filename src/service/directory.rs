use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::db::WriteTx;
use crate::error::{AppError, map_constraint};
use crate::model::employee::{DeletedEmployee, Employee, EmployeeFilter, EmployeeListResponse, NewEmployee};
use crate::utils::validation::validate_payload;

const EMPLOYEE_COLUMNS: &str = "employee_id, full_name, email, department, created_at";

/// Path ids are matched the way they were stored.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn not_found(employee_id: &str) -> AppError {
    AppError::NotFound(format!("Employee '{employee_id}' not found."))
}

pub(crate) async fn exists(conn: &mut SqliteConnection, employee_id: &str) -> Result<bool, sqlx::Error> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn find(
    conn: &mut SqliteConnection,
    employee_id: &str,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = ?"
    ))
    .bind(employee_id)
    .fetch_optional(&mut *conn)
    .await
}

pub(crate) async fn all(conn: &mut SqliteConnection) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY full_name ASC, employee_id ASC"
    ))
    .fetch_all(&mut *conn)
    .await
}

/// Validates, normalizes and stores a new employee.
pub async fn create(pool: &SqlitePool, input: &NewEmployee) -> Result<Employee, AppError> {
    let input = input.normalized();
    validate_payload(&input)?;

    let mut tx = WriteTx::begin(pool).await?;
    let result = insert_employee(tx.conn()?, input).await;
    let employee = tx.finish(result).await?;

    info!(employee_id = %employee.employee_id, department = %employee.department, "Employee created");
    Ok(employee)
}

async fn insert_employee(conn: &mut SqliteConnection, input: NewEmployee) -> Result<Employee, AppError> {
    if exists(conn, &input.employee_id).await? {
        return Err(AppError::Conflict(format!(
            "Employee ID '{}' is already taken.",
            input.employee_id
        )));
    }

    let email_taken = sqlx::query_scalar::<_, i64>("SELECT 1 FROM employees WHERE email = ?")
        .bind(&input.email)
        .fetch_optional(&mut *conn)
        .await?
        .is_some();
    if email_taken {
        return Err(AppError::Conflict(format!(
            "Email '{}' is already registered.",
            input.email
        )));
    }

    let employee = Employee {
        employee_id: input.employee_id,
        full_name: input.full_name,
        email: input.email,
        department: input.department,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO employees (employee_id, full_name, email, department, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&employee.employee_id)
    .bind(&employee.full_name)
    .bind(&employee.email)
    .bind(&employee.department)
    .bind(employee.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        map_constraint(
            e,
            || AppError::Conflict(format!("Employee '{}' already exists.", employee.employee_id)),
            || not_found(&employee.employee_id),
        )
    })?;

    Ok(employee)
}

pub async fn get(pool: &SqlitePool, employee_id: &str) -> Result<Employee, AppError> {
    let employee_id = normalize_id(employee_id);
    let mut conn = pool.acquire().await?;
    find(&mut conn, &employee_id)
        .await?
        .ok_or_else(|| not_found(&employee_id))
}

/// Filtered listing ordered by name, then id.
pub async fn list(pool: &SqlitePool, filter: &EmployeeFilter) -> Result<EmployeeListResponse, AppError> {
    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(department) = filter.department_name() {
        conditions.push("department = ?");
        bindings.push(department.to_string());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees {where_clause} ORDER BY full_name ASC, employee_id ASC"
    );
    debug!(sql = %sql, bindings = ?bindings, search = ?filter.search_term(), "Fetching employees");

    let mut conn = pool.acquire().await?;

    let mut query = sqlx::query_as::<_, Employee>(&sql);
    for b in &bindings {
        query = query.bind(b);
    }
    // SQLite's lower() only folds ASCII, so the search term is matched here.
    let data: Vec<Employee> = query
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .filter(|employee| filter.matches(employee))
        .collect();

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(&mut *conn)
        .await?;

    Ok(EmployeeListResponse {
        filtered: data.len(),
        total: usize::try_from(total).unwrap_or_default(),
        data,
    })
}

/// Removes the employee and every attendance record keyed to it in one
/// transaction.
pub async fn delete(pool: &SqlitePool, employee_id: &str) -> Result<DeletedEmployee, AppError> {
    let employee_id = normalize_id(employee_id);

    let mut tx = WriteTx::begin(pool).await?;
    let result = remove_employee(tx.conn()?, &employee_id).await;
    let removed = tx.finish(result).await?;

    info!(employee_id = %employee_id, attendance_removed = removed, "Employee deleted");
    Ok(DeletedEmployee {
        employee_id,
        attendance_removed: removed,
    })
}

async fn remove_employee(conn: &mut SqliteConnection, employee_id: &str) -> Result<u64, AppError> {
    if !exists(conn, employee_id).await? {
        return Err(not_found(employee_id));
    }

    let removed = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;

    Ok(removed)
}

/// Distinct departments currently in use, ascending.
pub async fn departments(pool: &SqlitePool) -> Result<Vec<String>, AppError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT department FROM employees ORDER BY department ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(names)
}
