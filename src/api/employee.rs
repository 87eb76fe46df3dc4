use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::instrument;

use crate::error::AppError;
use crate::model::employee::{DeletedEmployee, Employee, EmployeeFilter, EmployeeListResponse, NewEmployee};
use crate::service::directory;

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 400, description = "One or more fields are invalid", body = Object, example = json!({
            "success": false,
            "error": "Validation failed.",
            "fields": {"email": "Please provide a valid email address."}
        })),
        (status = 409, description = "Employee ID or email already exists", body = Object, example = json!({
            "success": false,
            "error": "Employee ID 'EMP-001' is already taken."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
#[instrument(name = "create_employee", skip(pool, payload), fields(employee_id = %payload.employee_id))]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    let employee = directory::create(pool.get_ref(), &payload).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": employee,
        "message": "Employee created successfully."
    })))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeFilter),
    responses(
        (status = 200, description = "Filtered employee list", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<SqlitePool>,
    query: web::Query<EmployeeFilter>,
) -> Result<HttpResponse, AppError> {
    let listing = directory::list(pool.get_ref(), &query).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": listing.data,
        "total": listing.total,
        "filtered": listing.filtered,
    })))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "error": "Employee 'EMP-001' not found."
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee = directory::get(pool.get_ref(), &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": employee
    })))
}

/// Delete Employee together with all of its attendance
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee and attendance deleted", body = DeletedEmployee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "error": "Employee 'EMP-001' not found."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
#[instrument(name = "delete_employee", skip(pool))]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let deleted = directory::delete(pool.get_ref(), &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!(
            "Employee '{}' and {} attendance record(s) deleted.",
            deleted.employee_id, deleted.attendance_removed
        ),
        "data": deleted
    })))
}

#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "Departments currently in use", body = Object, example = json!({
            "success": true,
            "data": ["Engineering", "Sales"]
        }))
    ),
    tag = "Employee"
)]
pub async fn list_departments(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let departments = directory::departments(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": departments
    })))
}
