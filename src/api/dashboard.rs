use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

use crate::error::{AppError, FieldErrors};
use crate::model::dashboard::{DashboardQuery, DashboardSnapshot};
use crate::service::{aggregation, today};
use crate::utils::validation::parse_optional_date;

/// Company-wide attendance for one day
#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Present/absent/not-marked counts and department headcount", body = DashboardSnapshot),
        (status = 400, description = "Malformed date")
    ),
    tag = "Dashboard"
)]
pub async fn dashboard(
    pool: web::Data<SqlitePool>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let mut errors = FieldErrors::new();
    let date = parse_optional_date("date", query.date.as_deref(), &mut errors);
    errors.into_result()?;

    let snapshot = aggregation::load_dashboard(pool.get_ref(), date.unwrap_or_else(today)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": snapshot
    })))
}
