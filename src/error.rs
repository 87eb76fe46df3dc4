use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field name -> human readable message. Ordered so responses are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first message reported for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was reported.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

#[cfg(test)]
impl FieldErrors {
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(" | ");
        f.write_str(&joined)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Short machine-readable name, used in per-entry bulk outcomes.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::Integrity(_) => "integrity",
            AppError::Database(_) => "database",
        }
    }

    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    /// Message safe to hand to a client; database details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(_) => "Validation failed.".to_string(),
            AppError::Database(_) => "Something went wrong, Contact with system admin".to_string(),
            other => other.to_string(),
        }
    }
}

/// Translates constraint violations that slipped past the pre-checks (two
/// writers racing on one key) into the typed errors callers expect.
pub fn map_constraint(
    err: sqlx::Error,
    conflict: impl FnOnce() -> AppError,
    missing_parent: impl FnOnce() -> AppError,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return conflict();
        }
        if db_err.is_foreign_key_violation() {
            return missing_parent();
        }
    }
    AppError::Database(err)
}

/// Body extractor failures (bad JSON, wrong field types, wrong content type)
/// answer with the same typed body as every other validation failure.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let mut fields = FieldErrors::new();
    fields.add("body", err.to_string());
    AppError::Validation(fields).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let mut fields = FieldErrors::new();
    fields.add("query", err.to_string());
    AppError::Validation(fields).into()
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) | AppError::Integrity(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Database(e) = self {
            tracing::error!(error = %e, "Database error");
        }

        let body = match self.fields() {
            Some(fields) => json!({
                "success": false,
                "error": self.public_message(),
                "fields": fields,
            }),
            None => json!({
                "success": false,
                "error": self.public_message(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
