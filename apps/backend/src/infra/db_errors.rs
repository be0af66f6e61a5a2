//! SeaORM -> AppError translation.
//!
//! Repositories return `sea_orm::DbErr`; `AppError: From<DbErr>` routes
//! through here so every store failure is classified and logged once.

use tracing::{error, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::middleware::trace_span::current_trace_id;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Map PostgreSQL unique constraint names to a specific conflict.
fn unique_conflict(error_msg: &str) -> (ErrorCode, &'static str) {
    if error_msg.contains("users_email_key") {
        (ErrorCode::UniqueEmail, "Email already registered")
    } else if error_msg.contains("ngos_name_key") {
        (ErrorCode::UniqueViolation, "NGO name already registered")
    } else {
        (ErrorCode::UniqueViolation, "Unique constraint violation")
    }
}

/// Translate a `DbErr` into an `AppError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> AppError {
    let error_msg = e.to_string();
    let trace_id = current_trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return AppError::not_found(ErrorCode::NotFound, "Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return AppError::db_unavailable();
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");
        let (code, detail) = unique_conflict(&error_msg);
        return AppError::conflict(code, detail);
    }

    if mentions_sqlstate(&error_msg, "23503") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return AppError::conflict(
            ErrorCode::FkViolation,
            "Referenced record does not exist",
        );
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    AppError::db(error_msg)
}
