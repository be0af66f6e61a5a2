//! Login and signup.

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::{issue_session, Role};
use crate::domain::validation::{required_text, validate_email};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::{donors, ngos, users};
use crate::state::SecurityConfig;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user_id: i64,
    pub role: Role,
    pub token: String,
}

pub async fn login(
    conn: &DatabaseConnection,
    security: &SecurityConfig,
    req: &LoginRequest,
) -> Result<LoginResponse, AppError> {
    let email = validate_email(required_text("email", req.email.as_deref())?)?;
    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::invalid(ErrorCode::MissingField, "Missing required field: password"))?;
    // An unknown role cannot match any account.
    let role = Role::parse(required_text("role", req.role.as_deref())?)
        .ok_or_else(AppError::invalid_credentials)?;

    let Some(user) = users::find_by_credentials(conn, &email, role, password).await? else {
        warn!(email = %Redacted(&email), role = %role, "Login rejected");
        return Err(AppError::invalid_credentials());
    };

    let role = Role::parse(&user.role).unwrap_or(role);
    let token = issue_session(
        user.user_id,
        role,
        security.session_ttl,
        OffsetDateTime::now_utc(),
        &security.secret,
    );
    info!(user_id = user.user_id, role = %role, "Login successful");

    Ok(LoginResponse {
        message: "Login successful",
        user_id: user.user_id,
        role,
        token,
    })
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub organization: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user_id: i64,
    pub role: Role,
}

/// Creates the user and its donor/NGO row in one transaction.
pub async fn signup(
    conn: &DatabaseConnection,
    req: &SignupRequest,
) -> Result<SignupResponse, AppError> {
    let email = validate_email(required_text("email", req.email.as_deref())?)?;
    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::invalid(ErrorCode::MissingField, "Missing required field: password"))?;
    let role = match Role::parse(required_text("role", req.role.as_deref())?) {
        Some(role @ (Role::Donor | Role::Ngo)) => role,
        _ => {
            return Err(AppError::invalid(
                ErrorCode::InvalidRole,
                "Role must be donor or ngo",
            ))
        }
    };

    let txn = conn.begin().await?;
    let user_id = users::create_user(&txn, &email, password, role).await?;
    match role {
        Role::Donor => donors::create(&txn, user_id, req.name.as_deref(), &email).await?,
        _ => ngos::create(&txn, user_id, req.organization.as_deref(), &email).await?,
    }
    txn.commit().await?;

    info!(user_id, role = %role, email = %Redacted(&email), "Signup successful");

    Ok(SignupResponse {
        message: "Signup successful",
        user_id,
        role,
    })
}
