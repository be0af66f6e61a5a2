//! `users` table. Passwords are hashed and checked by Postgres (pgcrypto).

use sea_orm::{ConnectionTrait, FromQueryResult};

use super::{fetch_id, pg};
use crate::auth::claims::Role;
use crate::error::AppError;

#[derive(Debug, Clone, FromQueryResult)]
pub struct LoginRow {
    pub user_id: i64,
    pub role: String,
}

/// The user whose email, role and password all match, if any.
pub async fn find_by_credentials<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    role: Role,
    password: &str,
) -> Result<Option<LoginRow>, AppError> {
    let stmt = pg(
        "SELECT user_id::bigint AS user_id, role \
         FROM users \
         WHERE email = $1 AND role = $2 AND password_hash = crypt($3, password_hash)",
        vec![email.into(), role.as_db_str().into(), password.into()],
    );
    Ok(LoginRow::find_by_statement(stmt).one(conn).await?)
}

pub async fn create_user<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    password: &str,
    role: Role,
) -> Result<i64, AppError> {
    let stmt = pg(
        "INSERT INTO users (email, password_hash, role) \
         VALUES ($1, crypt($2, gen_salt('bf')), $3) \
         RETURNING user_id::bigint AS id",
        vec![email.into(), password.into(), role.as_db_str().into()],
    );
    fetch_id(conn, stmt)
        .await?
        .ok_or_else(|| AppError::internal("INSERT INTO users returned no row"))
}
