//! The caller, resolved from the bearer credential under three policies:
//!
//! - [`Principal`]: required; a missing or invalid credential is a 401.
//! - [`MaybePrincipal`]: optional; missing is anonymous, invalid is a 401.
//! - [`LenientPrincipal`]: missing or invalid are both anonymous.
//!
//! [`CurrentNgo`] and [`CurrentDonor`] additionally resolve the caller's
//! NGO/donor row and answer 404 when there is none.

use std::future::{ready, Ready};
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use tracing::debug;

use super::bearer::bearer_from_request;
use crate::auth::{verify_session, Principal};
use crate::error::AppError;
use crate::repos::{donors, ngos};
use crate::state::AppState;

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::internal("AppState not available"))
}

fn resolve(req: &HttpRequest) -> Result<Option<Principal>, AppError> {
    let Some(token) = bearer_from_request(req) else {
        return Ok(None);
    };
    let state = app_state(req)?;
    verify_session(token, &state.security).map(Some)
}

impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(resolve(req).and_then(|p| p.ok_or_else(AppError::unauthorized_missing_bearer)))
    }
}

/// Anonymous when no credential is sent; an invalid one is still rejected.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

impl FromRequest for MaybePrincipal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(resolve(req).map(MaybePrincipal))
    }
}

/// Anonymous whenever the credential is missing or does not verify.
#[derive(Debug, Clone)]
pub struct LenientPrincipal(pub Option<Principal>);

impl FromRequest for LenientPrincipal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let principal = match resolve(req) {
            Ok(p) => p,
            Err(e) => {
                debug!(code = %e.code(), "Ignoring unusable credential");
                None
            }
        };
        ready(Ok(LenientPrincipal(principal)))
    }
}

/// An authenticated caller that owns an NGO row.
#[derive(Debug, Clone)]
pub struct CurrentNgo {
    pub ngo_id: i64,
    pub principal: Principal,
}

impl FromRequest for CurrentNgo {
    type Error = AppError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let principal = Principal::extract(&req).await?;
            let state = app_state(&req)?;
            let db = state.require_db()?;

            let ngo_id = ngos::find_id_by_user(db, principal.user_id)
                .await?
                .ok_or_else(AppError::ngo_not_found)?;

            Ok(CurrentNgo { ngo_id, principal })
        })
    }
}

/// An authenticated caller that owns a donor row.
#[derive(Debug, Clone)]
pub struct CurrentDonor {
    pub donor_id: i64,
    pub principal: Principal,
}

impl FromRequest for CurrentDonor {
    type Error = AppError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let principal = Principal::extract(&req).await?;
            let state = app_state(&req)?;
            let db = state.require_db()?;

            let donor_id = donors::find_id_by_user(db, principal.user_id)
                .await?
                .ok_or_else(AppError::donor_not_found)?;

            Ok(CurrentDonor {
                donor_id,
                principal,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::header;
    use actix_web::test::TestRequest;
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::auth::{issue_session, Role};
    use crate::errors::ErrorCode;
    use crate::state::SecurityConfig;

    const SECRET: &[u8] = b"extractor-secret";

    fn request(auth: Option<&str>) -> HttpRequest {
        let state = AppState::without_db(SecurityConfig::new(SECRET));
        let mut req = TestRequest::default().app_data(web::Data::new(state));
        if let Some(value) = auth {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        req.to_http_request()
    }

    fn token(ttl: Duration) -> String {
        issue_session(9, Role::Ngo, ttl, OffsetDateTime::now_utc(), SECRET)
    }

    #[actix_web::test]
    async fn test_required_policy() {
        let ok = Principal::extract(&request(Some(&format!("Bearer {}", token(Duration::hours(1))))))
            .await
            .unwrap();
        assert_eq!(ok.user_id, 9);
        assert_eq!(ok.role, Some(Role::Ngo));

        let missing = Principal::extract(&request(None)).await.unwrap_err();
        assert_eq!(missing.code(), ErrorCode::UnauthorizedMissingBearer);

        let garbage = Principal::extract(&request(Some("Bearer not-a-token")))
            .await
            .unwrap_err();
        assert_eq!(garbage.code(), ErrorCode::UnauthorizedInvalidJwt);

        let expired = Principal::extract(&request(Some(&format!(
            "Bearer {}",
            token(Duration::hours(-1))
        ))))
        .await
        .unwrap_err();
        assert_eq!(expired.code(), ErrorCode::UnauthorizedExpiredJwt);
    }

    #[actix_web::test]
    async fn test_optional_strict_policy() {
        let MaybePrincipal(anon) = MaybePrincipal::extract(&request(None)).await.unwrap();
        assert!(anon.is_none());

        let MaybePrincipal(other_scheme) = MaybePrincipal::extract(&request(Some("Basic Zm9v")))
            .await
            .unwrap();
        assert!(other_scheme.is_none());

        let err = MaybePrincipal::extract(&request(Some("Bearer a.b.c")))
            .await
            .unwrap_err();
        assert_eq!(err.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_lenient_policy() {
        let LenientPrincipal(invalid) = LenientPrincipal::extract(&request(Some("Bearer a.b.c")))
            .await
            .unwrap();
        assert!(invalid.is_none());

        let LenientPrincipal(valid) = LenientPrincipal::extract(&request(Some(&format!(
            "Bearer {}",
            token(Duration::hours(1))
        ))))
        .await
        .unwrap();
        assert_eq!(valid.map(|p| p.user_id), Some(9));
    }

    #[actix_web::test]
    async fn test_current_ngo_without_store_is_unavailable() {
        let req = request(Some(&format!("Bearer {}", token(Duration::hours(1)))));
        let err = CurrentNgo::extract(&req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DbUnavailable);
    }
}
