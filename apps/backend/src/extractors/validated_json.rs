use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::middleware::trace_span::current_trace_id;

/// JSON body whose parse failures become a 400 problem-details response
/// instead of actix's plain-text error.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(_req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        Box::pin(async move {
            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(trace_id = %current_trace_id(), error = %e, "Failed to read request body chunk");
                    AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
                })?;
                body.extend_from_slice(&chunk);
            }

            let parsed = serde_json::from_slice::<T>(&body).map_err(|e| {
                debug!(
                    trace_id = %current_trace_id(),
                    error = %Redacted(&e.to_string()),
                    body_size = body.len(),
                    "JSON parsing failed"
                );
                AppError::bad_request(ErrorCode::BadRequest, classify_json_error(&e))
            })?;

            Ok(ValidatedJson(parsed))
        })
    }
}

/// Client-facing description of a parse failure; never echoes the body.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!("Invalid JSON at line {}", error.line())
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            "Invalid JSON: wrong types for one or more fields".to_string()
        }
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct DonationBody {
        ngo_name: String,
        amount: f64,
    }

    #[test]
    fn test_classify_json_error() {
        let syntax = serde_json::from_str::<DonationBody>(r#"{"ngo_name": }"#).unwrap_err();
        assert_eq!(classify_json_error(&syntax), "Invalid JSON at line 1");

        let eof = serde_json::from_str::<DonationBody>(r#"{"ngo_name": "x""#).unwrap_err();
        assert!(classify_json_error(&eof).contains("unexpected end of input"));

        let data =
            serde_json::from_str::<DonationBody>(r#"{"ngo_name": 1, "amount": "x"}"#).unwrap_err();
        assert!(classify_json_error(&data).contains("wrong types"));
    }

    #[actix_web::test]
    async fn test_extracts_valid_body() {
        let (req, mut payload) = TestRequest::post()
            .set_payload(r#"{"ngo_name":"Helping Hands","amount":250.5}"#)
            .to_http_parts();
        let body = ValidatedJson::<DonationBody>::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(body.ngo_name, "Helping Hands");
        assert_eq!(body.into_inner().amount, 250.5);
    }

    #[actix_web::test]
    async fn test_invalid_body_is_bad_request() {
        let (req, mut payload) = TestRequest::post().set_payload("not json").to_http_parts();
        let err = ValidatedJson::<DonationBody>::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }
}
