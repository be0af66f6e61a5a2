//! Assertions for the problem-details error contract.

use actix_web::body::{self, BoxBody};
use actix_web::dev::ServiceResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Mirror of the backend's error body, kept independent of backend types.
#[derive(Debug, Deserialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Assert that `resp` is a problem-details response with the given status
/// and code, and return the parsed body for further checks.
///
/// Also checks the `application/problem+json` content type and that the
/// body `trace_id` matches the `x-trace-id` header.
pub async fn assert_problem_details(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ProblemDetailsLike {
    assert_eq!(resp.status(), expected_status);

    let headers = resp.headers().clone();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let trace_id = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present")
        .to_string();
    assert!(!trace_id.is_empty(), "x-trace-id header should not be empty");

    let bytes = body::to_bytes(resp.into_body())
        .await
        .unwrap_or_else(|_| panic!("failed to read error body"));
    let problem: ProblemDetailsLike = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "body is not problem details ({e}): {}",
            String::from_utf8_lossy(&bytes)
        )
    });

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    assert_eq!(
        problem.trace_id, trace_id,
        "trace_id in body should match x-trace-id header"
    );
    assert!(
        problem.type_.ends_with(expected_code),
        "type should end with the code (got {})",
        problem.type_
    );
    assert!(!problem.title.is_empty());

    problem
}
