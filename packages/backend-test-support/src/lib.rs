//! Shared helpers for the backend's integration tests: one-time logging
//! setup and assertions on problem-details error responses.

pub mod logging;
pub mod problem_details;

pub use problem_details::assert_problem_details;
