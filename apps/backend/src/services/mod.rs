//! Use cases behind the HTTP routes: each runs the store queries for one
//! endpoint and shapes the rows into its response body.

pub mod analytics;
pub mod auth;
pub mod donations;
pub mod ngos;
pub mod platform;
pub mod profile;
pub mod utilization;
