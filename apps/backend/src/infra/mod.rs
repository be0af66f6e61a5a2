//! Infrastructure: database connection, state assembly, store error mapping.

pub mod db;
pub mod db_errors;
pub mod state;
