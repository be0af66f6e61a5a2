//! Error handling for the GiveTrack backend.

pub mod error_code;

pub use error_code::ErrorCode;
