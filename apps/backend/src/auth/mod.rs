pub mod claims;
pub mod jwt;
pub mod token;

pub use claims::{Principal, Role};
pub use jwt::{issue_session, verify_session};
