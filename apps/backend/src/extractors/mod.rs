//! Request extractors: bearer credentials, the caller under each
//! authentication policy, and JSON bodies with problem-details errors.

pub mod bearer;
pub mod principal;
pub mod validated_json;

pub use principal::{CurrentDonor, CurrentNgo, LenientPrincipal, MaybePrincipal};
pub use validated_json::ValidatedJson;
