//! Pure helpers used to shape API responses. No I/O.

pub mod metrics;
pub mod validation;

#[cfg(test)]
mod tests_props_metrics;
