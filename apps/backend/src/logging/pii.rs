//! Log redaction for emails and bearer tokens.
//!
//! Tokens and secrets must never reach the logs verbatim; anything that
//! might contain one goes through [`Redacted`].

use std::fmt;

use lazy_regex::regex;

/// Masks emails (first character of the local part survives) and any
/// token-like run of 16+ base64url characters, including dotted compact
/// tokens, with `[REDACTED_TOKEN]`.
pub fn redact(input: &str) -> String {
    let emails = regex!(r"\b([A-Za-z0-9._%+-]+)(@[A-Za-z0-9.-]+\.[A-Za-z]{1,})\b");
    let email_redacted = emails.replace_all(input, |caps: &lazy_regex::Captures| {
        let local = &caps[1];
        let domain = &caps[2];
        match local.chars().next() {
            Some(first) => format!("{first}***{domain}"),
            None => domain.to_string(),
        }
    });

    regex!(r"[A-Za-z0-9_\-+/]{16,}={0,2}(\.[A-Za-z0-9_\-]*){0,2}")
        .replace_all(&email_redacted, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
