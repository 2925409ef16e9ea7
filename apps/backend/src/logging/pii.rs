//! Redaction of personal data and credentials in log output.
//!
//! Guests and staff show up in logs by email and phone number, and backend
//! tokens travel through the gateway on every call; none of them may be
//! written out verbatim.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

/// International or local phone numbers of at least 7 digits.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\+?\d[\d\s().-]{5,}\d").unwrap()
});

/// Opaque credentials: JWT segments, base64 or hex runs of 16+ characters.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9+/_-]{16,}={0,2}(\.[A-Za-z0-9_-]+){0,2}").unwrap()
});

/// Mask emails (first character of the local part kept), phone numbers
/// (last two digits kept) and opaque tokens. Emails go first so their
/// local parts are not mistaken for tokens.
pub fn redact(input: &str) -> String {
    let emails = EMAIL.replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                format!("{}***@{domain}", &local[..1])
            }
            _ => full.to_string(),
        }
    });
    let tokens = TOKEN.replace_all(&emails, "[REDACTED_TOKEN]");
    PHONE
        .replace_all(&tokens, |caps: &regex::Captures| {
            let digits: String = caps[0].chars().filter(char::is_ascii_digit).collect();
            format!("***{}", &digits[digits.len().saturating_sub(2)..])
        })
        .to_string()
}

/// Displays the wrapped string with [`redact`] applied.
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
