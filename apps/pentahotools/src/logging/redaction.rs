//! Sensitive data redaction for log output
//!
//! User passwords travel in request bodies (create user, update password)
//! and the endpoint credentials travel in the Authorization header.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// The replacement string used for redacted values
pub const REDACTED: &str = "[REDACTED]";

static REDACTION_PATTERNS: LazyLock<Vec<RedactionPattern>> = LazyLock::new(|| {
    vec![
        // Authorization header, basic or bearer
        RedactionPattern::new(r"(?i)(Authorization:\s*(?:Basic|Bearer)\s+)\S+", |caps| {
            format!("{}{}", &caps[1], REDACTED)
        }),
        // password, oldPassword, newPassword fields in JSON
        RedactionPattern::new(r#"(?i)("(?:old|new)?password"\s*:\s*")[^"]*""#, |caps| {
            format!("{}{}\"", &caps[1], REDACTED)
        }),
        // password in query strings or form data
        RedactionPattern::new(r"(?i)(\bpassword=)[^&\s]+", |caps| {
            format!("{}{}", &caps[1], REDACTED)
        }),
        // Credentials in URLs (user:password@host)
        RedactionPattern::new(r"(://[^:/\s]+:)[^@\s]+(@)", |caps| {
            format!("{}{}{}", &caps[1], REDACTED, &caps[2])
        }),
    ]
});

/// A pattern for detecting and redacting sensitive data
struct RedactionPattern {
    regex: Regex,
    replacer: Box<dyn Fn(&regex::Captures) -> String + Send + Sync>,
}

impl RedactionPattern {
    fn new<F>(pattern: &str, replacer: F) -> Self
    where
        F: Fn(&regex::Captures) -> String + Send + Sync + 'static,
    {
        Self {
            regex: Regex::new(pattern).expect("Invalid redaction pattern"),
            replacer: Box::new(replacer),
        }
    }

    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.regex
            .replace_all(input, |caps: &regex::Captures| (self.replacer)(caps))
    }
}

/// Redactor for sensitive data in strings
#[derive(Debug, Default)]
pub struct Redactor;

impl Redactor {
    /// Create a new Redactor
    pub fn new() -> Self {
        Self
    }

    /// Redact sensitive data from the input string
    pub fn redact<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut result: Cow<str> = Cow::Borrowed(input);

        for pattern in REDACTION_PATTERNS.iter() {
            let replaced = match pattern.apply(&result) {
                Cow::Owned(owned) => Some(owned),
                Cow::Borrowed(_) => None,
            };
            if let Some(owned) = replaced {
                result = Cow::Owned(owned);
            }
        }

        result
    }

    /// Redact and return an owned String
    pub fn redact_string(&self, input: &str) -> String {
        self.redact(input).into_owned()
    }
}
