//! Page source types

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static EXTRA_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w*:/=-]+$").expect("valid regex"));

/// Status and body of one response, before interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body text
    pub body: String,
}

impl RawResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a 200 response
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

/// Additional query argument sent with every request
///
/// Either `key=value` or a bare `key` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraArg {
    /// Parameter name
    pub key: String,
    /// Parameter value; `None` for a flag
    pub value: Option<String>,
}

impl ExtraArg {
    /// Create a `key=value` argument
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Create a bare flag argument
    pub fn flag(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

impl FromStr for ExtraArg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !EXTRA_ARG.is_match(s) {
            return Err(Error::invalid_argument(
                "extra-arg",
                format!("'{s}' may only contain letters, digits and _ * : / = -"),
            ));
        }
        match s.split_once('=') {
            Some((key, _)) if key.is_empty() => Err(Error::invalid_argument(
                "extra-arg",
                format!("'{s}' has an empty parameter name"),
            )),
            Some((key, value)) => Ok(Self::pair(key, value)),
            None => Ok(Self::flag(s)),
        }
    }
}

impl fmt::Display for ExtraArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => f.write_str(&self.key),
        }
    }
}
