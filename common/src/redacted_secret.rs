//! Secure credential handling with redacted Debug output.

use crate::{ErrorLocation, RedactError};

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

/// A credential string (access token or API key) that never exposes its
/// value in logs or debug output.
#[derive(Clone)]
pub struct RedactedSecret {
    inner: String,
}

impl RedactedSecret {
    /// Create a new redacted secret.
    pub fn new(value: String) -> Self {
        Self { inner: value }
    }

    /// Get the actual value for transmission.
    ///
    /// # Security Note
    /// Only call this when actually placing the value into a request header.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the secret length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the secret is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<&str> for RedactedSecret {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl fmt::Debug for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedSecret([REDACTED])")
    }
}

impl fmt::Display for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED SECRET]")
    }
}

impl Drop for RedactedSecret {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Prevent accidental serialization
impl serde::Serialize for RedactedSecret {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from(
                "RedactedSecret cannot be serialized - use as_str() explicitly",
            ),
            location: ErrorLocation::here(),
        }))
    }
}
