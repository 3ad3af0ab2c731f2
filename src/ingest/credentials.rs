//! API credentials and the rotation pool
//!
//! Keys rotate only when the upstream reports quota exhaustion. The pool is
//! owned by the ingestion loop; rotation needs `&mut self`, so there is no
//! shared cursor to race on.

use crate::ConfigError;
use serde::Deserialize;
use std::fmt;

/// An opaque search API key
///
/// `Debug` and `Display` only show the last four characters.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building requests
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form safe for logs
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Ordered credentials with a cursor on the active one
#[derive(Debug, Clone)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
    cursor: usize,
}

impl CredentialPool {
    /// Creates a pool starting at the first credential
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::MissingCredentials)` - `credentials` is empty
    pub fn new(credentials: Vec<Credential>) -> Result<Self, ConfigError> {
        if credentials.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(Self {
            credentials,
            cursor: 0,
        })
    }

    /// The active credential
    pub fn current(&self) -> &Credential {
        &self.credentials[self.cursor]
    }

    /// Advances to the next credential, wrapping after the last, and returns it
    pub fn rotate(&mut self) -> &Credential {
        self.cursor = (self.cursor + 1) % self.credentials.len();
        self.current()
    }

    /// Index of the active credential
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Number of credentials; never zero
    pub fn size(&self) -> usize {
        self.credentials.len()
    }
}
