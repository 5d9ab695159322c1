//! API key allow-list and the hardcoded login check.
//!
//! The key file is plain text with one key per line, followed by an
//! optional free-form comment:
//!
//! ```text
//! xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx UUID for user X, X@gmail.com
//! yyyyyyyy-yyyy-yyyy-yyyy-yyyyyyyyyyyy UUID for user Y
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Request header carrying the API key.
pub const API_KEY_HEADER: &str = "key";

/// Username accepted by the login stub.
pub const LOGIN_USERNAME: &str = "admin";

/// Password accepted by the login stub.
pub const LOGIN_PASSWORD: &str = "admin";

/// Allow-list loading errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The key file could not be read.
    #[error("failed to read API key file {path}: {source}")]
    Read {
        /// Path of the key file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Immutable set of API keys permitted to call gated endpoints.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyAllowList {
    keys: HashSet<String>,
}

impl ApiKeyAllowList {
    /// Parses a key file body: the first whitespace-delimited token of every
    /// non-empty line is a key.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let keys = content
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect();
        Self { keys }
    }

    /// Loads the allow-list from a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| AuthError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Builds an allow-list from explicit keys.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `key` is present and exactly matches an allowed key.
    #[must_use]
    pub fn is_allowed(&self, key: Option<&str>) -> bool {
        key.is_some_and(|k| self.keys.contains(k))
    }

    /// Number of allowed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no key is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Checks credentials against the hardcoded admin account.
#[must_use]
pub fn check_login(username: Option<&str>, password: Option<&str>) -> bool {
    username == Some(LOGIN_USERNAME) && password == Some(LOGIN_PASSWORD)
}
