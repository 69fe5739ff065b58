//! Admin authentication
//!
//! The HTTP layer only decodes the `Authorization: Basic` header; whether
//! the credentials are good is up to the injected [`Authorizer`].

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Username and password presented by a client
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse an `Authorization` header value of the form `Basic <base64>`.
    ///
    /// Returns `None` for any other scheme, bad base64, non-UTF-8 payloads
    /// or a payload without the `user:password` separator.
    pub fn from_basic_header(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Self::new(username, password))
    }
}

/// Decides whether presented credentials grant admin access
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self, credentials: &Credentials) -> bool;
}

/// A single configured admin account
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    expected: Credentials,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            expected: Credentials::new(username, password),
        }
    }
}

impl Authorizer for StaticCredentials {
    fn is_authorized(&self, credentials: &Credentials) -> bool {
        // Evaluate both so timing does not reveal which one matched.
        let user_ok = constant_time_eq(
            credentials.username.as_bytes(),
            self.expected.username.as_bytes(),
        );
        let pass_ok = constant_time_eq(
            credentials.password.as_bytes(),
            self.expected.password.as_bytes(),
        );
        user_ok & pass_ok
    }
}

/// Rejects everyone; used when no admin account is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Authorizer for DenyAll {
    fn is_authorized(&self, _credentials: &Credentials) -> bool {
        false
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
