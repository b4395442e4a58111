//! Credential providers for drive requests.
//!
//! The drive client asks its provider for a token on every request and never
//! keeps the answer, so a token rotated in the underlying store is used by the
//! very next call.

use std::sync::{Arc, RwLock};

/// Source of the bearer token attached to drive requests.
pub trait CredentialProvider: Send + Sync {
    /// Current token, or `None` when no credential is stored.
    fn token(&self) -> Option<String>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Value of the `Authorization` header for a stored token.
///
/// An absent or empty token yields an empty value: the header is always sent.
pub fn authorization_value(token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => format!("Bearer {token}"),
        _ => String::new(),
    }
}

/// Provider without any credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn token(&self) -> Option<String> {
        None
    }
}

/// In-process token store that can be rotated while clients hold it.
#[derive(Debug, Clone, Default)]
pub struct SharedToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new(token: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token)),
        }
    }

    /// Replace the stored token. Subsequent requests use the new value.
    pub fn rotate(&self, token: Option<String>) {
        match self.inner.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

impl CredentialProvider for SharedToken {
    fn token(&self) -> Option<String> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
