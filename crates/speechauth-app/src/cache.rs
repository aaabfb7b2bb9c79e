// Rust guideline compliant 2026-10-18

//! Access token caching.
//!
//! The core resolver always asks its credential for a token. Reuse across
//! requests is the application's concern and lives here.

use chrono::{DateTime, Duration, Utc};
use speechauth_core::{AccessToken, Result, TokenCredential};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Default lifetime of a cached token.
pub const DEFAULT_TTL_MINUTES: i64 = 60;

/// Tokens expiring within this window are refreshed early.
pub const DEFAULT_EXPIRY_SKEW_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
struct CacheEntry {
    token: AccessToken,
    fetched_at: DateTime<Utc>,
}

/// Credential wrapper caching tokens per scope.
///
/// An entry is reused until it is older than the TTL or its token expires
/// within the skew window, whichever comes first.
#[derive(Debug)]
pub struct CachedCredential<C> {
    inner: C,
    ttl: Duration,
    skew: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<C: TokenCredential> CachedCredential<C> {
    /// Wraps a credential with the default TTL and skew.
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self::with_ttl(inner, Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    /// Wraps a credential with a custom TTL.
    #[must_use]
    pub fn with_ttl(inner: C, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            skew: Duration::minutes(DEFAULT_EXPIRY_SKEW_MINUTES),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Overrides the early-refresh window.
    #[must_use]
    pub fn with_skew(mut self, skew: Duration) -> Self {
        self.skew = skew;
        self
    }

    /// Returns the wrapped credential.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drops every cached token.
    pub fn invalidate(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn cached(&self, scope: &str, now: DateTime<Utc>) -> Option<AccessToken> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(scope)?;
        let fresh = entry.fetched_at + self.ttl > now && !entry.token.expires_within(now, self.skew);
        fresh.then(|| entry.token.clone())
    }
}

impl<C: TokenCredential> TokenCredential for CachedCredential<C> {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let now = Utc::now();
        if let Some(token) = self.cached(scope, now) {
            debug!(%scope, "access token served from cache");
            return Ok(token);
        }

        let token = self.inner.get_token(scope)?;
        debug!(%scope, expires_on = %token.expires_on, "access token cached");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                scope.to_string(),
                CacheEntry {
                    token: token.clone(),
                    fetched_at: now,
                },
            );
        Ok(token)
    }
}
