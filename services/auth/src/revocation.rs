//! In-memory revocation list for logged out tokens

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::jwt::now_secs;

/// Revoked token IDs mapped to the expiry of the token they belong to
///
/// An entry only has to outlive its token; once the token is expired the
/// signature check rejects it anyway and the entry is purged.
#[derive(Debug, Clone, Default)]
pub struct RevocationList {
    entries: Arc<Mutex<HashMap<Uuid, u64>>>,
}

impl RevocationList {
    /// Create an empty revocation list
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke a token until `expires_at` (Unix seconds)
    pub async fn revoke(&self, jti: Uuid, expires_at: u64) {
        let mut entries = self.entries.lock().await;
        let now = now_secs();

        let before = entries.len();
        entries.retain(|_, exp| *exp > now);
        let purged = before - entries.len();
        if purged > 0 {
            debug!("Purged {} expired revocations", purged);
        }

        if expires_at > now {
            entries.insert(jti, expires_at);
            info!("Revoked token {}", jti);
        }
    }

    /// Check whether a token ID has been revoked
    pub async fn is_revoked(&self, jti: &Uuid) -> bool {
        let entries = self.entries.lock().await;
        entries.get(jti).is_some_and(|exp| *exp > now_secs())
    }

    /// Number of tracked revocations
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
