//! In-memory credential cell with durable persistence.
//!
//! The store is the single shared mutable resource of the request pipeline.
//! `get` is synchronous and reads the in-memory copy; `set` and `clear`
//! update memory first and then mirror the change to disk. Disk failures
//! are logged and otherwise ignored, so in-memory state stays authoritative
//! for the current process. The file is only consulted once, at startup.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use remora_core::Credential;

use crate::persistence::{default_credential_path, load_json, remove_file, save_json};

/// Shared credential store.
///
/// Cloning is cheap; all clones observe the same credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    current: RwLock<Option<Credential>>,
    /// Backing file. `None` for in-memory stores (tests).
    path: Option<PathBuf>,
}

impl CredentialStore {
    /// Opens the store at the default credential path, loading any
    /// previously persisted credential.
    pub async fn open_default() -> Self {
        Self::open(default_credential_path()).await
    }

    /// Opens the store backed by the given file, loading any previously
    /// persisted credential. A missing or unreadable file starts the store
    /// empty.
    pub async fn open(path: PathBuf) -> Self {
        let current = match load_json::<Credential>(&path).await {
            Ok(cred) => {
                debug!("Loaded persisted credential");
                Some(cred)
            }
            Err(crate::StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted credential, starting empty");
                None
            }
        };

        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(current),
                path: Some(path),
            }),
        }
    }

    /// Creates a store with no backing file. Used in tests and for
    /// ephemeral sessions.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(None),
                path: None,
            }),
        }
    }

    /// Returns the current credential, if any.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned, which only happens if a thread
    /// panicked while holding it.
    pub fn get(&self) -> Option<Credential> {
        self.inner.current.read().unwrap().clone()
    }

    /// Returns true if a credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.inner.current.read().unwrap().is_some()
    }

    /// Returns the current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.inner
            .current
            .read()
            .unwrap()
            .as_ref()
            .and_then(|c| c.refresh_token.clone())
    }

    /// Replaces the current credential.
    ///
    /// Memory is updated before the disk write; a failed write is logged
    /// and does not surface to the caller.
    pub async fn set(&self, credential: Credential) {
        *self.inner.current.write().unwrap() = Some(credential.clone());

        if let Some(path) = &self.inner.path {
            if let Err(e) = save_json(path, &credential).await {
                warn!(error = %e, "Failed to persist credential");
            }
        }
    }

    /// Clears the current credential and removes the persisted copy.
    pub async fn clear(&self) {
        *self.inner.current.write().unwrap() = None;

        if let Some(path) = &self.inner.path {
            if let Err(e) = remove_file(path).await {
                warn!(error = %e, "Failed to remove persisted credential");
            }
        }
        debug!("Credential cleared");
    }
}

// ============================================================================
// Tests
// ============================================================================
