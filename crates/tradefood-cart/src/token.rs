//! Persisted auth token and change notification.
//!
//! The token file is the only source of truth for session mode. A watcher
//! task polls it and turns changes into [`SessionEvent::TokenChanged`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tradefood_core::{AuthToken, SessionEvent};

use crate::error::StorageError;

/// File-backed token storage. A missing or blank file means "no token".
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current token. Read failures are logged and read as absent.
    #[must_use]
    pub fn read(&self) -> Option<AuthToken> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => AuthToken::new(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read token file");
                None
            }
        }
    }

    /// Persists `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory or file cannot be written.
    pub fn write(&self, token: &AuthToken) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, token.as_str()).map_err(|e| self.io_error(e))
    }

    /// Deletes the token file. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be removed.
    pub fn remove(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Polls `store` every `interval` and sends `TokenChanged` whenever the
/// token differs from the last observed value.
///
/// The first observation is taken when the task starts and is not reported.
/// The task ends when the receiver is dropped.
pub fn spawn_token_watcher(
    store: TokenStore,
    interval: Duration,
    events: mpsc::Sender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = store.read();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let current = store.read();
            if current == last {
                continue;
            }
            tracing::info!(
                path = %store.path().display(),
                present = current.is_some(),
                "auth token changed"
            );
            last.clone_from(&current);
            if events.send(SessionEvent::TokenChanged(current)).await.is_err() {
                tracing::debug!("session listener gone; stopping token watcher");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> TokenStore {
        TokenStore::new(
            std::env::temp_dir()
                .join(format!("tradefood-token-{}", uuid::Uuid::new_v4()))
                .join("token"),
        )
    }

    fn cleanup(store: &TokenStore) {
        if let Some(dir) = store.path().parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn missing_file_reads_as_no_token() {
        assert!(temp_store().read().is_none());
    }

    #[test]
    fn write_then_read_returns_token() {
        let store = temp_store();
        let token = AuthToken::new("tok-123").unwrap();
        store.write(&token).unwrap();
        assert_eq!(store.read(), Some(token));
        cleanup(&store);
    }

    #[test]
    fn blank_file_reads_as_no_token() {
        let store = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "  \n").unwrap();
        assert!(store.read().is_none());
        cleanup(&store);
    }

    #[test]
    fn remove_is_idempotent() {
        let store = temp_store();
        store.write(&AuthToken::new("tok").unwrap()).unwrap();
        store.remove().unwrap();
        assert!(store.read().is_none());
        store.remove().unwrap();
        cleanup(&store);
    }

    #[tokio::test]
    async fn watcher_reports_write_and_removal() {
        let store = temp_store();
        let (tx, mut rx) = mpsc::channel(4);
        let handle = spawn_token_watcher(store.clone(), Duration::from_millis(10), tx);

        // Let the watcher take its initial observation.
        tokio::time::sleep(Duration::from_millis(30)).await;
        let token = AuthToken::new("fresh").unwrap();
        store.write(&token).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(SessionEvent::TokenChanged(Some(token))));

        store.remove().unwrap();
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(SessionEvent::TokenChanged(None)));

        drop(rx);
        handle.abort();
        cleanup(&store);
    }
}
