use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::services::generation::GenerationTracker;
use crate::services::session::Session;

/// Application shared state accessible from axum handlers and services.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Application configuration
    config: AppConfig,
    /// Form state: selected logo and last committed artifact
    session: RwLock<Session>,
    /// Hands out generation tickets and cancels superseded ones
    generations: GenerationTracker,
    /// Same sequencing for logo uploads, so only the newest one is applied
    logo_uploads: GenerationTracker,
    /// Cancelled on Ctrl+C
    shutdown_token: CancellationToken,
}

impl SharedState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config,
                session: RwLock::new(Session::default()),
                generations: GenerationTracker::default(),
                logo_uploads: GenerationTracker::default(),
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn generations(&self) -> &GenerationTracker {
        &self.inner.generations
    }

    pub fn logo_uploads(&self) -> &GenerationTracker {
        &self.inner.logo_uploads
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    /// Get a read lock on the session.
    pub async fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.session.read().await
    }

    /// Get a write lock on the session.
    pub async fn session_mut(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.session.write().await
    }
}
