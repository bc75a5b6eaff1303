//! Mock orbit source for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::orbits::{ElementSnapshot, OrbitSource, SpaceTrackError};

/// Mock implementation of the OrbitSource trait.
///
/// Serves a fixed snapshot set, counts calls, and can fail either step.
///
/// ```rust,ignore
/// let source = MockOrbitSource::new();
/// source.set_snapshots(vec![fixtures::snapshot("100", "15.5")]).await;
/// source.fail_next_login(SpaceTrackError::AuthenticationFailed("nope".into())).await;
/// ```
#[derive(Debug, Default)]
pub struct MockOrbitSource {
    snapshots: RwLock<Vec<ElementSnapshot>>,
    /// If set, the next login fails with this error.
    login_error: RwLock<Option<SpaceTrackError>>,
    /// If set, the next fetch fails with this error.
    fetch_error: RwLock<Option<SpaceTrackError>>,
    login_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MockOrbitSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_snapshots(&self, snapshots: Vec<ElementSnapshot>) {
        *self.snapshots.write().await = snapshots;
    }

    pub async fn fail_next_login(&self, error: SpaceTrackError) {
        *self.login_error.write().await = Some(error);
    }

    pub async fn fail_next_fetch(&self, error: SpaceTrackError) {
        *self.fetch_error.write().await = Some(error);
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrbitSource for MockOrbitSource {
    async fn login(&self) -> Result<(), SpaceTrackError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        match self.login_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn latest_elements(&self) -> Result<Vec<ElementSnapshot>, SpaceTrackError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fetch_error.write().await.take() {
            return Err(error);
        }
        Ok(self.snapshots.read().await.clone())
    }
}
