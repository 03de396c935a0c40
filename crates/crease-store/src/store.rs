//! Document storage.
//!
//! The whole scoreboard round-trips as one JSON document. [`MatchStore`] is
//! the seam a real backend plugs into; [`MemoryStore`] is the in-process
//! implementation used for local operation and tests. Subscribers get a
//! [`ChangeEvent`] on every committed save so display surfaces know when to
//! reload.

use std::sync::Arc;

use async_trait::async_trait;
use crease_types::{ScoreboardDocument, StreamId};
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

use crate::error::StoreError;

/// What a committed save changed, for subscribers deciding what to refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// One scorer stream's live state changed.
    StreamUpdated(StreamId),
    /// Teams, bracket, history, or a season reset changed the wider document.
    DocumentUpdated,
}

/// Persistence seam for the scoreboard document.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Load the current document. A store with nothing saved yet returns the
    /// empty default document.
    async fn load(&self) -> Result<ScoreboardDocument, StoreError>;

    /// Persist the document, then notify subscribers with `event`.
    async fn save(
        &self,
        document: &ScoreboardDocument,
        event: ChangeEvent,
    ) -> Result<(), StoreError>;

    /// Subscribe to change notifications for saves committed after this call.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}

#[async_trait]
impl<S: MatchStore + ?Sized> MatchStore for Arc<S> {
    async fn load(&self) -> Result<ScoreboardDocument, StoreError> {
        (**self).load().await
    }

    async fn save(
        &self,
        document: &ScoreboardDocument,
        event: ChangeEvent,
    ) -> Result<(), StoreError> {
        (**self).save(document, event).await
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        (**self).subscribe()
    }
}

/// In-process store backed by the serialized JSON document.
///
/// Serializing on every save keeps its behavior honest against a real
/// backend: what comes out of [`MemoryStore::load`] has been through the
/// same round-trip a remote document store would impose.
pub struct MemoryStore {
    raw: RwLock<Option<String>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            raw: RwLock::new(None),
            events,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn load(&self) -> Result<ScoreboardDocument, StoreError> {
        let raw = self.raw.read().await;
        match raw.as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(ScoreboardDocument::default()),
        }
    }

    async fn save(
        &self,
        document: &ScoreboardDocument,
        event: ChangeEvent,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(document)?;
        *self.raw.write().await = Some(json);
        debug!(?event, "document saved");
        // No receivers is fine; nobody is watching yet.
        let _ = self.events.send(event);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}
