//! Clip feed loading
//!
//! Glue between a clip store and the ranking engine. A [`ClipSource`]
//! delivers a materialized batch; [`ClipFeed`] bounds the fetch with a
//! timeout, snapshots the current [`RankMode`] once, and ranks the batch.
//! The engine itself never performs I/O.

use crate::models::{ContentItem, RankMode, RankedResult};
use crate::services::mode::ModeHolder;
use crate::services::ranking::RankingEngine;
use crate::services::snapshot::{self, SnapshotError, MAX_CLIP_RESULTS};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Clip fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to read clip snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Clip source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;

/// Supplies batches of clips to rank.
#[async_trait]
pub trait ClipSource: Send + Sync {
    /// Fetch at most `limit` clips.
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<ContentItem>>;
}

/// Reads clips from a snapshot file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ClipSource for JsonFileSource {
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<ContentItem>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let items = snapshot::parse_snapshot(&raw, limit)?;
        debug!(path = %self.path.display(), count = items.len(), "Loaded clip snapshot");
        Ok(items)
    }
}

/// Fetches and ranks clip batches.
pub struct ClipFeed<S> {
    source: S,
    engine: RankingEngine,
    mode: Arc<ModeHolder>,
    limit: usize,
    fetch_timeout: Duration,
}

impl<S: ClipSource> ClipFeed<S> {
    pub fn new(source: S, engine: RankingEngine, mode: Arc<ModeHolder>) -> Self {
        Self {
            source,
            engine,
            mode,
            limit: MAX_CLIP_RESULTS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn mode(&self) -> &Arc<ModeHolder> {
        &self.mode
    }

    /// Fetch a batch and rank it with the mode current at ranking time.
    pub async fn load(&self) -> Result<RankedResult> {
        let started = Instant::now();

        let items = tokio::time::timeout(self.fetch_timeout, self.source.fetch_batch(self.limit))
            .await
            .map_err(|_| {
                warn!(
                    timeout_ms = self.fetch_timeout.as_millis() as u64,
                    "Clip fetch timed out"
                );
                FeedError::Timeout(self.fetch_timeout)
            })??;

        let mode: RankMode = self.mode.load();
        let ranked = self.engine.rank(&items, mode);

        info!(
            mode = mode.as_str(),
            count = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Clip feed loaded"
        );

        Ok(ranked)
    }
}

impl<S: ClipSource + 'static> ClipFeed<S> {
    /// Load in a background task and hand the outcome to `on_complete`.
    ///
    /// Aborting the returned handle cancels the load; `on_complete` is then
    /// never called.
    pub fn spawn_load<F>(self: Arc<Self>, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<RankedResult>) + Send + 'static,
    {
        tokio::spawn(async move {
            let result = self.load().await;
            on_complete(result);
        })
    }
}
