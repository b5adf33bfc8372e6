use crate::core::fetcher::ResilientFetcher;
use crate::domain::model::{
    CyberScores, DirectoryEntry, EmbassyRecord, FailureCause, RssSnapshot, SourceLocation,
    Sources, WebsiteStatus,
};
use crate::domain::ports::Transport;
use crate::domain::state::{Action, ViewState};
use crate::utils::error::{Result, WatchError};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;

pub const DEFAULT_CONCURRENT_PROBES: usize = 16;

/// Loads the three datasets, probes every embassy site and folds the
/// results into a [`ViewState`].
pub struct Aggregator<T: Transport> {
    fetcher: ResilientFetcher<T>,
    sources: Sources,
    concurrent_probes: usize,
}

fn dispatch(state: &mut ViewState, action: Action) {
    *state = std::mem::take(state).reduce(action);
}

fn parse<D: DeserializeOwned>(body: &str, resource: &str) -> Result<D> {
    serde_json::from_str(body).map_err(|e| WatchError::MalformedResponseError {
        resource: resource.to_string(),
        message: e.to_string(),
    })
}

// 單筆格式錯誤只略過該筆
fn directory_entries(rows: Vec<serde_json::Value>) -> Vec<DirectoryEntry> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<DirectoryEntry>(row) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("⚠️ Skipping directory row {}: {}", index, e);
                None
            }
        })
        .collect()
}

impl<T: Transport> Aggregator<T> {
    pub fn new(fetcher: ResilientFetcher<T>, sources: Sources, concurrent_probes: usize) -> Self {
        Self {
            fetcher,
            sources,
            concurrent_probes: concurrent_probes.max(1),
        }
    }

    /// Never fails: errors are logged and the state keeps whatever was
    /// loaded before the failure. `loading` is always cleared.
    pub async fn load(&self) -> ViewState {
        let mut state = ViewState::initial();

        if let Err(e) = self.populate(&mut state).await {
            tracing::error!(
                "❌ Failed to load embassy data: {} (Category: {:?})",
                e,
                e.category()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        }

        dispatch(&mut state, Action::LoadFinished);
        state
    }

    async fn populate(&self, state: &mut ViewState) -> Result<()> {
        tracing::info!("📡 Fetching embassy directory from {}", self.sources.directory);
        let body = self.read_source(&self.sources.directory).await?;
        let rows: Vec<serde_json::Value> = parse(&body, "embassy directory")?;
        let directory = directory_entries(rows);
        tracing::info!("📋 Directory lists {} embassies", directory.len());

        tracing::info!("📡 Fetching cyber scores from {}", self.sources.cyber_scores);
        let body = self.read_source(&self.sources.cyber_scores).await?;
        let scores: CyberScores = parse(&body, "cyber score")?;
        tracing::debug!("Cyber scores for {} countries", scores.len());
        dispatch(state, Action::ScoresLoaded(scores));

        tracing::info!("📡 Fetching RSS snapshot from {}", self.sources.rss_feeds);
        let body = self.read_source(&self.sources.rss_feeds).await?;
        let value: serde_json::Value = parse(&body, "RSS snapshot")?;
        if value.is_object() {
            let rss: RssSnapshot =
                serde_json::from_value(value).map_err(|e| WatchError::MalformedResponseError {
                    resource: "RSS snapshot".to_string(),
                    message: e.to_string(),
                })?;
            tracing::debug!("RSS entries for: {:?}", rss.keys().collect::<Vec<_>>());
            dispatch(state, Action::RssLoaded(rss));
        } else {
            // 格式錯誤只記錄，保留原狀態
            tracing::error!("Invalid RSS snapshot format, expected a JSON object");
        }

        let embassies = self.probe_all(directory).await;
        tracing::info!(
            "✅ Probed {} sites, {} online",
            embassies.len(),
            embassies.iter().filter(|e| e.is_online()).count()
        );
        dispatch(state, Action::EmbassiesLoaded(embassies));

        Ok(())
    }

    async fn read_source(&self, source: &SourceLocation) -> Result<String> {
        match source {
            SourceLocation::Remote(url) => Ok(self.fetcher.fetch(url).await?.body),
            SourceLocation::Local(path) => Ok(tokio::fs::read_to_string(path).await?),
        }
    }

    /// Probe one website and attach the status record.
    pub async fn probe(&self, entry: DirectoryEntry) -> EmbassyRecord {
        if !entry.has_website() {
            tracing::debug!("{} has no website, marking offline", entry.name);
            let status = WebsiteStatus::offline(
                "Aucun site internet renseigné",
                Some(FailureCause::Request),
                Utc::now(),
            );
            return EmbassyRecord::from_entry(entry, status);
        }

        let status = match self.fetcher.fetch(&entry.website).await {
            Ok(response) => WebsiteStatus::online(response.status, Utc::now()),
            Err(e) => {
                tracing::debug!("Site {} is offline: {}", entry.website, e);
                WebsiteStatus::offline(e.to_string(), e.failure_cause(), Utc::now())
            }
        };
        EmbassyRecord::from_entry(entry, status)
    }

    // buffered 保留目錄順序
    async fn probe_all(&self, directory: Vec<DirectoryEntry>) -> Vec<EmbassyRecord> {
        stream::iter(directory)
            .map(|entry| self.probe(entry))
            .buffered(self.concurrent_probes)
            .collect()
            .await
    }
}
