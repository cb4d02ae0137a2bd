use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::future::try_join;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::SiteConfig;
use crate::data::{sha256_hex, RaceDataset};
use crate::geo::topology::Topology;
use crate::logging::log_document_loaded;

/// Source of raw JSON documents.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_text(&self, location: &str) -> Result<String>;
}

/// Fetches `http(s)://` locations over the network and everything else
/// from disk, relative to `base_dir`.
pub struct SourceFetcher {
    client: Client,
    base_dir: PathBuf,
}

impl SourceFetcher {
    pub fn new(cfg: &SiteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.fetch_timeout_secs))
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            base_dir: cfg.data_base_dir.clone(),
        })
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

#[async_trait]
impl DocumentFetcher for SourceFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        if is_remote(location) {
            let resp = self.client.get(location).send().await?.error_for_status()?;
            Ok(resp.text().await?)
        } else {
            let path = self.base_dir.join(location);
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(text)
        }
    }
}

/// A parsed document plus the fingerprint of the bytes it came from.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub location: String,
    pub sha256: String,
}

pub async fn load_json<T: DeserializeOwned>(
    fetcher: &dyn DocumentFetcher,
    location: &str,
) -> Result<Loaded<T>> {
    let text = fetcher
        .fetch_text(location)
        .await
        .with_context(|| format!("fetching {}", location))?;
    let value = serde_json::from_str(&text).with_context(|| format!("parsing {}", location))?;
    let sha256 = sha256_hex(text.as_bytes());
    log_document_loaded(location, text.len(), &sha256);
    Ok(Loaded {
        value,
        location: location.to_string(),
        sha256,
    })
}

/// Topology and race data for the map, fetched concurrently. Either failure
/// fails the pair.
pub async fn load_map_inputs(
    fetcher: &dyn DocumentFetcher,
    cfg: &SiteConfig,
) -> Result<(Loaded<Topology>, Loaded<RaceDataset>)> {
    try_join(
        load_json::<Topology>(fetcher, &cfg.topology_url),
        load_json::<RaceDataset>(fetcher, &cfg.races_path),
    )
    .await
}
