//! Renders every view and writes the static site plus `manifest.json`.
//!
//! Views are independent: a load failure in one yields that view's banner
//! page and leaves the others untouched.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use futures_util::future::join3;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::SiteConfig;
use crate::data::{sha256_hex, DataQualityReport, RaceDataset, TrackerDataset};
use crate::fetch::{load_json, load_map_inputs, DocumentFetcher, Loaded};
use crate::logging::{log, log_data_warning, log_page_written, obj, run_id, ts_now, v_str, Domain, Level};
use crate::views::detail::{render_state_detail, render_state_directory, DIRECTORY_TITLE};
use crate::views::map::{render_map_page, MapModel, MAP_TITLE};
use crate::views::tracker::{render_tracker, TRACKER_TITLE};
use crate::views::{error_page, Page};

pub const MAP_FILE: &str = "index.html";
pub const TRACKER_FILE: &str = "tracker.html";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDoc {
    pub location: String,
    pub sha256: String,
}

impl<T> From<&Loaded<T>> for InputDoc {
    fn from(loaded: &Loaded<T>) -> Self {
        Self {
            location: loaded.location.clone(),
            sha256: loaded.sha256.clone(),
        }
    }
}

/// A page plus the documents it was rendered from.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub page: Page,
    pub inputs: Vec<InputDoc>,
    pub quality: Option<DataQualityReport>,
}

impl Rendered {
    fn failed(view: &str, title: &str, err: anyhow::Error) -> Self {
        Self {
            page: error_page(view, title, &err),
            inputs: Vec::new(),
            quality: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Rendered,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub file: String,
    pub status: PageStatus,
    pub bytes: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteReport {
    pub run_id: String,
    pub generated_at: String,
    pub pages: Vec<PageReport>,
    pub inputs: Vec<InputDoc>,
    pub quality: Option<DataQualityReport>,
}

impl SiteReport {
    pub fn page(&self, file: &str) -> Option<&PageReport> {
        self.pages.iter().find(|p| p.file == file)
    }
}

/// Duplicate codes are a load failure; everything else in the report is a warning.
fn check_races(races: &RaceDataset) -> Result<DataQualityReport> {
    let report = races.quality_report();
    for warning in &report.warnings {
        log_data_warning("races", warning);
    }
    if !report.ok() {
        return Err(anyhow!(
            "race data has duplicate state codes: {}",
            report.duplicate_states.join(", ")
        ));
    }
    Ok(report)
}

async fn try_map(fetcher: &dyn DocumentFetcher, cfg: &SiteConfig) -> Result<Rendered> {
    let (topology, races) = load_map_inputs(fetcher, cfg).await?;
    let quality = check_races(&races.value)?;
    let features = topology
        .value
        .features(&cfg.topology_object)
        .context("decoding topology")?;
    let model = MapModel::build(&features, &races.value, cfg)?;
    Ok(Rendered {
        page: render_map_page(&model),
        inputs: vec![InputDoc::from(&topology), InputDoc::from(&races)],
        quality: Some(quality),
    })
}

async fn try_detail(
    fetcher: &dyn DocumentFetcher,
    cfg: &SiteConfig,
    query: Option<&str>,
) -> Result<Rendered> {
    let races: Loaded<RaceDataset> = load_json(fetcher, &cfg.races_path).await?;
    let quality = check_races(&races.value)?;
    let page = match query {
        Some(q) => render_state_detail(&races.value, q),
        None => render_state_directory(&races.value),
    };
    Ok(Rendered {
        page,
        inputs: vec![InputDoc::from(&races)],
        quality: Some(quality),
    })
}

async fn try_tracker(
    fetcher: &dyn DocumentFetcher,
    cfg: &SiteConfig,
    now: DateTime<Utc>,
) -> Result<Rendered> {
    let tracker: Loaded<TrackerDataset> = load_json(fetcher, &cfg.tracker_path).await?;
    Ok(Rendered {
        page: render_tracker(&tracker.value, now, cfg.tracker_offset()),
        inputs: vec![InputDoc::from(&tracker)],
        quality: None,
    })
}

pub async fn map_view(fetcher: &dyn DocumentFetcher, cfg: &SiteConfig) -> Rendered {
    try_map(fetcher, cfg)
        .await
        .unwrap_or_else(|e| Rendered::failed("map", MAP_TITLE, e))
}

/// `Some(query)` renders one state's page; `None` renders the directory
/// page the map links into.
pub async fn detail_view(
    fetcher: &dyn DocumentFetcher,
    cfg: &SiteConfig,
    query: Option<&str>,
) -> Rendered {
    try_detail(fetcher, cfg, query)
        .await
        .unwrap_or_else(|e| Rendered::failed("detail", DIRECTORY_TITLE, e))
}

pub async fn tracker_view(fetcher: &dyn DocumentFetcher, cfg: &SiteConfig, now: DateTime<Utc>) -> Rendered {
    try_tracker(fetcher, cfg, now)
        .await
        .unwrap_or_else(|e| Rendered::failed("tracker", TRACKER_TITLE, e))
}

pub async fn build_site(
    cfg: &SiteConfig,
    fetcher: &dyn DocumentFetcher,
    now: DateTime<Utc>,
) -> Result<SiteReport> {
    tokio::fs::create_dir_all(&cfg.out_dir)
        .await
        .with_context(|| format!("creating {}", cfg.out_dir.display()))?;

    let (map, detail, tracker) = join3(
        map_view(fetcher, cfg),
        detail_view(fetcher, cfg, None),
        tracker_view(fetcher, cfg, now),
    )
    .await;

    let mut report = SiteReport {
        run_id: run_id().to_string(),
        generated_at: ts_now(),
        pages: Vec::new(),
        inputs: Vec::new(),
        quality: detail.quality.clone().or_else(|| map.quality.clone()),
    };

    for (file, rendered) in [
        (MAP_FILE, &map),
        (cfg.detail_page.as_str(), &detail),
        (TRACKER_FILE, &tracker),
    ] {
        let html = rendered.page.render();
        let path = cfg.out_dir.join(file);
        tokio::fs::write(&path, &html)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        let (status, label) = if rendered.page.failed {
            (PageStatus::Error, "error")
        } else {
            (PageStatus::Rendered, "rendered")
        };
        log_page_written(&path.display().to_string(), label, html.len());
        report.pages.push(PageReport {
            file: file.to_string(),
            status,
            bytes: html.len(),
            sha256: sha256_hex(html.as_bytes()),
        });
        for input in &rendered.inputs {
            if !report.inputs.iter().any(|i| i.location == input.location) {
                report.inputs.push(input.clone());
            }
        }
    }

    let manifest = serde_json::to_string_pretty(&report).context("serializing manifest")?;
    let manifest_path = cfg.out_dir.join(MANIFEST_FILE);
    tokio::fs::write(&manifest_path, manifest)
        .await
        .with_context(|| format!("writing {}", manifest_path.display()))?;

    log(
        Level::Info,
        Domain::Site,
        "site_built",
        obj(&[
            ("out_dir", v_str(&cfg.out_dir.display().to_string())),
            ("pages", json!(report.pages.len())),
            (
                "errors",
                json!(report.pages.iter().filter(|p| p.status == PageStatus::Error).count()),
            ),
        ]),
    );
    Ok(report)
}
