//! End-to-end rendering properties, exercised through the public API with
//! an in-memory document source.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::collections::HashMap;

use swingsite::config::SiteConfig;
use swingsite::data::RaceDataset;
use swingsite::fetch::DocumentFetcher;
use swingsite::geo::states::{code_for_fips, FIPS_CODES};
use swingsite::geo::topology::Feature;
use swingsite::site::detail_view;
use swingsite::views::detail::{format_price, NOT_FOUND_TITLE};
use swingsite::views::map::{MapModel, PointerEvent, Tooltip, OTHER_FILL, SWING_FILL};
use swingsite::views::tracker::{countdown, Countdown};

struct MemoryFetcher(HashMap<String, String>);

#[async_trait]
impl DocumentFetcher for MemoryFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        self.0
            .get(location)
            .cloned()
            .ok_or_else(|| anyhow!("not found: {}", location))
    }
}

fn races_json() -> String {
    r#"{
        "updated_at": "2026-02-20 12:00 UTC",
        "swing_states": [
            {"state": "NC", "state_name": "North Carolina", "cook_rating": "Toss Up",
             "odds": {"polymarket": [{"title": "NC", "url": "https://polymarket.com/event/nc", "yes_price": 0.627}],
                      "kalshi": [{"title": "NC K", "url": "https://kalshi.com/markets/NC", "yes_price": null}]}},
            {"state": "GA", "state_name": "Georgia", "cook_rating": "Toss Up"},
            {"state": "ME", "state_name": "Maine", "cook_rating": "Toss Up"},
            {"state": "AK", "state_name": "Alaska", "cook_rating": "Lean Republican"}
        ]
    }"#
    .to_string()
}

fn dataset() -> RaceDataset {
    serde_json::from_str(&races_json()).unwrap()
}

/// One tiny square per state in the static table, all inside the lower 48.
fn all_state_features() -> Vec<Feature> {
    FIPS_CODES
        .iter()
        .enumerate()
        .map(|(i, &fips)| {
            let lon = -120.0 + (i % 10) as f64 * 5.0;
            let lat = 30.0 + (i / 10) as f64 * 3.0;
            Feature {
                id: Some(fips),
                name: None,
                polygons: vec![vec![vec![
                    [lon, lat],
                    [lon + 1.0, lat],
                    [lon + 1.0, lat + 1.0],
                    [lon, lat],
                ]]],
            }
        })
        .collect()
}

#[test]
fn states_without_records_are_other_colored_and_inert() {
    let ds = dataset();
    let model = MapModel::build(&all_state_features(), &ds, &SiteConfig::default()).unwrap();
    let mut tip = Tooltip::default();
    for (i, region) in model.regions.iter().enumerate() {
        let code = region.code.unwrap();
        assert_eq!(code_for_fips(region.fips.unwrap()), Some(code));
        if ds.record(code).is_none() {
            assert_eq!(region.fill, OTHER_FILL, "{}", code);
            assert!(!region.interactive);
            assert_eq!(model.handle(&mut tip, PointerEvent::Click { region: i }), None);
        } else {
            assert_eq!(region.fill, SWING_FILL, "{}", code);
        }
    }
}

#[test]
fn every_swing_state_click_navigates_to_its_detail_page() {
    let ds = dataset();
    let model = MapModel::build(&all_state_features(), &ds, &SiteConfig::default()).unwrap();
    let mut tip = Tooltip::default();
    for record in &ds.swing_states {
        let idx = model
            .regions
            .iter()
            .position(|r| r.code == Some(record.state.as_str()))
            .unwrap();
        let nav = model.handle(&mut tip, PointerEvent::Click { region: idx }).unwrap();
        assert_eq!(nav.href, format!("state.html?state={}", record.state));
    }
}

#[test]
fn odds_labels() {
    let ds = dataset();
    let nc = ds.record("NC").unwrap();
    assert_eq!(format_price(nc.odds.polymarket[0].probability()), "62.7%");
    assert_eq!(format_price(nc.odds.kalshi[0].probability()), "N/A");
}

fn fetcher() -> MemoryFetcher {
    MemoryFetcher(HashMap::from([("data/races.json".to_string(), races_json())]))
}

#[tokio::test]
async fn lowercase_query_matches_record() {
    let cfg = SiteConfig::default();
    let rendered = detail_view(&fetcher(), &cfg, Some("?state=nc")).await;
    assert_eq!(rendered.page.title, "North Carolina Senate Race");
    assert!(rendered.page.render().contains("62.7%"));
}

#[tokio::test]
async fn unknown_state_shows_not_found_and_no_lists() {
    let cfg = SiteConfig::default();
    let rendered = detail_view(&fetcher(), &cfg, Some("?state=wy")).await;
    assert_eq!(rendered.page.title, NOT_FOUND_TITLE);
    assert!(!rendered.page.failed);
    let html = rendered.page.render();
    assert!(!html.contains("<ul"));
    assert!(!html.contains("Polymarket"));
}

#[tokio::test]
async fn unreachable_races_document_shows_banner() {
    let cfg = SiteConfig::default();
    let empty = MemoryFetcher(HashMap::new());
    let rendered = detail_view(&empty, &cfg, Some("?state=nc")).await;
    assert!(rendered.page.failed);
    assert!(rendered.inputs.is_empty());
}

#[test]
fn countdown_two_days_out_and_after() {
    let cdt = FixedOffset::east_opt(-5 * 3600).unwrap();
    let now = DateTime::parse_from_rfc3339("2026-05-17T00:00:00-05:00")
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(countdown("2026-05-19", now, cdt).to_string(), "2 days, 0 hours");
    assert_eq!(
        countdown("2026-05-19", now + Duration::days(3), cdt),
        Countdown::Arrived
    );
}
