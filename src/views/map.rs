//! Map view: one region per topology feature, colored by swing-race
//! membership, with hover tooltips and click-through to the detail page.

use anyhow::{anyhow, Result};

use crate::config::SiteConfig;
use crate::data::{present, RaceDataset};
use crate::geo::projection::AlbersUsa;
use crate::geo::states::{code_for_fips, name_for_code};
use crate::geo::topology::Feature;
use crate::logging::{log, obj, Domain, Level, ProfileScope};
use crate::markup::Markup;
use crate::views::page::Page;
use serde_json::json;

pub const MAP_TITLE: &str = "2026 Senate Swing Races";
pub const SWING_FILL: &str = "#e4572e";
pub const OTHER_FILL: &str = "#d9dde3";
pub const NOT_SWING: &str = "Not a swing race";
pub const NO_DATE: &str = "No date available";
/// Tooltip position relative to the cursor, in pixels.
pub const TOOLTIP_OFFSET: (f64, f64) = (12.0, -28.0);

const TOOLTIP_SCRIPT: &str = "(function(){\
var svg=document.querySelector('svg.us-map'),tip=document.getElementById('tooltip');\
if(!svg||!tip)return;\
var ox=+svg.dataset.offsetX,oy=+svg.dataset.offsetY;\
svg.addEventListener('mousemove',function(e){\
var p=e.target.closest('path[data-name]');\
if(!p){tip.hidden=true;return;}\
tip.textContent='';\
var h=document.createElement('strong');h.textContent=p.dataset.name;tip.appendChild(h);\
[p.dataset.rating,p.dataset.date].forEach(function(t){var d=document.createElement('div');d.textContent=t;tip.appendChild(d);});\
tip.style.left=(e.pageX+ox)+'px';tip.style.top=(e.pageY+oy)+'px';tip.hidden=false;});\
svg.addEventListener('mouseleave',function(){tip.hidden=true;});\
})();";

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub name: String,
    pub rating: String,
    pub primary_date: String,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub fips: Option<u32>,
    /// `None` when the feature id is not in the static table.
    pub code: Option<&'static str>,
    pub path: String,
    pub fill: &'static str,
    /// Clickable: the state has a race record.
    pub interactive: bool,
    pub href: Option<String>,
    /// `None` for unmapped regions, which get no hover either.
    pub tooltip: Option<TooltipContent>,
}

#[derive(Debug, Clone)]
pub struct MapModel {
    pub width: f64,
    pub height: f64,
    pub updated_at: String,
    pub swing_count: usize,
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { region: usize, x: f64, y: f64 },
    Leave,
    Click { region: usize },
}

/// Shown/hidden tooltip state; each event overwrites the last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    pub visible: bool,
    pub left: f64,
    pub top: f64,
    pub content: Option<TooltipContent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub href: String,
}

impl Tooltip {
    fn hide(&mut self) {
        self.visible = false;
        self.content = None;
    }
}

impl MapModel {
    pub fn build(features: &[Feature], dataset: &RaceDataset, cfg: &SiteConfig) -> Result<Self> {
        let _scope = ProfileScope::new("map.build");
        let index = dataset.index().map_err(|e| anyhow!(e))?;
        let projection = AlbersUsa::fit(cfg.map_width, cfg.map_height);

        let mut unmapped = 0usize;
        let regions: Vec<Region> = features
            .iter()
            .map(|feature| {
                let code = feature.id.and_then(code_for_fips);
                let record = code.and_then(|c| index.get(c).copied());
                if code.is_none() {
                    unmapped += 1;
                }
                let tooltip = code.map(|c| {
                    let election = dataset.election_state(c);
                    TooltipContent {
                        name: record
                            .map(|r| r.state_name.clone())
                            .or_else(|| name_for_code(c).map(str::to_string))
                            .unwrap_or_else(|| c.to_string()),
                        rating: record
                            .map(|r| r.cook_rating.clone())
                            .unwrap_or_else(|| NOT_SWING.to_string()),
                        primary_date: record
                            .and_then(|r| r.primary_date_text())
                            .or_else(|| election.and_then(|e| present(&e.primary_date)))
                            .unwrap_or(NO_DATE)
                            .to_string(),
                    }
                });
                Region {
                    fips: feature.id,
                    code,
                    path: projection.path_data(&feature.polygons),
                    fill: if record.is_some() { SWING_FILL } else { OTHER_FILL },
                    interactive: record.is_some(),
                    href: record.map(|r| format!("{}?state={}", cfg.detail_page, r.state)),
                    tooltip,
                }
            })
            .collect();

        log(
            Level::Info,
            Domain::Map,
            "map_built",
            obj(&[
                ("regions", json!(regions.len())),
                ("swing", json!(index.len())),
                ("unmapped", json!(unmapped)),
            ]),
        );

        Ok(Self {
            width: cfg.map_width,
            height: cfg.map_height,
            updated_at: dataset.updated_at.clone(),
            swing_count: index.len(),
            regions,
        })
    }

    pub fn region_for_code(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == Some(code))
    }

    /// Apply one pointer event. Returns where to go on a click that lands
    /// on an interactive region; every other event yields `None`.
    pub fn handle(&self, tooltip: &mut Tooltip, event: PointerEvent) -> Option<Navigation> {
        match event {
            PointerEvent::Move { region, x, y } => {
                match self.regions.get(region).and_then(|r| r.tooltip.clone()) {
                    Some(content) => {
                        tooltip.visible = true;
                        tooltip.left = x + TOOLTIP_OFFSET.0;
                        tooltip.top = y + TOOLTIP_OFFSET.1;
                        tooltip.content = Some(content);
                    }
                    None => tooltip.hide(),
                }
                None
            }
            PointerEvent::Leave => {
                tooltip.hide();
                None
            }
            PointerEvent::Click { region } => self
                .regions
                .get(region)
                .filter(|r| r.interactive)
                .and_then(|r| r.href.clone())
                .map(|href| Navigation { href }),
        }
    }
}

fn region_path(m: &mut Markup, region: &Region) {
    let cursor = if region.interactive { "cursor:pointer" } else { "cursor:default" };
    let code = region.code.unwrap_or("");
    match &region.tooltip {
        Some(tip) => {
            m.el(
                "path",
                &[
                    ("d", &region.path),
                    ("fill", region.fill),
                    ("stroke", "#ffffff"),
                    ("style", cursor),
                    ("data-state", code),
                    ("data-name", &tip.name),
                    ("data-rating", &tip.rating),
                    ("data-date", &tip.primary_date),
                ],
                |m| {
                    let title = format!("{}: {}, {}", tip.name, tip.rating, tip.primary_date);
                    m.text_el("title", &[], &title);
                },
            );
        }
        None => {
            m.el(
                "path",
                &[("d", &region.path), ("fill", region.fill), ("stroke", "#ffffff"), ("style", cursor)],
                |_| {},
            );
        }
    }
}

pub fn render_map_page(model: &MapModel) -> Page {
    let _scope = ProfileScope::new("map.render");
    let status = format!(
        "Data refreshed: {} · {} swing races highlighted",
        model.updated_at, model.swing_count
    );
    let mut page = Page::new(MAP_TITLE, status);

    let view_box = format!("0 0 {} {}", model.width, model.height);
    let width = model.width.to_string();
    let height = model.height.to_string();
    let offset_x = TOOLTIP_OFFSET.0.to_string();
    let offset_y = TOOLTIP_OFFSET.1.to_string();

    let m = &mut page.body;
    m.el("p", &[("class", "legend")], |m| {
        m.open("span", &[("style", &format!("background:{}", SWING_FILL))]).close("span");
        m.text("Swing race");
        m.open("span", &[("style", &format!("background:{}", OTHER_FILL))]).close("span");
        m.text("Other states");
    });
    m.el(
        "svg",
        &[
            ("class", "us-map"),
            ("xmlns", "http://www.w3.org/2000/svg"),
            ("viewBox", &view_box),
            ("width", &width),
            ("height", &height),
            ("role", "img"),
            ("aria-label", "Map of US states highlighting Senate swing races"),
            ("data-offset-x", &offset_x),
            ("data-offset-y", &offset_y),
        ],
        |m| {
            for region in model.regions.iter().filter(|r| !r.path.is_empty()) {
                match &region.href {
                    Some(href) if region.interactive => {
                        m.el("a", &[("href", href)], |m| region_path(m, region));
                    }
                    _ => region_path(m, region),
                }
            }
        },
    );
    m.open("div", &[("id", "tooltip"), ("class", "tooltip"), ("hidden", "hidden")])
        .close("div");
    page.script = Some(TOOLTIP_SCRIPT);
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lon: f64, lat: f64) -> Vec<Vec<Vec<[f64; 2]>>> {
        vec![vec![vec![
            [lon, lat],
            [lon + 1.0, lat],
            [lon + 1.0, lat + 1.0],
            [lon, lat + 1.0],
            [lon, lat],
        ]]]
    }

    fn features() -> Vec<Feature> {
        vec![
            Feature { id: Some(37), name: None, polygons: square(-80.0, 35.0) },
            Feature { id: Some(48), name: None, polygons: square(-99.0, 31.0) },
            Feature { id: Some(72), name: None, polygons: square(-66.5, 18.0) },
            Feature { id: None, name: None, polygons: square(-90.0, 40.0) },
        ]
    }

    fn dataset() -> RaceDataset {
        serde_json::from_str(
            r#"{
                "updated_at": "2026-02-20 12:00 UTC",
                "senate_election_states": [
                    {"state": "TX", "state_name": "Texas", "primary_date": "March 3, 2026",
                     "competitive": false, "cook_rating": "Not rated competitive"}
                ],
                "swing_states": [
                    {"state": "NC", "state_name": "North Carolina", "cook_rating": "Toss Up",
                     "primary_date": "March 3, 2026"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn model() -> MapModel {
        MapModel::build(&features(), &dataset(), &SiteConfig::default()).unwrap()
    }

    #[test]
    fn swing_state_is_colored_and_clickable() {
        let m = model();
        let nc = m.region_for_code("NC").unwrap();
        assert_eq!(nc.fill, SWING_FILL);
        assert!(nc.interactive);
        assert_eq!(nc.href.as_deref(), Some("state.html?state=NC"));
    }

    #[test]
    fn other_state_falls_back_on_every_field() {
        let m = model();
        let tx = m.region_for_code("TX").unwrap();
        assert_eq!(tx.fill, OTHER_FILL);
        assert!(!tx.interactive);
        let tip = tx.tooltip.as_ref().unwrap();
        assert_eq!(tip.name, "Texas");
        assert_eq!(tip.rating, NOT_SWING);
        // Date comes from the election-state list when there is no race record.
        assert_eq!(tip.primary_date, "March 3, 2026");
    }

    #[test]
    fn unmapped_ids_get_other_fill_and_no_interaction() {
        let m = model();
        for r in m.regions.iter().filter(|r| r.code.is_none()) {
            assert_eq!(r.fill, OTHER_FILL);
            assert!(!r.interactive);
            assert!(r.tooltip.is_none());
        }
        assert_eq!(m.regions.iter().filter(|r| r.code.is_none()).count(), 2);
    }

    #[test]
    fn hover_positions_tooltip_at_offset_and_leave_hides_it() {
        let m = model();
        let mut tip = Tooltip::default();
        assert_eq!(m.handle(&mut tip, PointerEvent::Move { region: 0, x: 100.0, y: 200.0 }), None);
        assert!(tip.visible);
        assert_eq!(tip.left, 112.0);
        assert_eq!(tip.top, 172.0);
        assert_eq!(tip.content.as_ref().unwrap().rating, "Toss Up");

        m.handle(&mut tip, PointerEvent::Move { region: 3, x: 0.0, y: 0.0 });
        assert!(!tip.visible);

        m.handle(&mut tip, PointerEvent::Move { region: 1, x: 0.0, y: 0.0 });
        assert!(tip.visible);
        m.handle(&mut tip, PointerEvent::Leave);
        assert!(!tip.visible);
    }

    #[test]
    fn click_navigates_only_for_swing_states() {
        let m = model();
        let mut tip = Tooltip::default();
        assert_eq!(
            m.handle(&mut tip, PointerEvent::Click { region: 0 }),
            Some(Navigation { href: "state.html?state=NC".to_string() })
        );
        assert_eq!(m.handle(&mut tip, PointerEvent::Click { region: 1 }), None);
        assert_eq!(m.handle(&mut tip, PointerEvent::Click { region: 3 }), None);
        assert_eq!(m.handle(&mut tip, PointerEvent::Click { region: 99 }), None);
    }

    #[test]
    fn rendered_svg_links_only_swing_states() {
        let html = render_map_page(&model()).render();
        assert_eq!(html.matches("<a href=\"state.html?state=").count(), 1);
        assert!(html.contains("<a href=\"state.html?state=NC\">"));
        assert!(html.contains("data-rating=\"Not a swing race\""));
        assert!(html.contains("2026-02-20 12:00 UTC"));
    }

    #[test]
    fn duplicate_records_fail_the_build() {
        let mut ds = dataset();
        let dup = ds.swing_states[0].clone();
        ds.swing_states.push(dup);
        assert!(MapModel::build(&features(), &ds, &SiteConfig::default()).is_err());
    }
}
