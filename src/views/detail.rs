//! State detail view: one race record rendered as market, poll and
//! storyline lists, selected by the `state` query parameter.

use crate::data::{present, MarketQuote, PollEntry, RaceDataset, RaceRecord, StoryEntry};
use crate::markup::{render_list, Markup};
use crate::views::page::Page;
use crate::views::polls::poll_table;

pub const NOT_FOUND_TITLE: &str = "State not found";
pub const NOT_FOUND_SUBTITLE: &str =
    "No swing-race data exists for that state. Pick a highlighted state on the map.";
pub const NO_PRIMARY_DATE: &str = "Primary date not available";
pub const DIRECTORY_TITLE: &str = "Senate Race Detail";

const DIRECTORY_SCRIPT: &str = "(function(){\
var code=(new URLSearchParams(location.search).get('state')||'').trim().toUpperCase();\
var s=null;\
document.querySelectorAll('section[data-state]').forEach(function(el){if(el.dataset.state===code)s=el;});\
if(!s)s=document.querySelector('section[data-not-found]');\
if(!s)return;\
s.hidden=false;\
document.getElementById('title').textContent=s.dataset.title;\
document.getElementById('status').textContent=s.dataset.status;\
document.title=s.dataset.title;\
})();";

/// `state` from a query string such as `?state=nc`, uppercased.
pub fn parse_state_query(query: &str) -> Option<String> {
    let query = query.trim().trim_start_matches('?');
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.trim().to_uppercase())
        .filter(|v| !v.is_empty())
}

/// `62.7%` for 0.627; `N/A` when there is no usable price.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p.is_finite() && (0.0..=1.0).contains(&p) => format!("{:.1}%", p * 100.0),
        _ => "N/A".to_string(),
    }
}

pub fn lookup<'a>(dataset: &'a RaceDataset, query: &str) -> Option<&'a RaceRecord> {
    let code = parse_state_query(query)?;
    dataset.record(&code)
}

pub fn render_state_detail(dataset: &RaceDataset, query: &str) -> Page {
    match lookup(dataset, query) {
        Some(record) => {
            let mut page = Page::new(record_title(record), meta_line(dataset, record));
            page.body = record_body(dataset, record);
            page
        }
        None => Page::new(NOT_FOUND_TITLE, NOT_FOUND_SUBTITLE),
    }
}

/// Every record pre-rendered into a hidden section; the page script
/// reveals the one named by `?state=` or the not-found section.
pub fn render_state_directory(dataset: &RaceDataset) -> Page {
    let mut page = Page::new(DIRECTORY_TITLE, "");
    let m = &mut page.body;
    for record in &dataset.swing_states {
        let title = record_title(record);
        let status = meta_line(dataset, record);
        m.el(
            "section",
            &[
                ("class", "state-detail"),
                ("data-state", &record.state),
                ("data-title", &title),
                ("data-status", &status),
                ("hidden", "hidden"),
            ],
            |m| {
                m.append(record_body(dataset, record));
            },
        );
    }
    m.open(
        "section",
        &[
            ("data-not-found", "true"),
            ("data-title", NOT_FOUND_TITLE),
            ("data-status", NOT_FOUND_SUBTITLE),
            ("hidden", "hidden"),
        ],
    )
    .close("section");
    page.script = Some(DIRECTORY_SCRIPT);
    page
}

fn record_title(record: &RaceRecord) -> String {
    format!("{} Senate Race", record.state_name)
}

fn meta_line(dataset: &RaceDataset, record: &RaceRecord) -> String {
    format!(
        "Cook rating: {} · Data refreshed: {}",
        record.cook_rating, dataset.updated_at
    )
}

fn record_body(dataset: &RaceDataset, record: &RaceRecord) -> Markup {
    let mut m = Markup::new();
    m.el("p", &[("class", "primary-date")], |m| {
        m.text_el("strong", &[], "Primary date: ");
        m.text(record.primary_date_text().unwrap_or(NO_PRIMARY_DATE));
    });

    if !record.race_summary.is_empty() {
        m.text_el("h2", &[], "Race summary");
        m.append(render_list(&record.race_summary, "", |m, point| {
            m.text(point);
        }));
    }

    m.text_el("h2", &[], "Polymarket");
    m.append(render_list(
        &record.odds.polymarket,
        "No Polymarket markets matched this race yet.",
        quote_item,
    ));
    m.text_el("h2", &[], "Kalshi");
    m.append(render_list(
        &record.odds.kalshi,
        "No Kalshi markets matched this race yet.",
        quote_item,
    ));
    m.text_el("h2", &[], "Polls");
    m.append(render_list(&record.polls, "No polling references yet.", poll_item));
    m.text_el("h2", &[], "Storylines");
    m.append(render_list(&record.storylines, "No storylines yet.", story_item));

    if !record.polls_toplines.is_empty() {
        m.text_el("h2", &[], "Polling toplines");
        for block in &record.polls_toplines {
            m.text_el("h3", &[], &block.race_name);
            m.append(poll_table(&block.candidates, &block.polls));
        }
    }

    if !dataset.sources.is_empty() {
        m.el("footer", &[("class", "meta")], |m| {
            m.text("Sources: ");
            for (i, (name, url)) in dataset.sources.iter().enumerate() {
                if i > 0 {
                    m.text(" · ");
                }
                m.link(url, name);
            }
        });
    }
    m
}

fn quote_item(m: &mut Markup, quote: &MarketQuote) {
    m.link(&quote.url, &quote.title);
    m.text(": ");
    m.text_el("strong", &[("class", "price")], &format_price(quote.probability()));
}

fn poll_item(m: &mut Markup, poll: &PollEntry) {
    match present(&poll.url) {
        Some(url) => m.link(url, &poll.source),
        None => m.text(&poll.source),
    };
    if let Some(value) = present(&poll.value) {
        m.text(": ");
        m.text(value);
    }
}

fn story_item(m: &mut Markup, story: &StoryEntry) {
    match present(&story.url) {
        Some(url) => m.link(url, &story.point),
        None => m.text(&story.point),
    };
    let meta: Vec<&str> = [present(&story.date), present(&story.source)]
        .into_iter()
        .flatten()
        .collect();
    if !meta.is_empty() {
        m.text(" ");
        m.text_el("span", &[("class", "meta")], &meta.join(" · "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> RaceDataset {
        serde_json::from_str(
            r#"{
                "updated_at": "2026-02-20 12:00 UTC",
                "sources": {"cook": "https://www.cookpolitical.com/ratings/senate-race-ratings"},
                "swing_states": [{
                    "state": "NC", "state_name": "North Carolina", "cook_rating": "Toss Up",
                    "primary_date": "March 3, 2026",
                    "odds": {
                        "polymarket": [{"title": "NC GOP nominee?", "url": "https://polymarket.com/event/nc", "yes_price": 0.627}],
                        "kalshi": [{"title": "NC Senate", "url": "https://kalshi.com/markets/NC", "yes_price": null}]
                    },
                    "polls": [{"source": "RealClearPolitics", "value": "Latest polling links", "url": "https://www.realclearpolitics.com"}],
                    "storylines": [{"point": "Debate <b>set</b>", "date": "2026-02-18", "source": "AP", "url": "javascript:alert(1)"}],
                    "race_summary": ["Toss-up race."]
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(Some(0.627)), "62.7%");
        assert_eq!(format_price(Some(0.0)), "0.0%");
        assert_eq!(format_price(Some(1.0)), "100.0%");
        assert_eq!(format_price(None), "N/A");
        assert_eq!(format_price(Some(1.5)), "N/A");
    }

    #[test]
    fn query_parsing_is_case_insensitive() {
        assert_eq!(parse_state_query("?state=nc").as_deref(), Some("NC"));
        assert_eq!(parse_state_query("state=Ga&x=1").as_deref(), Some("GA"));
        assert_eq!(parse_state_query("?state=%20me%20").as_deref(), Some("ME"));
        assert_eq!(parse_state_query("?state="), None);
        assert_eq!(parse_state_query(""), None);
    }

    #[test]
    fn lowercase_query_finds_record() {
        let ds = dataset();
        assert_eq!(lookup(&ds, "?state=nc").map(|r| r.state.as_str()), Some("NC"));
    }

    #[test]
    fn found_page_renders_all_lists() {
        let ds = dataset();
        let page = render_state_detail(&ds, "?state=nc");
        assert_eq!(page.title, "North Carolina Senate Race");
        assert_eq!(page.status, "Cook rating: Toss Up · Data refreshed: 2026-02-20 12:00 UTC");
        let html = page.render();
        assert!(html.contains("62.7%"));
        assert!(html.contains("N/A"));
        assert!(html.contains("<a href=\"https://polymarket.com/event/nc\""));
        assert!(html.contains("Debate &lt;b&gt;set&lt;/b&gt;"));
        assert!(!html.contains("javascript:"));
        assert!(html.contains("March 3, 2026"));
        assert!(html.contains("Toss-up race."));
    }

    #[test]
    fn unknown_state_renders_only_not_found() {
        let ds = dataset();
        let page = render_state_detail(&ds, "?state=zz");
        assert_eq!(page.title, NOT_FOUND_TITLE);
        assert!(page.body.is_empty());
        let html = page.render();
        for section in ["Polymarket", "Kalshi", "Polls", "Storylines"] {
            assert!(!html.contains(section), "{} rendered", section);
        }
    }

    #[test]
    fn missing_sections_show_empty_messages() {
        let mut ds = dataset();
        let rec = &mut ds.swing_states[0];
        rec.odds.kalshi.clear();
        rec.primary_date = None;
        let html = render_state_detail(&ds, "?state=NC").render();
        assert!(html.contains("No Kalshi markets matched this race yet."));
        assert!(html.contains(NO_PRIMARY_DATE));
    }

    #[test]
    fn directory_holds_one_hidden_section_per_state() {
        let ds = dataset();
        let html = render_state_directory(&ds).render();
        assert!(html.contains("data-state=\"NC\""));
        assert!(html.contains("data-not-found=\"true\""));
        assert_eq!(html.matches("<section").count(), 2);
    }
}
