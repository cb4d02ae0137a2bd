//! Single-race tracker: countdown to primary day plus a card per contest.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use std::fmt;

use crate::data::TrackerDataset;
use crate::markup::render_list;
use crate::views::page::Page;
use crate::views::polls::poll_table;

pub const TRACKER_TITLE: &str = "Alabama Primary Tracker";

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Unavailable,
    Arrived,
    Remaining { days: i64, hours: i64 },
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Unavailable => write!(f, "Primary date unavailable"),
            Countdown::Arrived => write!(f, "Primary day is here or has passed."),
            Countdown::Remaining { days, hours } => write!(f, "{} days, {} hours", days, hours),
        }
    }
}

/// Time left until local midnight of `primary_day` (`YYYY-MM-DD`) at `offset`.
///
/// A fixed offset ignores daylight-saving transitions; the default −05:00
/// matches Central time during the spring primary season.
pub fn countdown(primary_day: &str, now: DateTime<Utc>, offset: FixedOffset) -> Countdown {
    let target = NaiveDate::parse_from_str(primary_day.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|midnight| offset.from_local_datetime(&midnight).single());
    let target = match target {
        Some(t) => t.with_timezone(&Utc),
        None => return Countdown::Unavailable,
    };
    let remaining_ms = (target - now).num_milliseconds();
    if remaining_ms <= 0 {
        return Countdown::Arrived;
    }
    Countdown::Remaining {
        days: remaining_ms / MS_PER_DAY,
        hours: (remaining_ms % MS_PER_DAY) / MS_PER_HOUR,
    }
}

pub fn render_tracker(dataset: &TrackerDataset, now: DateTime<Utc>, offset: FixedOffset) -> Page {
    let mut page = Page::new(TRACKER_TITLE, format!("Data refreshed: {}", dataset.updated_at));
    let left = countdown(&dataset.primary_day, now, offset).to_string();

    let m = &mut page.body;
    m.el("p", &[("class", "countdown")], |m| {
        m.text("Countdown to primary day (");
        m.text(&dataset.primary_day);
        m.text("): ");
        m.text_el("strong", &[("id", "countdown")], &left);
    });

    if dataset.races.is_empty() {
        m.text_el("p", &[("class", "empty")], "No races tracked yet.");
    }
    for race in &dataset.races {
        let id = race.id.clone().unwrap_or_default();
        m.el("article", &[("class", "race-card"), ("data-race", &id)], |m| {
            m.text_el("h2", &[], &race.name);
            m.append(render_list(&race.snapshot, "No snapshot notes yet.", |m, point| {
                m.text(point);
            }));
            m.append(poll_table(&race.columns, &race.polls));
        });
    }
    page
}
