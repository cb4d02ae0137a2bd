use crate::data::{present, PollRow};
use crate::markup::Markup;

pub const NO_POLL_ROWS: &str = "No polling rows published yet.";
const MISSING_CELL: &str = "—";

/// Poll table: Pollster | Date | Sample | <columns...> | Spread.
///
/// Values align to `columns` by position; short rows are padded and extra
/// values are dropped. No rows means a note instead of an empty table.
pub fn poll_table(columns: &[String], rows: &[PollRow]) -> Markup {
    let mut m = Markup::new();
    if rows.is_empty() {
        m.text_el("p", &[("class", "empty")], NO_POLL_ROWS);
        return m;
    }
    m.el("table", &[("class", "polls")], |m| {
        m.el("thead", &[], |m| {
            m.el("tr", &[], |m| {
                for fixed in ["Pollster", "Date", "Sample"] {
                    m.text_el("th", &[], fixed);
                }
                for col in columns {
                    m.text_el("th", &[], col);
                }
                m.text_el("th", &[], "Spread");
            });
        });
        m.el("tbody", &[], |m| {
            for row in rows {
                m.el("tr", &[], |m| {
                    m.el("td", &[], |m| match present(&row.pollster_url) {
                        Some(url) => {
                            m.link(url, &row.pollster);
                        }
                        None => {
                            m.text(&row.pollster);
                        }
                    });
                    m.text_el("td", &[], &row.date);
                    m.text_el("td", &[], &row.sample);
                    for i in 0..columns.len() {
                        let value = row.values.get(i).map(String::as_str).unwrap_or(MISSING_CELL);
                        m.text_el("td", &[], value);
                    }
                    let spread: &str = if row.spread.trim().is_empty() { MISSING_CELL } else { &row.spread };
                    m.text_el("td", &[], spread);
                });
            }
        });
    });
    m
}
