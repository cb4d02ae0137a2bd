use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerDataset {
    pub updated_at: String,
    /// `YYYY-MM-DD`; kept as text so an unparseable value still renders.
    pub primary_day: String,
    #[serde(default)]
    pub races: Vec<RaceSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub snapshot: Vec<String>,
    /// Dynamic candidate columns, in display order.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub polls: Vec<PollRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollRow {
    pub pollster: String,
    #[serde(default)]
    pub pollster_url: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub sample: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub spread: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_refresh_job_output() {
        let ds: TrackerDataset = serde_json::from_str(
            r#"{
                "updated_at": "2026-02-20 12:00 UTC",
                "primary_day": "2026-05-19",
                "races": [{
                    "id": "us_senate_gop",
                    "name": "U.S. Senate (Republican Primary)",
                    "snapshot": ["Marshall leads."],
                    "columns": ["Marshall", "Moore", "Hudson"],
                    "polls": [{"pollster": "Cygnal", "pollster_url": "", "date": "Feb 1",
                               "sample": "600 LV", "values": ["30", "25", "10"], "spread": "Marshall +5"}]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(ds.races[0].columns.len(), 3);
        assert_eq!(ds.races[0].polls[0].values[0], "30");
        assert_eq!(ds.races[0].id.as_deref(), Some("us_senate_gop"));
    }
}
