use chrono::{FixedOffset, Offset, Utc};
use std::path::PathBuf;

pub const DEFAULT_TOPOLOGY_URL: &str = "https://cdn.jsdelivr.net/npm/us-atlas@3/states-10m.json";

/// Site build configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub races_path: String,
    pub tracker_path: String,
    pub topology_url: String,
    /// Name of the object inside the topology holding one geometry per state.
    pub topology_object: String,
    /// Relative document locations resolve against this directory.
    pub data_base_dir: PathBuf,
    pub out_dir: PathBuf,
    pub detail_page: String,
    pub map_width: f64,
    pub map_height: f64,
    /// Civil-time offset used for the tracker countdown (hours east of UTC).
    pub tracker_utc_offset_hours: i32,
    pub fetch_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            races_path: "data/races.json".to_string(),
            tracker_path: "data/alabama_tracker.json".to_string(),
            topology_url: DEFAULT_TOPOLOGY_URL.to_string(),
            topology_object: "states".to_string(),
            data_base_dir: PathBuf::from("."),
            out_dir: PathBuf::from("site"),
            detail_page: "state.html".to_string(),
            map_width: 960.0,
            map_height: 600.0,
            tracker_utc_offset_hours: -5,
            fetch_timeout_secs: 30,
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            races_path: std::env::var("RACES_PATH").unwrap_or(d.races_path),
            tracker_path: std::env::var("TRACKER_PATH").unwrap_or(d.tracker_path),
            topology_url: std::env::var("TOPOLOGY_URL").unwrap_or(d.topology_url),
            topology_object: std::env::var("TOPOLOGY_OBJECT").unwrap_or(d.topology_object),
            data_base_dir: std::env::var("DATA_BASE_DIR").map(PathBuf::from).unwrap_or(d.data_base_dir),
            out_dir: std::env::var("OUT_DIR").map(PathBuf::from).unwrap_or(d.out_dir),
            detail_page: std::env::var("DETAIL_PAGE").unwrap_or(d.detail_page),
            map_width: std::env::var("MAP_WIDTH").ok().and_then(|v| v.parse().ok()).unwrap_or(d.map_width),
            map_height: std::env::var("MAP_HEIGHT").ok().and_then(|v| v.parse().ok()).unwrap_or(d.map_height),
            tracker_utc_offset_hours: std::env::var("TRACKER_UTC_OFFSET_HOURS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.tracker_utc_offset_hours),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.fetch_timeout_secs),
        }
    }

    /// Fixed offset for the countdown. Out-of-range hours fall back to UTC.
    pub fn tracker_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.tracker_utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offset_is_minus_five() {
        let cfg = SiteConfig::default();
        assert_eq!(cfg.tracker_offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn absurd_offset_falls_back_to_utc() {
        let cfg = SiteConfig {
            tracker_utc_offset_hours: 99,
            ..SiteConfig::default()
        };
        assert_eq!(cfg.tracker_offset().local_minus_utc(), 0);
    }
}
