//! Read-only document model for the race and tracker JSON files.
//!
//! Both documents are produced by an external refresh job; nothing here
//! mutates them after load.

use sha2::{Digest, Sha256};

mod races;
mod tracker;

pub use races::{
    DataQualityReport, ElectionState, MarketQuote, Odds, PollEntry, PollTopline, RaceDataset,
    RaceRecord, StoryEntry,
};
pub use tracker::{PollRow, RaceSnapshot, TrackerDataset};

/// Placeholder the refresh job writes when a date could not be resolved.
pub const NOT_AVAILABLE: &str = "Not available";

/// Optional text with blanks and the refresh job's placeholder folded to `None`.
pub fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_folds_placeholders() {
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some("  ".to_string())), None);
        assert_eq!(present(&Some("Not available".to_string())), None);
        assert_eq!(present(&Some(" May 19, 2026 ".to_string())), Some("May 19, 2026"));
    }

    #[test]
    fn sha256_is_stable() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
