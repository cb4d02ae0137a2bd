use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{present, PollRow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceDataset {
    pub updated_at: String,
    #[serde(default)]
    pub refresh_target: Option<String>,
    #[serde(default)]
    pub sources: BTreeMap<String, String>,
    /// Every state with a Senate election this cycle, competitive or not.
    #[serde(default)]
    pub senate_election_states: Vec<ElectionState>,
    pub swing_states: Vec<RaceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceRecord {
    pub state: String,
    pub state_name: String,
    pub cook_rating: String,
    #[serde(default)]
    pub primary_date: Option<String>,
    #[serde(default)]
    pub odds: Odds,
    #[serde(default)]
    pub polls: Vec<PollEntry>,
    #[serde(default)]
    pub storylines: Vec<StoryEntry>,
    #[serde(default)]
    pub polls_toplines: Vec<PollTopline>,
    #[serde(default)]
    pub race_summary: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Odds {
    #[serde(default)]
    pub polymarket: Vec<MarketQuote>,
    #[serde(default)]
    pub kalshi: Vec<MarketQuote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub yes_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollEntry {
    pub source: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryEntry {
    pub point: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One contest's topline table attached to a race record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollTopline {
    #[serde(default)]
    pub contest: Option<String>,
    pub race_name: String,
    #[serde(default)]
    pub candidates: Vec<String>,
    #[serde(default)]
    pub polls: Vec<PollRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionState {
    pub state: String,
    #[serde(default)]
    pub state_name: Option<String>,
    #[serde(default)]
    pub primary_date: Option<String>,
    #[serde(default)]
    pub competitive: bool,
    #[serde(default)]
    pub cook_rating: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub records: u64,
    pub duplicate_states: Vec<String>,
    pub out_of_range_prices: u64,
    pub missing_primary_dates: Vec<String>,
    pub warnings: Vec<String>,
}

impl DataQualityReport {
    pub fn ok(&self) -> bool {
        self.duplicate_states.is_empty()
    }
}

impl MarketQuote {
    /// Implied probability, only when it is a real number in [0, 1].
    pub fn probability(&self) -> Option<f64> {
        self.yes_price.filter(|p| p.is_finite() && (0.0..=1.0).contains(p))
    }
}

impl RaceRecord {
    pub fn primary_date_text(&self) -> Option<&str> {
        present(&self.primary_date)
    }

    fn quotes(&self) -> impl Iterator<Item = &MarketQuote> {
        self.odds.polymarket.iter().chain(self.odds.kalshi.iter())
    }
}

impl RaceDataset {
    /// Postal code -> record. Fails on a duplicate code, since every view
    /// assumes a code identifies exactly one record.
    pub fn index(&self) -> Result<HashMap<&str, &RaceRecord>, String> {
        let mut map = HashMap::with_capacity(self.swing_states.len());
        for record in &self.swing_states {
            if map.insert(record.state.as_str(), record).is_some() {
                return Err(format!("duplicate state code in swing_states: {}", record.state));
            }
        }
        Ok(map)
    }

    pub fn record(&self, code: &str) -> Option<&RaceRecord> {
        self.swing_states.iter().find(|r| r.state == code)
    }

    pub fn election_state(&self, code: &str) -> Option<&ElectionState> {
        self.senate_election_states.iter().find(|s| s.state == code)
    }

    pub fn quality_report(&self) -> DataQualityReport {
        let mut report = DataQualityReport {
            records: self.swing_states.len() as u64,
            ..DataQualityReport::default()
        };
        let mut seen: HashMap<&str, u32> = HashMap::new();
        for record in &self.swing_states {
            let count = seen.entry(record.state.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                report.duplicate_states.push(record.state.clone());
                report.warnings.push(format!("duplicate_state: {}", record.state));
            }
            if record.primary_date_text().is_none() {
                report.missing_primary_dates.push(record.state.clone());
            }
            for quote in record.quotes() {
                if quote.yes_price.is_some() && quote.probability().is_none() {
                    report.out_of_range_prices += 1;
                    report
                        .warnings
                        .push(format!("price_out_of_range: {} {:?}", record.state, quote.yes_price));
                }
            }
        }
        report
    }
}
