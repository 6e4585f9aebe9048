use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::models::PriceBar;

// Shape of the old Alpha Vantage payload the frontend still parses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

impl From<&PriceBar> for LegacyBar {
    fn from(bar: &PriceBar) -> Self {
        Self {
            open: price_string(bar.open),
            high: price_string(bar.high),
            low: price_string(bar.low),
            close: price_string(bar.close),
            volume: bar.volume.to_string(),
        }
    }
}

/// Whole-valued prices keep a trailing `.0` (`170.0`, not `170`), as the old
/// payload always printed prices as floats.
fn price_string(value: f64) -> String {
    let s = value.to_string();
    if value.is_finite() && !s.contains(|c| c == '.' || c == 'e') {
        format!("{s}.0")
    } else {
        s
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyMetaData {
    #[serde(rename = "1. Information")]
    pub information: String,
    #[serde(rename = "2. Symbol")]
    pub symbol: String,
}

/// `{"Time Series (<interval>)": {...}, "Meta Data": {...}}`
///
/// The series key embeds the interval name, so serialization is written by
/// hand. `YYYY-MM-DD HH:MM:SS` keys sort lexically in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyResponse {
    pub interval_key: String,
    pub time_series: BTreeMap<String, LegacyBar>,
    pub meta_data: LegacyMetaData,
}

impl LegacyResponse {
    pub fn new(interval_key: &str, source: &str, symbol: &str, bars: &[PriceBar]) -> Self {
        let time_series = bars
            .iter()
            .map(|bar| (bar.legacy_timestamp(), LegacyBar::from(bar)))
            .collect();

        Self {
            interval_key: interval_key.to_string(),
            time_series,
            meta_data: LegacyMetaData {
                information: format!("Market data from {source}"),
                symbol: symbol.to_string(),
            },
        }
    }

    pub fn time_series_key(&self) -> String {
        format!("Time Series ({})", self.interval_key)
    }
}

impl Serialize for LegacyResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&self.time_series_key(), &self.time_series)?;
        map.serialize_entry("Meta Data", &self.meta_data)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn bar(ts: &str, close: f64, volume: u64) -> PriceBar {
        PriceBar {
            timestamp: ts.parse::<DateTime<Utc>>().unwrap(),
            open: 170.0,
            high: 171.25,
            low: 169.5,
            close,
            volume,
        }
    }

    #[test]
    fn test_serializes_legacy_shape() {
        let bars = vec![bar("2023-10-27T15:55:00Z", 168.2200012207031, 1_234_567)];
        let response = LegacyResponse::new("5min", "Yahoo Finance", "AAPL", &bars);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Time Series (5min)": {
                    "2023-10-27 15:55:00": {
                        "1. open": "170.0",
                        "2. high": "171.25",
                        "3. low": "169.5",
                        "4. close": "168.2200012207031",
                        "5. volume": "1234567"
                    }
                },
                "Meta Data": {
                    "1. Information": "Market data from Yahoo Finance",
                    "2. Symbol": "AAPL"
                }
            })
        );
    }

    #[test]
    fn test_series_keys_follow_time_order() {
        let bars = vec![
            bar("2023-10-27T00:00:00Z", 2.0, 2),
            bar("2023-10-26T00:00:00Z", 1.0, 1),
        ];
        let response = LegacyResponse::new("Daily", "Yahoo Finance", "MSFT", &bars);

        let keys: Vec<&String> = response.time_series.keys().collect();
        assert_eq!(keys, vec!["2023-10-26 00:00:00", "2023-10-27 00:00:00"]);
    }

    #[test]
    fn test_price_strings_always_look_like_floats() {
        assert_eq!(price_string(170.0), "170.0");
        assert_eq!(price_string(-3.0), "-3.0");
        assert_eq!(price_string(0.0), "0.0");
        assert_eq!(price_string(1.0856), "1.0856");
    }

    #[test]
    fn test_rows_with_same_key_keep_the_later_one() {
        let bars = vec![
            bar("2023-10-27T15:55:00Z", 1.5, 10),
            bar("2023-10-27T15:55:00Z", 2.5, 20),
        ];
        let response = LegacyResponse::new("5min", "Yahoo Finance", "AAPL", &bars);

        assert_eq!(response.time_series.len(), 1);
        let row = &response.time_series["2023-10-27 15:55:00"];
        assert_eq!(row.close, "2.5");
        assert_eq!(row.volume, "20");
    }
}
