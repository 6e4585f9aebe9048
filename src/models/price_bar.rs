use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

pub const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Row timestamp as handed back by the upstream source, which may or may not
/// carry a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTimestamp {
    /// No zone attached; taken to be UTC already.
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

impl BarTimestamp {
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            BarTimestamp::Naive(naive) => Utc.from_utc_datetime(naive),
            BarTimestamp::Aware(aware) => aware.with_timezone(&Utc),
        }
    }
}

/// One OHLCV row straight from the upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamBar {
    pub timestamp: BarTimestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// OHLCV row normalized to UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl From<UpstreamBar> for PriceBar {
    fn from(bar: UpstreamBar) -> Self {
        Self {
            timestamp: bar.timestamp.to_utc(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

impl PriceBar {
    pub fn legacy_timestamp(&self) -> String {
        format_legacy_timestamp(&self.timestamp)
    }
}

pub fn format_legacy_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(LEGACY_TIMESTAMP_FORMAT).to_string()
}
