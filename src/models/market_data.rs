use serde::Deserialize;

/// Query string of `GET /get_market_data`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataParams {
    pub symbol: Option<String>,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(rename = "assetType", default = "default_asset_type")]
    pub asset_type: String,
}

fn default_interval() -> String {
    Interval::Daily.key().to_string()
}

fn default_asset_type() -> String {
    "STOCKS".to_string()
}

/// Bar granularity understood by the legacy frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Daily,
    Min60,
    Min30,
    Min15,
    Min5,
}

impl Interval {
    pub const ALL: [Interval; 5] = [
        Interval::Daily,
        Interval::Min60,
        Interval::Min30,
        Interval::Min15,
        Interval::Min5,
    ];

    /// Resolve a legacy interval name (`Daily`, `60min`, ...). Matching is exact.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|interval| interval.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            Interval::Daily => "Daily",
            Interval::Min60 => "60min",
            Interval::Min30 => "30min",
            Interval::Min15 => "15min",
            Interval::Min5 => "5min",
        }
    }

    /// Interval code sent upstream.
    pub fn upstream_code(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Min60 => "60m",
            Interval::Min30 => "30m",
            Interval::Min15 => "15m",
            Interval::Min5 => "5m",
        }
    }

    pub fn is_intraday(&self) -> bool {
        !matches!(self, Interval::Daily)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Stocks,
    Forex,
}

impl AssetType {
    /// Only the exact string `FOREX` selects forex; anything else is equities.
    pub fn parse(value: &str) -> Self {
        if value == "FOREX" {
            AssetType::Forex
        } else {
            AssetType::Stocks
        }
    }

    /// Rewrite a caller-supplied symbol into the upstream convention.
    ///
    /// Forex pairs lose their `/` separator and gain the `=X` suffix
    /// (`EUR/USD` -> `EURUSD=X`). Must be applied once, to the raw symbol.
    pub fn upstream_symbol(&self, symbol: &str) -> String {
        match self {
            AssetType::Stocks => symbol.to_string(),
            AssetType::Forex => format!("{}=X", symbol.replace('/', "")),
        }
    }
}

/// Span of history requested upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Years(u32),
    Days(u32),
}

impl Lookback {
    /// Range token as accepted by the chart endpoint (`1y`, `60d`).
    pub fn as_range(&self) -> String {
        match self {
            Lookback::Years(n) => format!("{n}y"),
            Lookback::Days(n) => format!("{n}d"),
        }
    }
}

/// Picks the lookback window for each interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackPolicy {
    pub intraday_days: u32,
}

impl LookbackPolicy {
    /// Yahoo retains at most this many days of sub-hourly bars.
    pub const MAX_INTRADAY_DAYS: u32 = 60;

    pub fn new(intraday_days: u32) -> Self {
        Self { intraday_days }
    }

    pub fn lookback_for(&self, interval: Interval) -> Lookback {
        if interval.is_intraday() {
            Lookback::Days(self.intraday_days)
        } else {
            Lookback::Years(1)
        }
    }
}

impl Default for LookbackPolicy {
    fn default() -> Self {
        Self::new(Self::MAX_INTRADAY_DAYS)
    }
}
