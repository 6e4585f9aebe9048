use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{BarTimestamp, Interval, Lookback, UpstreamBar};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;
use url::Url;

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";

/// Yahoo Finance v8 chart endpoint. No API key required.
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl YahooProvider {
    pub fn new(base_url: Url, user_agent: &str) -> Result<Self, PriceProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, PriceProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PriceProviderError::BadResponse(format!("invalid chart url: {}", self.base_url)))?
            .pop_if_empty()
            .push(symbol);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    meta: Option<YahooMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    #[serde(default)]
    exchange_timezone_name: Option<String>,
    // Usually an abbreviation such as "EDT"; only used when it is an IANA name.
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    gmtoffset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// How epoch seconds from the chart payload are turned into row timestamps.
#[derive(Debug, Clone, Copy)]
enum RowZone {
    Named(Tz),
    Offset(FixedOffset),
    Naive,
}

impl RowZone {
    fn from_meta(meta: Option<&YahooMeta>) -> Self {
        let Some(meta) = meta else {
            return RowZone::Naive;
        };

        let named = [&meta.exchange_timezone_name, &meta.timezone]
            .into_iter()
            .flatten()
            .find_map(|name| name.parse::<Tz>().ok());
        if let Some(tz) = named {
            return RowZone::Named(tz);
        }

        match meta.gmtoffset.and_then(FixedOffset::east_opt) {
            Some(offset) => RowZone::Offset(offset),
            None => RowZone::Naive,
        }
    }

    /// Daily bars are keyed at local midnight of the exchange, not at the
    /// session open Yahoo reports.
    fn timestamp(&self, epoch: i64, daily: bool) -> Result<BarTimestamp, PriceProviderError> {
        let utc = DateTime::from_timestamp(epoch, 0)
            .ok_or_else(|| PriceProviderError::Parse(format!("bad timestamp: {epoch}")))?;

        Ok(match self {
            RowZone::Named(tz) => {
                let local = utc.with_timezone(tz);
                let local = if daily { start_of_day(tz, &local.date_naive()).unwrap_or(local) } else { local };
                BarTimestamp::Aware(local.fixed_offset())
            }
            RowZone::Offset(offset) => {
                let local = utc.with_timezone(offset);
                let local = if daily { start_of_day(offset, &local.date_naive()).unwrap_or(local) } else { local };
                BarTimestamp::Aware(local)
            }
            RowZone::Naive => {
                let naive = utc.naive_utc();
                let naive = if daily { naive.date().and_time(NaiveTime::MIN) } else { naive };
                BarTimestamp::Naive(naive)
            }
        })
    }
}

// Earliest instant of `date` in `tz`; a DST gap at midnight resolves to None.
fn start_of_day<Z: TimeZone>(tz: &Z, date: &NaiveDate) -> Option<DateTime<Z>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN)).earliest()
}

fn parse_chart(
    body: YahooChartResponse,
    interval: Interval,
) -> Result<Vec<UpstreamBar>, PriceProviderError> {
    if let Some(error) = body.chart.error {
        if error.description.contains("No data found") {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::BadResponse(error.description));
    }

    let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    // Yahoo omits `timestamp` entirely when the window holds no bars
    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Ok(Vec::new());
    }

    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| PriceProviderError::BadResponse("No quote data in response".into()))?;

    let lengths = [
        quote.open.len(),
        quote.high.len(),
        quote.low.len(),
        quote.close.len(),
        quote.volume.len(),
    ];
    if lengths.iter().any(|&len| len != timestamps.len()) {
        return Err(PriceProviderError::Parse(
            "Timestamp and quote arrays have different lengths".into(),
        ));
    }

    let zone = RowZone::from_meta(result.meta.as_ref());
    let daily = !interval.is_intraday();
    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, &epoch) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) =
            (quote.open[i], quote.high[i], quote.low[i], quote.close[i])
        else {
            // skip empty rows (halts, holidays)
            continue;
        };

        bars.push(UpstreamBar {
            timestamp: zone.timestamp(epoch, daily)?,
            open,
            high,
            low,
            close,
            volume: quote.volume[i].unwrap_or(0),
        });
    }

    Ok(bars)
}

#[async_trait]
impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Vec<UpstreamBar>, PriceProviderError> {
        let url = self.chart_url(symbol)?;
        let range = lookback.as_range();

        debug!("Fetching {} bars for {} over {}", interval.upstream_code(), symbol, range);

        let resp = self
            .client
            .get(url)
            .query(&[
                ("range", range.as_str()),
                ("interval", interval.upstream_code()),
                ("includePrePost", "false"),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PriceProviderError::NotFound);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        parse_chart(body, interval)
    }
}
