//! Yahoo Finance price source.
//!
//! Fetches one year of daily closes from Yahoo's v8 chart API. Handles rate
//! limiting, retries with exponential backoff and response parsing.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. Callers that need a result regardless wrap this source in a
//! [`FallbackSource`](super::FallbackSource).

use super::{PriceSource, SourceError, SourceKind};
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;
use trendcast_core::{PriceBar, PriceSeries};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance price source.
pub struct LiveSource {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
    lookback_days: u64,
}

impl LiveSource {
    pub const DEFAULT_LOOKBACK_DAYS: u64 = 365;

    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| SourceError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            lookback_days: Self::DEFAULT_LOOKBACK_DAYS,
        })
    }

    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    pub fn with_lookback_days(mut self, days: u64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let ts = |date: NaiveDate, h, m, s| {
            date.and_hms_opt(h, m, s)
                .map(|dt| dt.and_utc().timestamp())
                .unwrap_or_default()
        };
        let start_ts = ts(start, 0, 0, 0);
        let end_ts = ts(end, 23, 59, 59);
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    /// Parse the chart API response into bars.
    ///
    /// Rows without a close (holidays, halted sessions) are skipped. When the
    /// API repeats a date, the later row wins.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<PriceBar>, SourceError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    SourceError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    SourceError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                SourceError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| SourceError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    SourceError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            let mut bar = PriceBar::new(date, close);
            if let Some(volume) = quote.volume.get(i).copied().flatten() {
                bar = bar.with_volume(volume);
            }

            match bars.last_mut() {
                Some(prev) if prev.date == date => *prev = bar,
                _ => bars.push(bar),
            }
        }

        if bars.is_empty() {
            return Err(SourceError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }

    /// Execute the HTTP request with retry logic.
    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, SourceError> {
        let url = Self::chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::debug!(symbol, attempt, ?delay, "retrying chart request");
                std::thread::sleep(delay);
            }

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        return Err(SourceError::Blocked(format!("HTTP {status} for {symbol}")));
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(SourceError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(SourceError::Blocked(
                            "Yahoo Finance requires authentication".into(),
                        ));
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(SourceError::SymbolNotFound {
                            symbol: symbol.to_string(),
                        });
                    }

                    if !status.is_success() {
                        last_error =
                            Some(SourceError::Other(format!("HTTP {status} for {symbol}")));
                        continue;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        SourceError::ResponseFormatChanged(format!(
                            "failed to parse response for {symbol}: {e}"
                        ))
                    })?;

                    return Self::parse_response(symbol, chart);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(SourceError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(SourceError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SourceError::Other("max retries exceeded".into())))
    }
}

impl PriceSource for LiveSource {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Live
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, SourceError> {
        let end = Utc::now().date_naive();
        let start = end
            .checked_sub_days(Days::new(self.lookback_days))
            .unwrap_or(NaiveDate::MIN);
        let bars = self.fetch_with_retry(symbol, start, end)?;
        tracing::debug!(symbol, rows = bars.len(), "fetched live closes");
        Ok(PriceSeries::new(bars)?)
    }
}
