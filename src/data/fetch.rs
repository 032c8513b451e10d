use crate::data::{PricePoint, TimeSeries};
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use tracing::{info, warn};

/// How far back a request reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookback {
    Days(u32),
    Max,
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookback::Days(days) => write!(f, "{}", days),
            Lookback::Max => f.write_str("max"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("row {index} is not a [time, open, high, low, close] tuple")]
    MalformedRow { index: usize },
}

pub trait PriceSource {
    /// One attempt, no retry. `Ok` with an empty series means the range had no data.
    fn fetch(
        &self,
        lookback: Lookback,
    ) -> impl Future<Output = Result<TimeSeries, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct PriceClient {
    client: Client,
    api_base: String,
    coin: String,
    vs_currency: String,
}

impl PriceClient {
    pub fn new(api_base: &str, coin: &str, vs_currency: &str) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            coin: coin.to_string(),
            vs_currency: vs_currency.to_string(),
        }
    }

    pub async fn fetch_ohlc(&self, lookback: Lookback) -> Result<TimeSeries, FetchError> {
        info!(coin = %self.coin, days = %lookback, "fetching OHLC history");
        let url = format!("{}/coins/{}/ohlc", self.api_base, self.coin);
        let days = lookback.to_string();

        let res = self
            .client
            .get(&url)
            .query(&[("vs_currency", self.vs_currency.as_str()), ("days", days.as_str())])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(FetchError::Status(res.status()));
        }

        let rows = res.json::<Vec<Vec<Value>>>().await?;
        let series = parse_ohlc(&rows)?;
        info!(rows = series.len(), days = %lookback, "fetched OHLC history");
        Ok(series)
    }
}

impl PriceSource for PriceClient {
    fn fetch(
        &self,
        lookback: Lookback,
    ) -> impl Future<Output = Result<TimeSeries, FetchError>> + Send {
        async move {
            let result = self.fetch_ohlc(lookback).await;
            if let Err(e) = &result {
                warn!(days = %lookback, error = %e, "OHLC fetch failed");
            }
            result
        }
    }
}

/// Rows are `[epoch_ms, open, high, low, close]`; volume is not provided and defaults to 0.
pub fn parse_ohlc(rows: &[Vec<Value>]) -> Result<TimeSeries, FetchError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| parse_row(row).ok_or(FetchError::MalformedRow { index }))
        .collect::<Result<Vec<_>, _>>()
        .map(TimeSeries::new)
}

fn parse_row(row: &[Value]) -> Option<PricePoint> {
    if row.len() < 5 {
        return None;
    }
    let millis = row[0].as_i64().or_else(|| row[0].as_f64().map(|v| v as i64))?;
    Some(PricePoint {
        timestamp: DateTime::from_timestamp_millis(millis)?,
        open: row[1].as_f64()?,
        high: row[2].as_f64()?,
        low: row[3].as_f64()?,
        close: row[4].as_f64()?,
        volume: 0.0,
    })
}
