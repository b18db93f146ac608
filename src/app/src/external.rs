use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{de::{MapAccess, Visitor}, Deserialize, Deserializer};
use stock_index::{Observation, Symbol};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

use crate::config::AlphaVantageConfig;

/// Upstream daily history for a symbol.
#[async_trait]
pub trait DailySource: Send + Sync {
    /// Observations in the order the upstream delivered them.
    async fn fetch_daily(&self, symbol: &Symbol) -> Result<Vec<Observation>, FetchError>;
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("no data available: {0}")]
    Unavailable(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(config: &AlphaVantageConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl DailySource for AlphaVantageClient {
    async fn fetch_daily(&self, symbol: &Symbol) -> Result<Vec<Observation>, FetchError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport(format!("upstream returned status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        parse_daily(&body)
    }
}

/*
{
  "Meta Data": {
    "1. Information": "Daily Prices (open, high, low, close) and Volumes",
    "2. Symbol": "IBM",
    "3. Last Refreshed": "2024-05-28",
    "4. Output Size": "Compact",
    "5. Time Zone": "US/Eastern"
  },
  "Time Series (Daily)": {
    "2024-05-28": {
      "1. open": "170.4400",
      "2. high": "171.0850",
      "3. low": "168.6500",
      "4. close": "169.6600",
      "5. volume": "2629222"
    },
    ...
*/
#[derive(Deserialize, Debug)]
pub struct DailyStock {
    #[serde(rename = "Meta Data")]
    meta_data: Option<MetaData>,
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<DailySeries>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct MetaData {
    #[serde(rename = "2. Symbol")]
    symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    last_refreshed: String,
}

#[derive(Deserialize, Debug)]
pub struct CandleStick {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Daily entries in document order.
#[derive(Debug)]
pub struct DailySeries(Vec<Observation>);

pub const FORMAT: &str = "%Y-%m-%d";

impl<'de> Deserialize<'de> for DailySeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SeriesVisitor;

        impl<'de> Visitor<'de> for SeriesVisitor {
            type Value = DailySeries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("map should contain dates and candle stick data")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut observations = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, candle_stick)) = map.next_entry::<String, CandleStick>()? {
                    let date = NaiveDate::parse_from_str(&key, FORMAT).map_err(serde::de::Error::custom)?;
                    observations.push(Observation::new(
                        date,
                        parse_price::<M::Error>(&candle_stick.open, "open")?,
                        parse_price::<M::Error>(&candle_stick.close, "close")?,
                        parse_field::<_, M::Error>(&candle_stick.volume, "volume")?,
                    ));
                }
                Ok(DailySeries(observations))
            }
        }

        deserializer.deserialize_map(SeriesVisitor)
    }
}

fn parse_field<T, E>(raw: &str, field: &str) -> Result<T, E>
where
    T: std::str::FromStr,
    E: serde::de::Error,
{
    raw.trim()
        .parse()
        .map_err(|_| E::custom(format!("invalid {field} value {raw:?}")))
}

// `f64::from_str` accepts "NaN" and "inf", which would serialize as null.
fn parse_price<E: serde::de::Error>(raw: &str, field: &str) -> Result<f64, E> {
    let price = parse_field::<f64, E>(raw, field)?;
    if price.is_finite() {
        Ok(price)
    } else {
        Err(E::custom(format!("non-finite {field} value {raw:?}")))
    }
}

pub fn parse_daily(body: &str) -> Result<Vec<Observation>, FetchError> {
    let stock: DailyStock =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if let Some(meta) = &stock.meta_data {
        debug!(symbol = %meta.symbol, last_refreshed = %meta.last_refreshed, "daily series received");
    }

    match stock.time_series {
        Some(DailySeries(observations)) => Ok(observations),
        None => {
            let reason = stock
                .error_message
                .or(stock.note)
                .or(stock.information)
                .unwrap_or_else(|| "response has no daily time series".to_string());
            warn!(%reason, "upstream returned no data");
            Err(FetchError::Unavailable(reason))
        }
    }
}
