use crate::errors::{AppError, Result};
use crate::models::PriceRecord;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can hand back the raw price feed.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(&self) -> Result<Vec<PriceRecord>>;
}

/// Fetches the price feed as a JSON array over HTTP.
#[derive(Clone)]
pub struct HttpPriceSource {
    client: Client,
    url: String,
}

impl HttpPriceSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_prices(&self) -> Result<Vec<PriceRecord>> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await?;
        let records = parse_price_feed(&body)?;
        debug!(count = records.len(), url = %self.url, "[CATALOG] price feed fetched");
        Ok(records)
    }
}

/// Decode a price feed body, insisting on a top-level array.
///
/// Entries that do not decode (bad date, missing price, ...) are skipped.
pub fn parse_price_feed(body: &str) -> Result<Vec<PriceRecord>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(AppError::InvalidFormat("expected array".into()));
    };
    let records = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<PriceRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "[CATALOG] skipping malformed price record");
                None
            }
        })
        .collect();
    Ok(records)
}
