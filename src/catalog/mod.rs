//! Price catalog.
//!
//! Responsibilities:
//! • Fetch the raw `{currency, date, price}` feed.
//! • Keep only the latest record per currency.
//! • Expose a popularity-sorted token list and a symbol -> price lookup.

use crate::errors::Result;
use crate::models::{PriceRecord, Token, TokenIcon};
use crate::rate;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

pub mod icons;
pub mod popularity;
pub mod source;

pub use icons::{HttpIconSource, IconSource, enrich_icons, spawn_icon_enrichment};
pub use popularity::{POPULAR_CRYPTOS, popularity_index};
pub use source::{HttpPriceSource, PriceSource};

/// Collapse the feed to one record per currency, keeping the latest `date`.
/// On equal dates the record seen first wins.
pub fn latest_prices(records: Vec<PriceRecord>) -> BTreeMap<String, PriceRecord> {
    let mut latest: BTreeMap<String, PriceRecord> = BTreeMap::new();
    for record in records {
        if !record.price.is_finite() || record.price < 0.0 {
            warn!(currency = %record.currency, price = record.price, "[CATALOG] skipping invalid price");
            continue;
        }
        match latest.get(&record.currency) {
            Some(existing) if existing.date >= record.date => {}
            _ => {
                latest.insert(record.currency.clone(), record);
            }
        }
    }
    latest
}

/// Build the selector list: popular symbols first, then alphabetical.
pub fn build_tokens(latest: &BTreeMap<String, PriceRecord>, icons_base: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = latest
        .values()
        .map(|rec| Token {
            symbol: rec.currency.clone(),
            icon: TokenIcon::Url(icons::icon_url(icons_base, &rec.currency)),
            price: Some(rec.price),
        })
        .collect();
    sort_tokens(&mut tokens);
    tokens
}

/// Popularity rank first, then case-insensitive symbol order
/// (`ampLUNA` < `ATOM` < `axlUSDC`).
pub fn sort_tokens(tokens: &mut [Token]) {
    tokens.sort_by(|a, b| {
        popularity_index(&a.symbol)
            .cmp(&popularity_index(&b.symbol))
            .then_with(|| a.symbol.to_lowercase().cmp(&b.symbol.to_lowercase()))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}

/// Loaded tokens plus a price lookup keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct PriceCatalog {
    tokens: Vec<Token>,
    prices: HashMap<String, f64>,
}

impl PriceCatalog {
    pub fn new(tokens: Vec<Token>) -> Self {
        let prices = tokens
            .iter()
            .filter_map(|t| t.price.map(|p| (t.symbol.clone(), p)))
            .collect();
        Self { tokens, prices }
    }

    pub fn from_records(records: Vec<PriceRecord>, icons_base: &str) -> Self {
        let latest = latest_prices(records);
        Self::new(build_tokens(&latest, icons_base))
    }

    /// Replace the token list, e.g. after icon enrichment.
    pub fn with_tokens(self, tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn find(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied()
    }

    pub fn exchange_rate(&self, from: &str, to: &str) -> f64 {
        rate::exchange_rate(self.price(from), self.price(to))
    }
}

/// Fetches and assembles a [`PriceCatalog`]. No retry on failure.
#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn PriceSource>,
    icons_base: String,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn PriceSource>, icons_base: impl Into<String>) -> Self {
        Self {
            source,
            icons_base: icons_base.into(),
        }
    }

    pub async fn load(&self) -> Result<PriceCatalog> {
        let records = self.source.fetch_prices().await?;
        let raw = records.len();
        let catalog = PriceCatalog::from_records(records, &self.icons_base);
        info!(raw, tokens = catalog.tokens().len(), "[CATALOG] loaded");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    const BASE: &str = "https://icons.test/tokens";

    fn record(currency: &str, secs: i64, price: f64) -> PriceRecord {
        PriceRecord {
            currency: currency.to_string(),
            date: Utc.timestamp_opt(secs, 0).unwrap(),
            price,
        }
    }

    struct FixedPrices(Vec<PriceRecord>);

    #[async_trait]
    impl PriceSource for FixedPrices {
        async fn fetch_prices(&self) -> Result<Vec<PriceRecord>> {
            Ok(self.0.clone())
        }
    }

    struct FailingPrices;

    #[async_trait]
    impl PriceSource for FailingPrices {
        async fn fetch_prices(&self) -> Result<Vec<PriceRecord>> {
            Err(AppError::HttpStatus(503))
        }
    }

    #[test]
    fn keeps_latest_record_per_currency() {
        let latest = latest_prices(vec![
            record("ETH", 200, 3100.0),
            record("ETH", 100, 3000.0),
            record("USD", 50, 1.0),
        ]);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest["ETH"].price, 3100.0);

        let latest = latest_prices(vec![record("ETH", 100, 3000.0), record("ETH", 200, 3100.0)]);
        assert_eq!(latest["ETH"].price, 3100.0);
    }

    #[test]
    fn equal_dates_keep_first_seen() {
        let latest = latest_prices(vec![record("ATOM", 10, 7.0), record("ATOM", 10, 8.0)]);
        assert_eq!(latest["ATOM"].price, 7.0);
    }

    #[test]
    fn drops_negative_prices() {
        let latest = latest_prices(vec![record("BAD", 10, -1.0), record("OK", 10, 0.0)]);
        assert!(!latest.contains_key("BAD"));
        assert!(latest.contains_key("OK"));
    }

    #[test]
    fn tokens_sorted_by_popularity_then_symbol() {
        let catalog = PriceCatalog::from_records(
            vec![
                record("ATOM", 1, 7.0),
                record("USD", 1, 1.0),
                record("BLUR", 1, 0.2),
                record("ETH", 1, 3000.0),
                record("WBTC", 1, 26000.0),
            ],
            BASE,
        );
        let symbols: Vec<&str> = catalog.tokens().iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETH", "USD", "WBTC", "ATOM", "BLUR"]);
        assert_eq!(
            catalog.find("ETH").map(|t| t.icon.clone()),
            Some(TokenIcon::Url(format!("{BASE}/ETH.svg")))
        );
    }

    #[test]
    fn symbol_order_ignores_case() {
        let catalog = PriceCatalog::from_records(
            vec![
                record("ATOM", 1, 7.0),
                record("ampLUNA", 1, 1.0),
                record("BLUR", 1, 0.2),
                record("axlUSDC", 1, 1.0),
                record("ZIL", 1, 0.02),
                record("bNEO", 1, 7.0),
                record("USDC", 1, 1.0),
            ],
            BASE,
        );
        let symbols: Vec<&str> = catalog.tokens().iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(
            symbols,
            vec!["USDC", "ampLUNA", "ATOM", "axlUSDC", "BLUR", "bNEO", "ZIL"]
        );
    }

    #[test]
    fn catalog_rate_uses_latest_prices() {
        let catalog = PriceCatalog::from_records(
            vec![record("ETH", 1, 2000.0), record("ETH", 2, 3000.0), record("USD", 1, 1.0)],
            BASE,
        );
        assert_eq!(catalog.price("ETH"), Some(3000.0));
        assert_eq!(catalog.exchange_rate("ETH", "USD"), 3000.0);
        assert_eq!(catalog.exchange_rate("ETH", "NOPE"), 0.0);
    }

    #[test]
    fn tokens_without_price_are_not_priced() {
        let catalog = PriceCatalog::new(vec![Token {
            symbol: "X".into(),
            icon: TokenIcon::Url(String::new()),
            price: None,
        }]);
        assert!(catalog.find("X").is_some());
        assert_eq!(catalog.price("X"), None);
    }

    #[tokio::test]
    async fn loader_builds_catalog() {
        let loader = CatalogLoader::new(
            Arc::new(FixedPrices(vec![record("USD", 1, 1.0), record("ETH", 1, 3000.0)])),
            BASE,
        );
        let catalog = loader.load().await.expect("load should succeed");
        assert_eq!(catalog.tokens()[0].symbol, "ETH");
    }

    #[tokio::test]
    async fn loader_surfaces_single_error() {
        let loader = CatalogLoader::new(Arc::new(FailingPrices), BASE);
        let err = loader.load().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }
}
