//! Best-effort icon enrichment.
//!
//! Tokens start out with an unresolved URL reference. This pass fetches the
//! SVG for each one, retrying with a rewritten symbol (`ST` -> `st`, leading
//! `R` -> `r`) when the upstream repository stores the file under a
//! different case. Any failure leaves the token untouched.

use crate::errors::{AppError, Result};
use crate::models::{Token, TokenIcon};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[async_trait]
pub trait IconSource: Send + Sync {
    /// Fetch the SVG body behind `url`.
    async fn fetch_icon(&self, url: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct HttpIconSource {
    client: Client,
}

impl HttpIconSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl IconSource for HttpIconSource {
    async fn fetch_icon(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// `<base>/<symbol>.svg`
pub fn icon_url(base: &str, symbol: &str) -> String {
    format!("{}/{}.svg", base.trim_end_matches('/'), symbol)
}

/// Rewrite applied after a failed fetch: leading `ST` becomes `st`, then a
/// leading `R` becomes `r`.
pub fn fallback_symbol(symbol: &str) -> String {
    let rewritten = match symbol.strip_prefix("ST") {
        Some(rest) => format!("st{rest}"),
        None => symbol.to_string(),
    };
    match rewritten.strip_prefix('R') {
        Some(rest) => format!("r{rest}"),
        None => rewritten,
    }
}

/// Try `symbol`, then each successive fallback rewrite, until one resolves.
pub async fn resolve_icon(source: &dyn IconSource, base: &str, symbol: &str) -> Option<String> {
    let mut candidate = symbol.to_string();
    loop {
        let url = icon_url(base, &candidate);
        match source.fetch_icon(&url).await {
            Ok(svg) => return Some(svg),
            Err(e) => debug!(symbol = %candidate, error = %e, "[ICONS] fetch failed"),
        }
        let next = fallback_symbol(&candidate);
        if next == candidate {
            return None;
        }
        candidate = next;
    }
}

/// Resolve icons for every token still pointing at a URL. Order is kept.
pub async fn enrich_icons(tokens: Vec<Token>, source: &dyn IconSource, base: &str) -> Vec<Token> {
    let tasks = tokens.into_iter().map(|token| async move {
        if token.icon.is_resolved() {
            return token;
        }
        match resolve_icon(source, base, &token.symbol).await {
            Some(svg) => Token {
                icon: TokenIcon::Svg(svg),
                ..token
            },
            None => {
                warn!(symbol = %token.symbol, "[ICONS] no icon found, keeping url");
                token
            }
        }
    });
    join_all(tasks).await
}

/// Run [`enrich_icons`] in the background and publish the result.
pub fn spawn_icon_enrichment(
    tokens: Vec<Token>,
    source: Arc<dyn IconSource>,
    base: String,
    tx: watch::Sender<Vec<Token>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let enriched = enrich_icons(tokens, source.as_ref(), &base).await;
        let resolved = enriched.iter().filter(|t| t.icon.is_resolved()).count();
        info!(resolved, total = enriched.len(), "[ICONS] enrichment finished");
        let _ = tx.send(enriched);
    })
}
