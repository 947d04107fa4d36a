use anyhow::Result;
use std::sync::Arc;
use token_swap::{
    catalog::{
        CatalogLoader, HttpIconSource, HttpPriceSource, IconSource, PriceCatalog,
        spawn_icon_enrichment,
    },
    config::AppConfig,
    errors::AppError,
    session::SwapSession,
    submission::SubmissionSimulator,
    utils,
    validation::FormValidator,
};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    tracing::info!(
        prices_url = %config.prices_url,
        max_amount_usd = config.validation.max_amount_usd,
        success_rate = config.submission.success_rate,
        "[INIT] token-swap starting"
    );

    // Catalog ---------------------------------------------------------------
    let price_source = Arc::new(HttpPriceSource::new(
        config.prices_url.clone(),
        config.http_timeout,
    )?);
    let loader = CatalogLoader::new(price_source, config.icons_base_url.clone());
    let catalog = load_catalog(&loader, config.catalog_reloads).await?;

    // Icons (best effort, published when done) ------------------------------
    let icon_source: Arc<dyn IconSource> = Arc::new(HttpIconSource::new(config.http_timeout)?);
    let (icons_tx, icons_rx) = watch::channel(catalog.tokens().to_vec());
    let icons_task = spawn_icon_enrichment(
        catalog.tokens().to_vec(),
        icon_source,
        config.icons_base_url.clone(),
        icons_tx,
    );

    // Session ---------------------------------------------------------------
    let mut session = SwapSession::new(catalog, FormValidator::new(config.validation));
    if session.apply_default_pair() {
        tracing::info!("[INIT] default pair ETH -> USD selected");
    }
    if let Ok(symbol) = std::env::var("SWAP_FROM") {
        session.select_from_token(&symbol)?;
    }
    if let Ok(symbol) = std::env::var("SWAP_TO") {
        session.select_to_token(&symbol)?;
    }
    let amount = std::env::var("SWAP_AMOUNT").unwrap_or_else(|_| "1".into());
    session.set_from_amount(&amount);

    tracing::info!(
        from_amount = %session.form().from_amount,
        to_amount = %session.form().to_amount,
        rate = %session.rate_display().unwrap_or_default(),
        notional = %session.from_notional_display().unwrap_or_default(),
        over_limit = session.is_amount_over_limit(),
        "[SWAP] form ready"
    );

    let simulator = SubmissionSimulator::new(config.submission)?;
    match session.submit(&simulator).await {
        Ok(outcome) if outcome.success => tracing::info!(detail = %outcome.message, "[SWAP] done"),
        Ok(outcome) => tracing::warn!(detail = %outcome.message, "[SWAP] done"),
        Err(AppError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                tracing::warn!(%field, reason = message, "[SWAP] invalid input");
            }
        }
        Err(e) => return Err(e.into()),
    }

    // The task publishes once right before it exits.
    if icons_task.await.is_ok() {
        let tokens = icons_rx.borrow().clone();
        let refreshed = session.catalog().clone().with_tokens(tokens);
        session.replace_catalog(refreshed);
        let resolved = session
            .catalog()
            .tokens()
            .iter()
            .filter(|t| t.icon.is_resolved())
            .count();
        tracing::info!(resolved, "[ICONS] catalog refreshed");
    }

    Ok(())
}

/// Load the catalog, reloading from scratch up to `reloads` more times.
async fn load_catalog(loader: &CatalogLoader, reloads: u32) -> Result<PriceCatalog> {
    let mut attempt = 0;
    loop {
        match loader.load().await {
            Ok(catalog) => return Ok(catalog),
            Err(e) if attempt < reloads => {
                attempt += 1;
                tracing::warn!(error = %e, attempt, "[CATALOG] load failed, reloading");
            }
            Err(e) => {
                tracing::error!(error = %e, "[CATALOG] Error loading token data");
                return Err(e.into());
            }
        }
    }
}
