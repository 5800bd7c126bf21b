use arv_engine::config::AppConfig;
use arv_engine::error::AppError;
use arv_engine::workflows::arv::{ArvService, FirecrawlGateway, OpenAiProvider};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type LiveArvService = ArvService<FirecrawlGateway, OpenAiProvider>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the Firecrawl gateway and OpenAI provider from configuration.
/// Fails fast when either API key is missing.
pub(crate) fn build_arv_service(config: &AppConfig) -> Result<LiveArvService, AppError> {
    let scraping = &config.scraping;
    let scraper = FirecrawlGateway::new(
        scraping.require_api_key()?,
        scraping.base_url.as_str(),
        scraping.timeout,
    )?;

    let valuation = &config.valuation;
    let provider = OpenAiProvider::new(
        valuation.require_api_key()?,
        valuation.base_url.as_str(),
        valuation.model.as_str(),
        valuation.timeout,
    )?;

    info!(
        model = provider.model(),
        fallback = ?valuation.fallback_policy,
        "valuation pipeline configured"
    );

    Ok(ArvService::with_fallback(
        Arc::new(scraper),
        Arc::new(provider),
        valuation.fallback_policy,
    ))
}
