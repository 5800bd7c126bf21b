//! Per-URL property detail extraction.
//!
//! The scraping service is asked for a schema-guided JSON extraction first.
//! When it only returns page markdown, [`markdown::parse_details`] recovers
//! what it can line by line. Any transport failure is reported as "no data"
//! so a single unreachable listing never aborts a valuation.

mod firecrawl;
pub(crate) mod markdown;

pub use firecrawl::FirecrawlGateway;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::domain::{PropertyDetails, UNKNOWN};

const EXTRACTION_SYSTEM_PROMPT: &str =
    "You are a real estate expert extracting property details.";
const EXTRACTION_PROMPT: &str =
    "Extract the neighborhood, hasPool, lotSize, yearBuilt, and condition from the page.";

/// Instructions sent alongside a scrape request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSchema {
    pub schema: Value,
    pub system_prompt: String,
    pub prompt: String,
}

impl ExtractionSchema {
    pub fn property_details() -> Self {
        Self {
            schema: json!({
                "type": "object",
                "properties": {
                    "neighborhood": { "type": "string" },
                    "hasPool": { "type": "boolean" },
                    "lotSize": { "type": "number" },
                    "yearBuilt": { "type": "number" },
                    "condition": { "type": "string" }
                }
            }),
            system_prompt: EXTRACTION_SYSTEM_PROMPT.to_string(),
            prompt: EXTRACTION_PROMPT.to_string(),
        }
    }
}

/// What the scraping service handed back for one page. Either half may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedPage {
    pub extracted: Option<Value>,
    pub markdown: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("scrape request failed: {0}")]
    Transport(String),
    #[error("scraping service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("scraping service reported failure for {url}")]
    Unsuccessful { url: String },
    #[error("unreadable scrape response: {0}")]
    Decode(String),
}

/// Boundary to the external page-scraping service.
#[async_trait]
pub trait ScrapeGateway: Debug + Send + Sync {
    async fn scrape(&self, url: &str, schema: &ExtractionSchema)
        -> Result<ScrapedPage, ScrapeError>;
}

/// Structured extraction output before defaults are applied. Every field is
/// optional because the service may return a partial object.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPropertyDetails {
    #[serde(default, deserialize_with = "lenient")]
    neighborhood: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    has_pool: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    lot_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    year_built: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    condition: Option<String>,
}

/// Mistyped values count as missing instead of failing the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl RawPropertyDetails {
    pub(crate) fn into_details(self) -> PropertyDetails {
        PropertyDetails {
            neighborhood: non_blank(self.neighborhood),
            has_pool: self.has_pool.unwrap_or(false),
            lot_size: self
                .lot_size
                .filter(|size| size.is_finite() && *size >= 0.0)
                .unwrap_or(0.0),
            year_built: self
                .year_built
                .filter(|year| year.is_finite() && *year >= 0.0 && *year <= f64::from(u32::MAX))
                .map(|year| year.trunc() as u32)
                .unwrap_or(0),
            condition: non_blank(self.condition),
        }
    }
}

fn non_blank(value: Option<String>) -> String {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Fetches and normalizes [`PropertyDetails`] for a listing URL.
#[derive(Debug)]
pub struct DetailExtractor<S> {
    gateway: Arc<S>,
    schema: ExtractionSchema,
}

impl<S> DetailExtractor<S>
where
    S: ScrapeGateway + 'static,
{
    pub fn new(gateway: Arc<S>) -> Self {
        Self {
            gateway,
            schema: ExtractionSchema::property_details(),
        }
    }

    /// Returns `None` when the page yields nothing usable or the scrape fails.
    pub async fn extract(&self, url: &str) -> Option<PropertyDetails> {
        let page = match self.gateway.scrape(url, &self.schema).await {
            Ok(page) => page,
            Err(error) => {
                warn!(%url, %error, "property detail scrape failed");
                return None;
            }
        };

        details_from_page(url, page)
    }
}

pub(crate) fn details_from_page(url: &str, page: ScrapedPage) -> Option<PropertyDetails> {
    let ScrapedPage {
        extracted,
        markdown,
    } = page;

    if let Some(value) = extracted.filter(|value| value.is_object()) {
        match serde_json::from_value::<RawPropertyDetails>(value) {
            Ok(raw) => return Some(raw.into_details()),
            Err(error) => debug!(%url, %error, "structured extraction unusable"),
        }
    }

    match markdown.filter(|content| !content.trim().is_empty()) {
        Some(content) => {
            debug!(%url, "falling back to markdown parsing");
            Some(markdown::parse_details(&content))
        }
        None => None,
    }
}
