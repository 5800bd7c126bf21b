use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::arv::domain::{Comp, MainProperty, PropertyDetails};
use crate::workflows::arv::extraction::{ExtractionSchema, ScrapeError, ScrapeGateway, ScrapedPage};
use crate::workflows::arv::service::{ArvService, FallbackPolicy};
use crate::workflows::arv::synthesis::{GenerationRequest, ProviderError, ValuationProvider};

pub(super) fn subject_details() -> PropertyDetails {
    PropertyDetails {
        neighborhood: "Elm".to_string(),
        has_pool: false,
        lot_size: 5000.0,
        year_built: 1990,
        condition: "Good".to_string(),
    }
}

pub(super) fn main_property() -> MainProperty {
    MainProperty {
        address: "1 Main St".to_string(),
        bedrooms: 3.0,
        bathrooms: 2.0,
        square_footage: 1500.0,
        detail_url: None,
        details: subject_details(),
    }
}

/// Details matching the subject on every predicate except year built and condition.
pub(super) fn threshold_details() -> PropertyDetails {
    PropertyDetails {
        year_built: 1960,
        condition: "Fair".to_string(),
        ..subject_details()
    }
}

pub(super) fn unrelated_details() -> PropertyDetails {
    PropertyDetails {
        neighborhood: "Harbor".to_string(),
        has_pool: true,
        lot_size: 12000.0,
        year_built: 2015,
        condition: "Needs Work".to_string(),
    }
}

pub(super) fn comp(index: usize) -> Comp {
    Comp::new(
        format!("{index} Comparable Ct"),
        listing_url(index),
        300000.0 + index as f64 * 1000.0,
    )
}

pub(super) fn listing_url(index: usize) -> String {
    format!("https://listings.example/homedetails/{index}")
}

pub(super) fn structured_page(details: &PropertyDetails) -> ScrapedPage {
    ScrapedPage {
        extracted: Some(serde_json::to_value(details).expect("details serialize")),
        markdown: None,
    }
}

#[derive(Debug, Clone)]
pub(super) enum Scripted {
    Page(ScrapedPage),
    Fail,
}

/// Scraper double replaying scripted pages per URL while tracking how many
/// scrapes overlap.
#[derive(Debug, Default)]
pub(super) struct ScriptedScraper {
    pages: HashMap<String, (Scripted, Duration)>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl ScriptedScraper {
    pub(super) fn with_page(mut self, url: String, page: ScrapedPage) -> Self {
        self.pages.insert(url, (Scripted::Page(page), Duration::ZERO));
        self
    }

    pub(super) fn with_delayed_page(
        mut self,
        url: String,
        page: ScrapedPage,
        delay: Duration,
    ) -> Self {
        self.pages.insert(url, (Scripted::Page(page), delay));
        self
    }

    pub(super) fn with_failure(mut self, url: String) -> Self {
        self.pages.insert(url, (Scripted::Fail, Duration::ZERO));
        self
    }

    pub(super) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScrapeGateway for ScriptedScraper {
    async fn scrape(
        &self,
        url: &str,
        _schema: &ExtractionSchema,
    ) -> Result<ScrapedPage, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let (scripted, delay) = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or((Scripted::Page(ScrapedPage::default()), Duration::ZERO));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match scripted {
            Scripted::Page(page) => Ok(page),
            Scripted::Fail => Err(ScrapeError::Transport("connection reset".to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub(super) enum Reply {
    Json(Value),
    Fail,
}

/// Provider double returning a fixed reply and recording every request.
#[derive(Debug)]
pub(super) struct StubProvider {
    reply: Reply,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl StubProvider {
    pub(super) fn returning(value: Value) -> Self {
        Self {
            reply: Reply::Json(value),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            reply: Reply::Fail,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("request mutex poisoned").clone()
    }
}

#[async_trait]
impl ValuationProvider for StubProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, ProviderError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request);
        match &self.reply {
            Reply::Json(value) => Ok(value.clone()),
            Reply::Fail => Err(ProviderError::Api {
                status: 503,
                body: "model overloaded".to_string(),
            }),
        }
    }
}

pub(super) fn fixed_estimate() -> Value {
    json!({ "arv": 310000, "explanation": "x" })
}

pub(super) fn service(
    scraper: ScriptedScraper,
    provider: StubProvider,
    fallback: FallbackPolicy,
) -> (
    ArvService<ScriptedScraper, StubProvider>,
    Arc<ScriptedScraper>,
    Arc<StubProvider>,
) {
    let scraper = Arc::new(scraper);
    let provider = Arc::new(provider);
    let service = ArvService::with_fallback(scraper.clone(), provider.clone(), fallback);
    (service, scraper, provider)
}

pub(super) fn request_payload(comps: Vec<Value>) -> Value {
    json!({
        "mainProperty": {
            "address": "1 Main St",
            "bedrooms": 3,
            "bathrooms": 2,
            "squareFootage": 1500,
            "details": {
                "neighborhood": "Elm",
                "hasPool": false,
                "lotSize": 5000,
                "yearBuilt": 1990,
                "condition": "Good"
            }
        },
        "comps": comps
    })
}

pub(super) fn comp_payload(index: usize) -> Value {
    json!({
        "address": format!("{index} Comparable Ct"),
        "detailUrl": listing_url(index),
        "hdpData": { "homeInfo": { "price": 300000 + index * 1000 } }
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
