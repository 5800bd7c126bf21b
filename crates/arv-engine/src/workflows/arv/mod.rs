//! After-Repair-Value estimation from comparable sales.
//!
//! A request flows through [`ArvService::find_arv`]: every comp's listing page
//! is scraped (two at a time) into [`PropertyDetails`], scored against the
//! subject property, and kept only when the score clears
//! [`similarity::ACCEPTANCE_THRESHOLD`]. The surviving comps (or placeholders,
//! depending on [`FallbackPolicy`]) are then summarized for a structured
//! generation provider that returns the final estimate.

pub mod domain;
pub mod extraction;
pub mod intake;
pub mod router;
pub mod service;
pub mod similarity;
pub mod synthesis;
pub mod validator;

#[cfg(test)]
mod tests;

pub use domain::{ArvResult, Comp, HomeInfo, MainProperty, PropertyDetails, SaleListing};
pub use extraction::{
    DetailExtractor, ExtractionSchema, FirecrawlGateway, ScrapeError, ScrapeGateway, ScrapedPage,
};
pub use intake::{parse_request, ValidationError};
pub use router::{arv_router, ArvResponse};
pub use service::{ArvError, ArvService, FallbackPolicy};
pub use similarity::{SimilarityBreakdown, ACCEPTANCE_THRESHOLD};
pub use synthesis::{
    GenerationRequest, OpenAiProvider, ProviderError, SynthesisError, ValuationEstimate,
    ValuationProvider, ValuationSynthesizer,
};
pub use validator::{CompValidator, MAX_CONCURRENT_EXTRACTIONS};
