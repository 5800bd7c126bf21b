mod openai;
pub(crate) mod prompt;
pub(crate) mod schema;

pub use openai::OpenAiProvider;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::domain::{Comp, MainProperty};

const ESTIMATE_SCHEMA_NAME: &str = "arv_estimate";

/// Structured payload every provider response must match exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ValuationEstimate {
    /// Estimated After Repair Value in dollars.
    pub arv: f64,
    /// Short rationale referencing the comps.
    pub explanation: String,
}

/// A single structured-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub schema_name: String,
    pub schema: Value,
    pub system_prompt: String,
    pub prompt: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Network(String),
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("provider returned no content")]
    EmptyResponse,
    #[error("provider response was not valid JSON: {0}")]
    Parse(String),
}

/// Boundary to the external structured-generation service.
#[async_trait]
pub trait ValuationProvider: Debug + Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("provider response does not match the valuation schema: {0}")]
    SchemaMismatch(#[source] serde_json::Error),
}

/// Turns the subject property and its comps into a single ARV estimate.
#[derive(Debug)]
pub struct ValuationSynthesizer<P> {
    provider: Arc<P>,
}

impl<P> ValuationSynthesizer<P>
where
    P: ValuationProvider,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub fn request_for(&self, main: &MainProperty, comps: &[Comp]) -> GenerationRequest {
        GenerationRequest {
            schema_name: ESTIMATE_SCHEMA_NAME.to_string(),
            schema: schema::strict_schema::<ValuationEstimate>(),
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            prompt: prompt::build_valuation_prompt(main, comps),
        }
    }

    pub async fn synthesize(
        &self,
        main: &MainProperty,
        comps: &[Comp],
    ) -> Result<ValuationEstimate, SynthesisError> {
        let request = self.request_for(main, comps);
        info!(comps = comps.len(), "requesting valuation synthesis");

        let response = self.provider.generate(request).await?;
        let estimate: ValuationEstimate =
            serde_json::from_value(response).map_err(SynthesisError::SchemaMismatch)?;

        info!(arv = estimate.arv, "valuation synthesized");
        Ok(estimate)
    }
}
