use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{ArvResult, Comp, MainProperty, PropertyDetails};
use super::extraction::{DetailExtractor, ScrapeGateway};
use super::synthesis::{SynthesisError, ValuationProvider, ValuationSynthesizer};
use super::validator::CompValidator;

/// What to do when no comp survives validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Value the property against every submitted comp with placeholder details.
    #[default]
    Placeholder,
    /// Fail the request with [`ArvError::NoValidatedComps`].
    Reject,
}

impl FallbackPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "placeholder" | "placeholders" | "default" => Some(Self::Placeholder),
            "reject" | "error" | "strict" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Error raised by [`ArvService::find_arv`].
#[derive(Debug, thiserror::Error)]
pub enum ArvError {
    #[error("no validated comparables among {candidates} submitted comps")]
    NoValidatedComps { candidates: usize },
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Service sequencing comp validation, the fallback policy, and valuation synthesis.
pub struct ArvService<S, P> {
    validator: CompValidator<S>,
    synthesizer: ValuationSynthesizer<P>,
    fallback: FallbackPolicy,
}

impl<S, P> ArvService<S, P>
where
    S: ScrapeGateway + 'static,
    P: ValuationProvider + 'static,
{
    pub fn new(scraper: Arc<S>, provider: Arc<P>) -> Self {
        Self::with_fallback(scraper, provider, FallbackPolicy::default())
    }

    pub fn with_fallback(scraper: Arc<S>, provider: Arc<P>, fallback: FallbackPolicy) -> Self {
        let extractor = Arc::new(DetailExtractor::new(scraper));
        Self {
            validator: CompValidator::new(extractor),
            synthesizer: ValuationSynthesizer::new(provider),
            fallback,
        }
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Estimate the After Repair Value of `main` from candidate `comps`.
    pub async fn find_arv(
        &self,
        main: &MainProperty,
        comps: Vec<Comp>,
    ) -> Result<ArvResult, ArvError> {
        let validated = self.validator.validate(main, &comps).await;

        let validated_comps = if validated.is_empty() {
            self.apply_fallback(comps)?
        } else {
            validated
        };

        let estimate = self.synthesizer.synthesize(main, &validated_comps).await?;
        info!(
            address = %main.address,
            arv = estimate.arv,
            comps = validated_comps.len(),
            "ARV estimate ready"
        );

        Ok(ArvResult {
            arv: estimate.arv,
            explanation: estimate.explanation,
            validated_comps,
        })
    }

    fn apply_fallback(&self, comps: Vec<Comp>) -> Result<Vec<Comp>, ArvError> {
        match self.fallback {
            FallbackPolicy::Placeholder => {
                warn!(
                    comps = comps.len(),
                    "no validated comps found; proceeding with provided comps for ARV estimation"
                );
                Ok(comps
                    .into_iter()
                    .map(|comp| comp.with_details(PropertyDetails::placeholder()))
                    .collect())
            }
            FallbackPolicy::Reject => {
                warn!(comps = comps.len(), "no validated comps found; rejecting request");
                Err(ArvError::NoValidatedComps {
                    candidates: comps.len(),
                })
            }
        }
    }
}
