use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::domain::{Comp, MainProperty, PropertyDetails};
use super::extraction::{DetailExtractor, ScrapeGateway};
use super::similarity::{self, SimilarityBreakdown};

/// Upper bound on simultaneous scrapes issued for a single valuation.
pub const MAX_CONCURRENT_EXTRACTIONS: usize = 2;

/// Extracts details for every comp and keeps the ones comparable to the
/// subject property, in submission order.
pub struct CompValidator<S> {
    extractor: Arc<DetailExtractor<S>>,
}

impl<S> CompValidator<S>
where
    S: ScrapeGateway + 'static,
{
    pub fn new(extractor: Arc<DetailExtractor<S>>) -> Self {
        Self { extractor }
    }

    pub async fn validate(&self, main: &MainProperty, comps: &[Comp]) -> Vec<Comp> {
        let permits = Arc::new(Semaphore::new(MAX_CONCURRENT_EXTRACTIONS));
        let reference = Arc::new(main.details.clone());
        let mut tasks = JoinSet::new();

        for (index, comp) in comps.iter().cloned().enumerate() {
            let permits = permits.clone();
            let extractor = self.extractor.clone();
            let reference = reference.clone();

            tasks.spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => assess(&extractor, &reference, comp).await,
                    Err(error) => {
                        warn!(%error, "extraction permits closed; skipping comp");
                        None
                    }
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<Comp>> = vec![None; comps.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = outcome,
                Err(error) => warn!(%error, "comp validation task failed"),
            }
        }

        let validated: Vec<Comp> = slots.into_iter().flatten().collect();
        info!(
            candidates = comps.len(),
            validated = validated.len(),
            "comp validation complete"
        );
        validated
    }
}

async fn assess<S>(
    extractor: &DetailExtractor<S>,
    reference: &PropertyDetails,
    comp: Comp,
) -> Option<Comp>
where
    S: ScrapeGateway + 'static,
{
    let Some(details) = extractor.extract(&comp.detail_url).await else {
        debug!(address = %comp.address, "no details extracted; dropping comp");
        return None;
    };

    let breakdown = SimilarityBreakdown::compare(reference, &details);
    let score = breakdown.score();

    if similarity::is_comparable(score) {
        debug!(address = %comp.address, score, "comp accepted");
        Some(comp.with_details(details))
    } else {
        debug!(address = %comp.address, score, ?breakdown, "comp rejected");
        None
    }
}
