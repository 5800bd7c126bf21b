use super::domain::PropertyDetails;

/// Scores strictly above this value mark a comp as comparable.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.7;

const LOT_SIZE_TOLERANCE_SQFT: f64 = 1000.0;
const YEAR_BUILT_TOLERANCE: u32 = 10;

// Weights in tenths; they sum to 10 so the score divides back to [0, 1] exactly.
const NEIGHBORHOOD_WEIGHT: u8 = 3;
const POOL_WEIGHT: u8 = 2;
const LOT_SIZE_WEIGHT: u8 = 2;
const YEAR_BUILT_WEIGHT: u8 = 2;
const CONDITION_WEIGHT: u8 = 1;
const TOTAL_WEIGHT: u8 = 10;

/// Which comparability predicates held for a pair of attribute records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityBreakdown {
    pub neighborhood: bool,
    pub pool: bool,
    pub lot_size: bool,
    pub year_built: bool,
    pub condition: bool,
}

impl SimilarityBreakdown {
    pub fn compare(main: &PropertyDetails, comp: &PropertyDetails) -> Self {
        Self {
            neighborhood: main.neighborhood == comp.neighborhood,
            pool: main.has_pool == comp.has_pool,
            lot_size: (main.lot_size - comp.lot_size).abs() < LOT_SIZE_TOLERANCE_SQFT,
            year_built: main.year_built.abs_diff(comp.year_built) < YEAR_BUILT_TOLERANCE,
            condition: main.condition == comp.condition,
        }
    }

    fn points(&self) -> u8 {
        [
            (self.neighborhood, NEIGHBORHOOD_WEIGHT),
            (self.pool, POOL_WEIGHT),
            (self.lot_size, LOT_SIZE_WEIGHT),
            (self.year_built, YEAR_BUILT_WEIGHT),
            (self.condition, CONDITION_WEIGHT),
        ]
        .into_iter()
        .filter(|(matched, _)| *matched)
        .map(|(_, weight)| weight)
        .sum()
    }

    pub fn score(&self) -> f64 {
        f64::from(self.points()) / f64::from(TOTAL_WEIGHT)
    }
}

/// Weighted similarity in [0, 1] between two attribute records.
pub fn score(main: &PropertyDetails, comp: &PropertyDetails) -> f64 {
    SimilarityBreakdown::compare(main, comp).score()
}

pub fn is_comparable(score: f64) -> bool {
    score > ACCEPTANCE_THRESHOLD
}
