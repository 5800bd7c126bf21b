use super::common::*;
use crate::workflows::arv::domain::PropertyDetails;
use crate::workflows::arv::similarity::{self, SimilarityBreakdown, ACCEPTANCE_THRESHOLD};

#[test]
fn identical_records_score_exactly_one() {
    let details = subject_details();
    assert_eq!(similarity::score(&details, &details.clone()), 1.0);
}

#[test]
fn records_differing_everywhere_score_zero() {
    assert_eq!(
        similarity::score(&subject_details(), &unrelated_details()),
        0.0
    );
}

#[test]
fn score_at_threshold_is_not_comparable() {
    let score = similarity::score(&subject_details(), &threshold_details());

    assert_eq!(score, ACCEPTANCE_THRESHOLD);
    assert!(!similarity::is_comparable(score));
}

#[test]
fn score_above_threshold_is_comparable() {
    let comp = PropertyDetails {
        year_built: 1960,
        ..subject_details()
    };
    let score = similarity::score(&subject_details(), &comp);

    assert_eq!(score, 0.8);
    assert!(similarity::is_comparable(score));
}

#[test]
fn lot_size_tolerance_is_strict() {
    let main = subject_details();
    let near = PropertyDetails {
        lot_size: 5999.5,
        ..subject_details()
    };
    let edge = PropertyDetails {
        lot_size: 4000.0,
        ..subject_details()
    };

    assert!(SimilarityBreakdown::compare(&main, &near).lot_size);
    assert!(!SimilarityBreakdown::compare(&main, &edge).lot_size);
}

#[test]
fn year_built_tolerance_is_strict_in_both_directions() {
    let main = subject_details();
    let newer = PropertyDetails {
        year_built: 1999,
        ..subject_details()
    };
    let older_edge = PropertyDetails {
        year_built: 1980,
        ..subject_details()
    };

    assert!(SimilarityBreakdown::compare(&main, &newer).year_built);
    assert!(!SimilarityBreakdown::compare(&main, &older_edge).year_built);
}

#[test]
fn text_attributes_compare_exactly() {
    let main = subject_details();
    let comp = PropertyDetails {
        neighborhood: "elm".to_string(),
        condition: "Good ".to_string(),
        ..subject_details()
    };
    let breakdown = SimilarityBreakdown::compare(&main, &comp);

    assert!(!breakdown.neighborhood);
    assert!(!breakdown.condition);
    assert_eq!(breakdown.score(), 0.6);
}

#[test]
fn placeholder_details_never_clear_the_threshold() {
    let score = similarity::score(&subject_details(), &PropertyDetails::placeholder());
    assert!(score <= ACCEPTANCE_THRESHOLD);
}

#[test]
fn every_predicate_combination_stays_in_unit_interval() {
    for mask in 0u8..32 {
        let breakdown = SimilarityBreakdown {
            neighborhood: mask & 1 != 0,
            pool: mask & 2 != 0,
            lot_size: mask & 4 != 0,
            year_built: mask & 8 != 0,
            condition: mask & 16 != 0,
        };
        let score = breakdown.score();
        assert!((0.0..=1.0).contains(&score), "mask {mask} scored {score}");
    }
}
