//! Property-based checks for the fusion engine.

use proptest::prelude::*;

use parkiq_core::{FusionEngine, Modality, ModalityResult};

fn arb_result(modality: Modality) -> impl Strategy<Value = ModalityResult> {
    (0.0f64..=1.0, 0.0f64..=1.0).prop_map(move |(probability_pd, confidence)| {
        ModalityResult::new(modality, probability_pd, 1.0 - probability_pd, confidence)
            .expect("generated result satisfies invariants")
    })
}

fn arb_result_set() -> impl Strategy<Value = Vec<ModalityResult>> {
    proptest::sample::subsequence(Modality::all().to_vec(), 0..=3).prop_flat_map(|modalities| {
        modalities
            .into_iter()
            .map(arb_result)
            .collect::<Vec<_>>()
    })
}

proptest! {
    #[test]
    fn probabilities_sum_to_one_and_stay_in_bounds(results in arb_result_set()) {
        let verdict = FusionEngine::default().fuse(&results).unwrap();

        prop_assert!((verdict.probability_pd + verdict.probability_healthy - 1.0).abs() < 1e-9);
        prop_assert!((0.0..=1.0).contains(&verdict.probability_pd));
        prop_assert!((0.0..=1.0).contains(&verdict.probability_healthy));
        prop_assert!((0.0..=1.0).contains(&verdict.confidence));
    }

    #[test]
    fn verdict_is_identical_under_permutation(
        results in arb_result_set(),
        seed in any::<u64>(),
    ) {
        let engine = FusionEngine::default();
        let baseline = engine.fuse(&results).unwrap();

        let mut shuffled = results.clone();
        // Deterministic Fisher-Yates from the generated seed.
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        prop_assert_eq!(engine.fuse(&shuffled).unwrap(), baseline);
    }

    #[test]
    fn fused_probability_stays_within_contributing_inputs(results in arb_result_set()) {
        let verdict = FusionEngine::default().fuse(&results).unwrap();
        prop_assert!(verdict.insufficient_data || !results.is_empty());

        if !verdict.insufficient_data {
            let contributing: Vec<&ModalityResult> = results
                .iter()
                .filter(|r| r.confidence > 0.0)
                .collect();
            let lo = contributing.iter().map(|r| r.probability_pd).fold(f64::INFINITY, f64::min);
            let hi = contributing.iter().map(|r| r.probability_pd).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(verdict.probability_pd >= lo - 1e-9);
            prop_assert!(verdict.probability_pd <= hi + 1e-9);
        }
    }

    #[test]
    fn raising_confidence_of_an_above_verdict_result_raises_the_verdict(
        results in arb_result_set().prop_filter("need at least two contributors", |rs| {
            rs.iter().filter(|r| r.confidence > 0.01 && r.confidence < 0.99).count() >= 2
        }),
        bump in 0.001f64..=0.01,
    ) {
        let engine = FusionEngine::default();
        let baseline = engine.fuse(&results).unwrap();
        prop_assume!(!baseline.insufficient_data);

        // Pick a contributor strictly above the fused probability, if any.
        let target = results.iter().position(|r| {
            r.confidence > 0.01
                && r.confidence + bump <= 1.0
                && r.probability_pd > baseline.probability_pd + 1e-6
        });
        prop_assume!(target.is_some());
        let target = target.unwrap();

        let mut boosted = results.clone();
        boosted[target].confidence += bump;
        let moved = engine.fuse(&boosted).unwrap();

        prop_assert!(moved.probability_pd > baseline.probability_pd);
    }
}

#[test]
fn degradation_matches_designed_fallback_exactly() {
    let engine = FusionEngine::default();

    let empty = engine.fuse(&[]).unwrap();
    assert!(empty.insufficient_data);
    assert_eq!(
        (empty.probability_pd, empty.probability_healthy, empty.confidence),
        (0.5, 0.5, 0.0)
    );
    assert_eq!(empty.prediction.as_u8(), 0);

    let unusable = ModalityResult::new(Modality::Datscan, 0.9, 0.1, 0.0).unwrap();
    let zeroed = engine.fuse(&[unusable]).unwrap();
    assert!(zeroed.insufficient_data);
    assert_eq!(
        (zeroed.probability_pd, zeroed.probability_healthy, zeroed.confidence),
        (0.5, 0.5, 0.0)
    );
    assert_eq!(zeroed.prediction.as_u8(), 0);
}
