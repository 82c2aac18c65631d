//! Property-based tests for the summarization engine

use proptest::prelude::*;
use splitstat_analysis::{
    AnalysisError,
    config::{EFFECT_SIZE_LARGE, EFFECT_SIZE_MEDIUM, EngineConfig},
    record::{ArmPair, ExperimentRecord, MalformedInputError},
    summary::{self, SummaryPayload},
};
use splitstat_stats::{
    effect_size::EffectSizeInterpretation,
    proportion::{ProportionEstimate, WALD_Z_95},
};

fn records(control: (usize, usize), test: (usize, usize)) -> Vec<ExperimentRecord> {
    let mut records = vec![];
    for (label, (successes, n)) in [("control", control), ("test", test)] {
        records.extend(
            (0..n).map(|i| ExperimentRecord::new(format!("{label}-{i}"), label, i < successes)),
        );
    }
    records
}

fn summarize(control: (usize, usize), test: (usize, usize)) -> SummaryPayload {
    summary::summarize_records(
        records(control, test),
        ArmPair::default(),
        &EngineConfig::default(),
    )
    .unwrap()
}

/// `(successes, n)` with `n >= 1`
fn arb_arm(max_n: usize) -> impl Strategy<Value = (usize, usize)> {
    (1..=max_n).prop_flat_map(|n| (0..=n, Just(n)))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_rate_and_interval_are_ordered((successes, n) in arb_arm(5000)) {
        let estimate = ProportionEstimate::new(successes, n, WALD_Z_95);
        prop_assert!((0.0..=1.0).contains(&estimate.rate));
        prop_assert!(0.0 <= estimate.lower);
        prop_assert!(estimate.lower <= estimate.rate);
        prop_assert!(estimate.rate <= estimate.upper);
        prop_assert!(estimate.upper <= 1.0);
    }

    #[test]
    fn prop_interval_narrows_with_sample_size(
        (successes, n) in arb_arm(200),
        small in 1_usize..20,
        extra in 1_usize..20,
    ) {
        let large = small + extra;
        let narrow = ProportionEstimate::new(successes * large, n * large, WALD_Z_95);
        let wide = ProportionEstimate::new(successes * small, n * small, WALD_Z_95);
        prop_assert!(narrow.width() <= wide.width() + 1e-12);
    }

    #[test]
    fn prop_interpretation_matches_thresholds(d in -3.0_f64..3.0) {
        let expected = if d.abs() < EFFECT_SIZE_MEDIUM {
            EffectSizeInterpretation::Small
        } else if d.abs() < EFFECT_SIZE_LARGE {
            EffectSizeInterpretation::Medium
        } else {
            EffectSizeInterpretation::Large
        };
        prop_assert_eq!(EffectSizeInterpretation::from_value(d), expected);
    }

    #[test]
    fn prop_arm_swap_symmetry(control in arb_arm(300), test in arb_arm(300)) {
        let forward = summarize(control, test);
        let swapped = summarize(test, control);

        let (f, s) = (&forward.association_test, &swapped.association_test);
        prop_assert_eq!(f.outcome.is_defined(), s.outcome.is_defined());
        if let (Some(a), Some(b)) = (f.statistic(), s.statistic()) {
            prop_assert!(close(a, b), "chi-squared {} vs {}", a, b);
            prop_assert!(close(f.p_value().unwrap(), s.p_value().unwrap()));
        }

        let (f, s) = (&forward.difference_test, &swapped.difference_test);
        prop_assert_eq!(f.outcome.is_defined(), s.outcome.is_defined());
        if let (Some(a), Some(b)) = (f.statistic(), s.statistic()) {
            prop_assert!(close(a, -b), "t {} vs {}", a, b);
            prop_assert!(close(f.p_value().unwrap(), s.p_value().unwrap()));
        }

        prop_assert!(close(forward.effect_size.value, -swapped.effect_size.value));
    }

    #[test]
    fn prop_identical_arms_are_not_significant(arm in arb_arm(1000)) {
        let payload = summarize(arm, arm);
        prop_assert!(!payload.difference_test.is_significant);
        prop_assert!(!payload.association_test.is_significant);
        prop_assert_eq!(payload.effect_size.value, 0.0);
        prop_assert_eq!(payload.effect_size.interpretation, EffectSizeInterpretation::Small);
    }

    #[test]
    fn prop_empty_arm_has_zero_interval(arm in arb_arm(500)) {
        let payload = summarize(arm, (0, 0));
        let test = &payload.metrics[1];
        prop_assert_eq!(test.n, 0);
        prop_assert_eq!((test.rate, test.ci_lower, test.ci_upper), (0.0, 0.0, 0.0));
        prop_assert!(!payload.difference_test.is_significant);
        prop_assert_eq!(payload.effect_size.value, 0.0);
    }
}

#[test]
fn test_effect_size_boundaries() {
    assert_eq!(
        EffectSizeInterpretation::from_value(0.2),
        EffectSizeInterpretation::Medium
    );
    assert_eq!(
        EffectSizeInterpretation::from_value(0.5),
        EffectSizeInterpretation::Large
    );
}

#[test]
fn test_four_point_lift_gains_significance_with_sample_size() {
    let small = summarize((60, 500), (80, 500));
    let large = summarize((120, 1000), (160, 1000));

    assert!(!small.difference_test.is_significant);
    assert!(large.difference_test.is_significant);
    assert!(large.difference_test.p_value().unwrap() < small.difference_test.p_value().unwrap());
    assert!(matches!(
        small.effect_size.interpretation,
        EffectSizeInterpretation::Small | EffectSizeInterpretation::Medium
    ));
}

#[test]
fn test_third_arm_is_malformed() {
    let mut records = records((5, 10), (6, 10));
    records.push(ExperimentRecord::new("holdout-0", "holdout", true));
    let err = summary::summarize_records(records, ArmPair::default(), &EngineConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::MalformedInput(MalformedInputError::UnknownArm { .. })
    ));
}
