//! End-to-end estimation tests on the synthetic mode-choice dataset.

mod common;

use approx::assert_relative_eq;
use choice_rs::prelude::*;
use common::{
    mode_choice_data, mode_choice_params, mode_choice_spec, TRUE_ASC_BIKE, TRUE_ASC_TRANSIT,
    TRUE_BETA_COST, TRUE_BETA_TIME,
};

#[test]
fn test_parameter_recovery_100_respondents() {
    let data = mode_choice_data(100);
    let spec = mode_choice_spec();
    let params = mode_choice_params();

    let fitted = NewtonEstimator::builder()
        .build()
        .fit(&data, &spec, &params)
        .expect("fit should succeed");
    let result = fitted.result();

    assert!(fitted.converged());
    assert!(result.log_likelihood > result.null_log_likelihood);

    // Recovered estimates fall within a few standard errors of the truth.
    for (name, truth) in [
        ("asc_transit", TRUE_ASC_TRANSIT),
        ("asc_bike", TRUE_ASC_BIKE),
        ("beta_cost", TRUE_BETA_COST),
        ("beta_time", TRUE_BETA_TIME),
    ] {
        let estimate = result.value(name).unwrap();
        let se = result.std_error(name).unwrap();
        assert!(se > 0.0, "{name}: standard error must be positive");
        let bound = (4.0 * se).max(0.15);
        assert!(
            (estimate - truth).abs() < bound,
            "{name}: estimate {estimate} too far from true value {truth} (bound {bound})"
        );
    }

    // Cost and time must deter; the signs are recoverable even when the
    // magnitudes are noisy.
    assert!(result.value("beta_cost").unwrap() < 0.0);
    assert!(result.value("beta_time").unwrap() < 0.0);
}

#[test]
fn test_fit_statistics_are_consistent() {
    let data = mode_choice_data(100);
    let fitted = NewtonEstimator::builder()
        .build()
        .fit(&data, &mode_choice_spec(), &mode_choice_params())
        .unwrap();
    let result = fitted.result();

    assert_eq!(result.n_observations, 100);
    assert_eq!(result.n_free_parameters, 4);

    // rho^2 = 1 - LL/LL0, recomputed from the reported likelihoods.
    assert_relative_eq!(
        result.rho_squared,
        1.0 - result.log_likelihood / result.null_log_likelihood,
        epsilon = 1e-12
    );
    assert!(result.rho_squared > 0.0 && result.rho_squared < 1.0);
    assert!(result.adj_rho_squared < result.rho_squared);

    assert_relative_eq!(
        result.lr_statistic,
        2.0 * (result.log_likelihood - result.null_log_likelihood),
        epsilon = 1e-12
    );
    assert!(result.lr_pvalue >= 0.0 && result.lr_pvalue <= 1.0);
}

#[test]
fn test_inference_statistics_present_for_free_parameters() {
    let data = mode_choice_data(100);
    let fitted = NewtonEstimator::builder()
        .confidence_level(0.9)
        .build()
        .fit(&data, &mode_choice_spec(), &mode_choice_params())
        .unwrap();
    let result = fitted.result();

    for estimate in &result.estimates {
        if estimate.fixed {
            assert!(estimate.std_error.is_none());
            assert!(estimate.conf_interval.is_none());
        } else {
            let se = estimate.std_error.expect("free parameter has SE");
            let z = estimate.z_statistic.expect("free parameter has z");
            let p = estimate.p_value.expect("free parameter has p");
            assert_relative_eq!(z, estimate.estimate / se, epsilon = 1e-10);
            assert!((0.0..=1.0).contains(&p));

            let (lower, upper) = estimate.conf_interval.expect("free parameter has CI");
            assert!(lower < estimate.estimate && estimate.estimate < upper);
        }
    }
}

#[test]
fn test_estimates_preserve_parameter_order() {
    let data = mode_choice_data(50);
    let fitted = NewtonEstimator::builder()
        .build()
        .fit(&data, &mode_choice_spec(), &mode_choice_params())
        .unwrap();

    let names: Vec<&str> = fitted
        .result()
        .estimates
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["asc_car", "asc_transit", "asc_bike", "beta_cost", "beta_time"]
    );
}

#[test]
fn test_bounded_parameter_stays_in_bounds() {
    let data = mode_choice_data(100);
    let spec = mode_choice_spec();

    let mut params = ParameterSet::new();
    params.add(Parameter::fixed("asc_car", 0.0)).unwrap();
    params.add(Parameter::new("asc_transit", 0.0)).unwrap();
    params.add(Parameter::new("asc_bike", 0.0)).unwrap();
    // Artificially tight bound that the unconstrained optimum violates.
    params
        .add(Parameter::new("beta_cost", 0.0).with_bounds(Some(-0.1), Some(0.0)))
        .unwrap();
    params.add(Parameter::new("beta_time", 0.0)).unwrap();

    let fitted = NewtonEstimator::builder()
        .build()
        .fit(&data, &spec, &params)
        .unwrap();

    let beta_cost = fitted.result().value("beta_cost").unwrap();
    assert!((-0.1..=0.0).contains(&beta_cost));
}

#[test]
fn test_validation_failures_surface_as_errors() {
    let spec = mode_choice_spec();
    let params = mode_choice_params();

    // Chosen alternative unavailable in row 0.
    let mut data = mode_choice_data(10);
    let mut broken = ChoiceDataset::new("choice");
    let mut choice = data.column("choice").unwrap().to_vec();
    choice[0] = 1.0;
    broken.add_column("choice", choice).unwrap();
    for name in [
        "cost_car",
        "cost_transit",
        "cost_bike",
        "time_car",
        "time_transit",
        "time_bike",
    ] {
        broken
            .add_column(name, data.column(name).unwrap().to_vec())
            .unwrap();
    }
    let mut av_car = data.column("av_car").unwrap().to_vec();
    av_car[0] = 0.0;
    broken.add_column("av_car", av_car).unwrap();
    broken
        .add_column("av_transit", data.column("av_transit").unwrap().to_vec())
        .unwrap();
    broken
        .add_column("av_bike", data.column("av_bike").unwrap().to_vec())
        .unwrap();
    data = broken;

    let result = NewtonEstimator::builder().build().fit(&data, &spec, &params);
    assert!(matches!(
        result,
        Err(EstimationError::Data(DataError::ChosenUnavailable {
            row: 0,
            alternative: 1
        }))
    ));
}
