//! Shared fixtures: a synthetic stated-preference mode-choice dataset
//! (car / transit / bike) with known true parameters and deterministically
//! simulated choices.
#![allow(dead_code)]

use choice_rs::prelude::*;

pub const TRUE_ASC_TRANSIT: f64 = 0.4;
pub const TRUE_ASC_BIKE: f64 = -0.3;
pub const TRUE_BETA_COST: f64 = -0.25;
pub const TRUE_BETA_TIME: f64 = -0.06;

/// Fractional part of a low-discrepancy sequence; deterministic stand-in
/// for uniform draws so test results are reproducible.
pub fn uniform(i: usize, offset: f64) -> f64 {
    (0.6180339887498949 * i as f64 + offset).fract()
}

/// Build the synthetic dataset with `n` respondents.
///
/// Car and bike are occasionally unavailable; transit is always available,
/// so every row has a non-empty choice set. Choices are simulated from the
/// true logit probabilities over the available alternatives.
pub fn mode_choice_data(n: usize) -> ChoiceDataset {
    let mut cost_car = Vec::with_capacity(n);
    let mut cost_transit = Vec::with_capacity(n);
    let mut cost_bike = Vec::with_capacity(n);
    let mut time_car = Vec::with_capacity(n);
    let mut time_transit = Vec::with_capacity(n);
    let mut time_bike = Vec::with_capacity(n);
    let mut av_car = Vec::with_capacity(n);
    let mut av_transit = Vec::with_capacity(n);
    let mut av_bike = Vec::with_capacity(n);
    let mut choice = Vec::with_capacity(n);

    for i in 0..n {
        let c_car = 4.0 + 4.0 * uniform(i, 0.17);
        let c_transit = 1.5 + 2.0 * uniform(i, 0.53);
        let c_bike = 0.2 + 0.6 * uniform(i, 0.83);
        let t_car = 15.0 + 15.0 * uniform(i, 0.29);
        let t_transit = 25.0 + 20.0 * uniform(i, 0.71);
        let t_bike = 20.0 + 25.0 * uniform(i, 0.91);
        let a_car = if uniform(i, 0.37) > 0.1 { 1.0 } else { 0.0 };
        let a_transit = 1.0;
        let a_bike = if uniform(i, 0.61) > 0.15 { 1.0 } else { 0.0 };

        let v_car = TRUE_BETA_COST * c_car + TRUE_BETA_TIME * t_car;
        let v_transit =
            TRUE_ASC_TRANSIT + TRUE_BETA_COST * c_transit + TRUE_BETA_TIME * t_transit;
        let v_bike = TRUE_ASC_BIKE + TRUE_BETA_COST * c_bike + TRUE_BETA_TIME * t_bike;

        let alts = [(1.0, a_car, v_car), (2.0, a_transit, v_transit), (3.0, a_bike, v_bike)];
        let denom: f64 = alts
            .iter()
            .filter(|&&(_, av, _)| av > 0.5)
            .map(|&(_, _, v)| v.exp())
            .sum();

        let draw = (0.7548776662466927 * i as f64 + 0.123).fract();
        let mut cumulative = 0.0;
        let mut selected = 2.0; // transit fallback, always available
        for &(id, av, v) in &alts {
            if av <= 0.5 {
                continue;
            }
            cumulative += v.exp() / denom;
            if draw < cumulative {
                selected = id;
                break;
            }
        }

        cost_car.push(c_car);
        cost_transit.push(c_transit);
        cost_bike.push(c_bike);
        time_car.push(t_car);
        time_transit.push(t_transit);
        time_bike.push(t_bike);
        av_car.push(a_car);
        av_transit.push(a_transit);
        av_bike.push(a_bike);
        choice.push(selected);
    }

    let mut data = ChoiceDataset::new("choice");
    data.add_column("choice", choice).unwrap();
    data.add_column("cost_car", cost_car).unwrap();
    data.add_column("cost_transit", cost_transit).unwrap();
    data.add_column("cost_bike", cost_bike).unwrap();
    data.add_column("time_car", time_car).unwrap();
    data.add_column("time_transit", time_transit).unwrap();
    data.add_column("time_bike", time_bike).unwrap();
    data.add_column("av_car", av_car).unwrap();
    data.add_column("av_transit", av_transit).unwrap();
    data.add_column("av_bike", av_bike).unwrap();
    data
}

/// The three-alternative utility specification of the mode-choice model.
pub fn mode_choice_spec() -> UtilitySpec {
    let mut spec = UtilitySpec::new();
    spec.add_alternative(
        1,
        Expr::parameter("asc_car")
            + Expr::parameter("beta_cost") * Expr::variable("cost_car")
            + Expr::parameter("beta_time") * Expr::variable("time_car"),
        Expr::variable("av_car"),
    )
    .unwrap();
    spec.add_alternative(
        2,
        Expr::parameter("asc_transit")
            + Expr::parameter("beta_cost") * Expr::variable("cost_transit")
            + Expr::parameter("beta_time") * Expr::variable("time_transit"),
        Expr::variable("av_transit"),
    )
    .unwrap();
    spec.add_alternative(
        3,
        Expr::parameter("asc_bike")
            + Expr::parameter("beta_cost") * Expr::variable("cost_bike")
            + Expr::parameter("beta_time") * Expr::variable("time_bike"),
        Expr::variable("av_bike"),
    )
    .unwrap();
    spec
}

/// Parameters with zero starting values; car is the reference alternative.
pub fn mode_choice_params() -> ParameterSet {
    let mut params = ParameterSet::new();
    params.add(Parameter::fixed("asc_car", 0.0)).unwrap();
    params.add(Parameter::new("asc_transit", 0.0)).unwrap();
    params.add(Parameter::new("asc_bike", 0.0)).unwrap();
    params.add(Parameter::new("beta_cost", 0.0)).unwrap();
    params.add(Parameter::new("beta_time", 0.0)).unwrap();
    params
}
