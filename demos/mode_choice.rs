//! # Mode Choice Estimation
//!
//! A three-alternative mode-choice model (car / transit / bike) estimated
//! from a simulated stated-preference survey.
//!
//! ## What it shows
//! - Assembling a `ChoiceDataset` column by column
//! - Declaring utilities and availability conditions with `Expr`
//! - Fixing the reference alternative's constant for identification
//! - Reading estimates, fit statistics, and the value of time
//!
//! Run with: `cargo run --example mode_choice`

use choice_rs::prelude::*;
use faer::Col;

const TRUE_ASC_TRANSIT: f64 = 0.5;
const TRUE_ASC_BIKE: f64 = -0.2;
const TRUE_BETA_COST: f64 = -0.3;
const TRUE_BETA_TIME: f64 = -0.05;

fn main() {
    println!("=== Multinomial Logit Mode Choice ===\n");

    let data = simulate_survey(400);
    let spec = build_spec();
    let params = build_params();

    let fitted = NewtonEstimator::builder()
        .build()
        .fit(&data, &spec, &params)
        .expect("fit should succeed");
    let result = fitted.result();

    println!("{result}");

    println!("True parameters:");
    println!("  asc_transit: {TRUE_ASC_TRANSIT:>8.4}");
    println!("  asc_bike:    {TRUE_ASC_BIKE:>8.4}");
    println!("  beta_cost:   {TRUE_BETA_COST:>8.4}");
    println!("  beta_time:   {TRUE_BETA_TIME:>8.4}");

    let vot = value_of_time(result, "beta_time", "beta_cost").expect("both coefficients estimated");
    println!(
        "\nValue of time: {:.4} cost units per minute ({:.2} per hour)",
        vot,
        vot * 60.0
    );

    predicted_shares(&data, &spec, &params, fitted.values());
}

/// Simulate `n` respondents facing car, transit, and bike with varying
/// costs, travel times, and availability. Choices are drawn from the true
/// logit probabilities using a deterministic low-discrepancy sequence.
fn simulate_survey(n: usize) -> ChoiceDataset {
    let uniform = |i: usize, offset: f64| (0.6180339887498949 * i as f64 + offset).fract();

    let mut columns: Vec<(&str, Vec<f64>)> = vec![
        ("choice", Vec::new()),
        ("cost_car", Vec::new()),
        ("cost_transit", Vec::new()),
        ("cost_bike", Vec::new()),
        ("time_car", Vec::new()),
        ("time_transit", Vec::new()),
        ("time_bike", Vec::new()),
        ("av_car", Vec::new()),
        ("av_transit", Vec::new()),
        ("av_bike", Vec::new()),
    ];

    for i in 0..n {
        let c_car = 3.0 + 5.0 * uniform(i, 0.11);
        let c_transit = 1.0 + 2.5 * uniform(i, 0.43);
        let c_bike = 0.1 + 0.5 * uniform(i, 0.77);
        let t_car = 12.0 + 18.0 * uniform(i, 0.23);
        let t_transit = 20.0 + 25.0 * uniform(i, 0.59);
        let t_bike = 18.0 + 30.0 * uniform(i, 0.89);
        // Transit is always available so no row has an empty choice set.
        let a_car = if uniform(i, 0.31) > 0.12 { 1.0 } else { 0.0 };
        let a_bike = if uniform(i, 0.67) > 0.2 { 1.0 } else { 0.0 };

        let v_car = TRUE_BETA_COST * c_car + TRUE_BETA_TIME * t_car;
        let v_transit = TRUE_ASC_TRANSIT + TRUE_BETA_COST * c_transit + TRUE_BETA_TIME * t_transit;
        let v_bike = TRUE_ASC_BIKE + TRUE_BETA_COST * c_bike + TRUE_BETA_TIME * t_bike;

        let alts = [
            (1.0, a_car, v_car),
            (2.0, 1.0, v_transit),
            (3.0, a_bike, v_bike),
        ];
        let denom: f64 = alts
            .iter()
            .filter(|&&(_, av, _)| av > 0.5)
            .map(|&(_, _, v)| v.exp())
            .sum();

        let draw = (0.7548776662466927 * i as f64 + 0.345).fract();
        let mut cumulative = 0.0;
        let mut chosen = 2.0;
        for &(id, av, v) in &alts {
            if av <= 0.5 {
                continue;
            }
            cumulative += v.exp() / denom;
            if draw < cumulative {
                chosen = id;
                break;
            }
        }

        let values = [
            chosen, c_car, c_transit, c_bike, t_car, t_transit, t_bike, a_car, 1.0, a_bike,
        ];
        for (column, value) in columns.iter_mut().zip(values) {
            column.1.push(value);
        }
    }

    let mut data = ChoiceDataset::new("choice");
    for (name, values) in columns {
        data.add_column(name, values).expect("consistent columns");
    }
    data
}

fn build_spec() -> UtilitySpec {
    let mut spec = UtilitySpec::new();
    spec.add_alternative(
        1,
        Expr::parameter("asc_car")
            + Expr::parameter("beta_cost") * Expr::variable("cost_car")
            + Expr::parameter("beta_time") * Expr::variable("time_car"),
        Expr::variable("av_car"),
    )
    .expect("valid alternative");
    spec.add_alternative(
        2,
        Expr::parameter("asc_transit")
            + Expr::parameter("beta_cost") * Expr::variable("cost_transit")
            + Expr::parameter("beta_time") * Expr::variable("time_transit"),
        Expr::variable("av_transit"),
    )
    .expect("valid alternative");
    spec.add_alternative(
        3,
        Expr::parameter("asc_bike")
            + Expr::parameter("beta_cost") * Expr::variable("cost_bike")
            + Expr::parameter("beta_time") * Expr::variable("time_bike"),
        Expr::variable("av_bike"),
    )
    .expect("valid alternative");
    spec
}

fn build_params() -> ParameterSet {
    let mut params = ParameterSet::new();
    // Car is the reference alternative: its constant is fixed at zero.
    params.add(Parameter::fixed("asc_car", 0.0)).expect("unique name");
    params.add(Parameter::new("asc_transit", 0.0)).expect("unique name");
    params.add(Parameter::new("asc_bike", 0.0)).expect("unique name");
    params.add(Parameter::new("beta_cost", 0.0)).expect("unique name");
    params.add(Parameter::new("beta_time", 0.0)).expect("unique name");
    params
}

/// Compare observed choice shares with the shares predicted at the
/// estimated parameters.
fn predicted_shares(
    data: &ChoiceDataset,
    spec: &UtilitySpec,
    params: &ParameterSet,
    estimates: &Col<f64>,
) {
    let model = LogitModel::new(data, spec, params).expect("validated during fit");

    let mut observed = [0.0f64; 3];
    let mut predicted = [0.0f64; 3];
    let choice = data.column("choice").expect("choice column");

    for row in 0..data.n_rows() {
        observed[choice[row] as usize - 1] += 1.0;
        for (id, p) in model.probabilities(estimates, row) {
            predicted[id as usize - 1] += p;
        }
    }

    let n = data.n_rows() as f64;
    println!("\nChoice shares (observed vs predicted):");
    println!("{:<10} {:>10} {:>10}", "Mode", "Observed", "Predicted");
    println!("{}", "-".repeat(32));
    for (label, i) in [("Car", 0), ("Transit", 1), ("Bike", 2)] {
        println!(
            "{:<10} {:>9.1}% {:>9.1}%",
            label,
            100.0 * observed[i] / n,
            100.0 * predicted[i] / n
        );
    }
    println!("\nNote: With alternative-specific constants the predicted shares");
    println!("      reproduce the observed shares at the maximum likelihood.");
}
