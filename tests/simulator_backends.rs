//! The density-matrix backend must reproduce the closed-form protocol
//! statistics.

use qkd_bb84::{
    DensityMatrixSimulator, EvePolicy, InterceptStrategy, RunConfig, Sampler, execute_with,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn ideal_channel_has_no_errors() {
    init_tracing();
    let config = RunConfig::new(300, 0.0)
        .with_seed(12)
        .with_eve(EvePolicy::Never);
    let report = execute_with(&config, &DensityMatrixSimulator).unwrap();
    assert_eq!(report.analysis.errors, 0);
    assert_eq!(report.key.alice, report.key.bob);
}

#[test]
fn eavesdropping_statistics_match_closed_form() {
    init_tracing();
    let config = RunConfig::new(200, 0.0)
        .with_seed(77)
        .with_eve(EvePolicy::Always)
        .with_intercept(InterceptStrategy::MeasureResend);

    let dense = Sampler::new(config.clone())
        .with_simulator(DensityMatrixSimulator)
        .run(100)
        .unwrap()
        .mean_qber
        .unwrap();
    let closed = Sampler::new(config).run(100).unwrap().mean_qber.unwrap();

    assert!((dense - 0.25).abs() < 0.04, "density {dense}");
    assert!((dense - closed).abs() < 0.05, "density {dense} closed {closed}");
}
