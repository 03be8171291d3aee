//! End-to-end tests of the filtering pipeline over synthesized grids.

use std::path::PathBuf;

use grid_fourier::grid::io;
use grid_fourier::spectral::wavenumber;
use grid_fourier::{
    pipeline, Direction, FilterConfig, GridFourierError, GridGeometry, PipelineConfig, Region,
    Registration, SpikeLocation, TransformPlan,
};

/// A 64 x 64 unit-increment grid synthesized from scratch.
fn synthesized_config(output: PathBuf) -> PipelineConfig {
    let mut config = PipelineConfig::new(output);
    config.region = Some(Region::new(0.0, 63.0, 0.0, 63.0));
    config.increment = Some((1.0, 1.0));
    config.filter_width = 2.0;
    config
}

#[test]
fn test_impulse_is_spread_and_attenuated() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("filtered.grd");

    pipeline::run(&synthesized_config(output.clone())).unwrap();

    let result = io::load(&output).unwrap();
    let real = result.real_channel();
    assert_eq!(real.dim(), (64, 64));

    // The unit impulse at the default center cell has been blurred: its
    // peak is attenuated but remains the largest value on the grid.
    let peak = real[[32, 32]];
    assert!(peak < 1.0, "peak {peak} was not attenuated");
    assert!(peak > 0.0);
    let max = real.iter().fold(f64::MIN, |acc, &v| acc.max(v));
    assert!((max - peak).abs() < 1e-12, "peak moved away from the spike");
}

#[test]
fn test_output_energy_matches_filter_response() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("filtered.grd");

    pipeline::run(&synthesized_config(output.clone())).unwrap();

    let result = io::load(&output).unwrap();
    let energy: f64 = result.real_channel().iter().map(|&v| v * v).sum();

    // The impulse spectrum has unit magnitude in every bin, so by
    // Parseval the filtered energy is (1/N) * sum of squared gains.
    let geometry = GridGeometry::new(
        Region::new(0.0, 63.0, 0.0, 63.0),
        1.0,
        1.0,
        Registration::Gridline,
    )
    .unwrap();
    let plan = TransformPlan::new(&geometry, Direction::Radial, None).unwrap();
    let filter = FilterConfig::new(2.0).unwrap();
    let reference: f64 = (0..plan.nx * plan.ny)
        .map(|bin| filter.response(wavenumber(2 * bin, &plan)).powi(2))
        .sum::<f64>()
        / (plan.nx * plan.ny) as f64;

    assert!(
        (energy - reference).abs() < 0.01 * reference,
        "energy {energy} deviates from reference {reference}"
    );
}

#[test]
fn test_explicit_spike_and_x_direction() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("filtered.grd");

    let mut config = synthesized_config(output.clone());
    config.spike = Some(SpikeLocation { row: 10, col: 20 });
    config.direction = Direction::X;
    pipeline::run(&config).unwrap();

    let real = io::load(&output).unwrap().real_channel();
    // An x-direction filter leaves the impulse's row structure alone and
    // smears it along x, so the peak stays on row 10.
    let peak = real[[10, 20]];
    assert!(peak < 1.0 && peak > 0.0);
    assert!(real[[10, 21]] > real[[11, 21]]);
}

#[test]
fn test_out_of_bounds_spike_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("filtered.grd");

    let mut config = synthesized_config(output.clone());
    // row == ny is one past the last valid row.
    config.spike = Some(SpikeLocation { row: 64, col: 0 });
    let result = pipeline::run(&config);

    assert!(matches!(
        result,
        Err(GridFourierError::SpikeOutOfBounds { row: 64, .. })
    ));
    assert!(!output.exists(), "failed run left output behind");
}

#[test]
fn test_bad_filter_width_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("filtered.grd");

    let mut config = synthesized_config(output.clone());
    config.filter_width = -2.0;
    let result = pipeline::run(&config);

    assert!(matches!(result, Err(GridFourierError::Config(_))));
    assert!(!output.exists(), "failed run left output behind");
}

#[test]
fn test_missing_input_and_geometry_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::new(dir.path().join("out.grd"));

    let result = pipeline::run(&config);
    assert!(matches!(result, Err(GridFourierError::Input(_))));
}

#[test]
fn test_file_round_trip_through_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.grd");
    let second = dir.path().join("second.grd");

    pipeline::run(&synthesized_config(first.clone())).unwrap();

    // Feed the filtered grid back through with a wide (nearly transparent)
    // filter; geometry must survive both trips.
    let mut config = PipelineConfig::new(second.clone());
    config.input = Some(first);
    config.filter_width = 1.0e9;
    pipeline::run(&config).unwrap();

    let result = io::load(&second).unwrap();
    assert_eq!(result.geometry().nx, 64);
    assert_eq!(result.geometry().ny, 64);
    assert_eq!(result.geometry().registration, Registration::Gridline);
}

#[test]
fn test_spectrum_diagnostic_written_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("filtered.grd");

    let mut config = synthesized_config(output.clone());
    config.plan_spec = Some("+w".to_string());
    pipeline::run(&config).unwrap();

    let spectrum = io::load(&dir.path().join("filtered_spectrum.grd")).unwrap();
    // The impulse transforms to unit magnitude in every bin.
    let amplitude = spectrum.real_channel();
    for &v in amplitude.iter() {
        assert!((v - 1.0).abs() < 1e-9, "amplitude {v} is not flat");
    }
}
