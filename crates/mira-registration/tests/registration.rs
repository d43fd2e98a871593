//! End-to-end registration runs on synthetic volumes.

use ndarray::Array3;

use mira_core::transform::Transform;
use mira_core::Image;
use mira_registration::metric::{MeanSquaresMetric, Metric};
use mira_registration::{
    HistoryCallback, Registration, RegistrationMode, RegistrationParameters,
};

/// Smooth Gaussian blob centered at `center` (index units).
fn blob_image(n: usize, center: [f64; 3]) -> Image {
    let data = Array3::from_shape_fn((n, n, n), |(x, y, z)| {
        let dx = x as f64 - center[0];
        let dy = y as f64 - center[1];
        let dz = z as f64 - center[2];
        (100.0 * (-(dx * dx + dy * dy + dz * dz) / 12.0).exp()) as f32
    });
    Image::from_data(data)
}

#[test]
fn registration_without_images_short_circuits() {
    let outcome = Registration::new().register();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Images not loaded");
    assert_eq!(outcome.iterations, 0);
}

#[test]
fn mono_modal_recovers_small_translation() {
    let fixed = blob_image(16, [8.0, 8.0, 8.0]);
    let moving = blob_image(16, [10.0, 8.5, 8.0]);

    let mut registration = Registration::new();
    registration.set_fixed_image(fixed.clone());
    registration.set_moving_image(moving.clone());
    registration.set_mode(RegistrationMode::MonoModal);
    registration.set_parameters(RegistrationParameters {
        max_iterations: 300,
        pyramid_levels: 2,
        learning_rate: 0.5,
        ..Default::default()
    });

    let outcome = registration.register();
    assert!(outcome.success, "message: {}", outcome.message);

    // The recovered transform must map the fixed blob center close to the
    // moving blob center.
    let mapped = outcome
        .transform
        .transform_point(&mira_core::spatial::Point3::new([8.0, 8.0, 8.0]));
    assert!((mapped[0] - 10.0).abs() < 0.5, "x: {}", mapped[0]);
    assert!((mapped[1] - 8.5).abs() < 0.5, "y: {}", mapped[1]);
    assert!((mapped[2] - 8.0).abs() < 0.5, "z: {}", mapped[2]);

    // And the metric must have improved over the centered initialization.
    let metric = MeanSquaresMetric::new();
    let initial = mira_registration::initializer::center_initializer(&fixed, &moving);
    let before = metric.evaluate(&fixed, &moving, &initial).unwrap();
    let after = metric.evaluate(&fixed, &moving, &outcome.transform).unwrap();
    assert!(after <= before);
}

#[test]
fn multi_modal_is_reproducible() {
    let fixed = blob_image(8, [4.0, 4.0, 4.0]);
    let moving = blob_image(8, [4.5, 4.0, 4.0]);

    let run = || {
        let mut registration = Registration::new();
        registration.set_fixed_image(fixed.clone());
        registration.set_moving_image(moving.clone());
        registration.set_mode(RegistrationMode::MultiModal);
        registration.set_parameters(RegistrationParameters {
            max_iterations: 40,
            pyramid_levels: 1,
            initial_radius: 0.05,
            ..Default::default()
        });
        registration.register()
    };

    let a = run();
    let b = run();
    assert!(a.success && b.success);
    assert_eq!(a.transform.parameters(), b.transform.parameters());
    assert_eq!(a.final_metric_value, b.final_metric_value);
}

#[test]
fn verbose_runs_report_progress() {
    let fixed = blob_image(8, [4.0, 4.0, 4.0]);
    let moving = blob_image(8, [4.5, 4.0, 4.0]);

    let history = HistoryCallback::new();
    let mut registration = Registration::new();
    registration.set_fixed_image(fixed);
    registration.set_moving_image(moving);
    registration.set_mode(RegistrationMode::MonoModal);
    registration.set_parameters(RegistrationParameters {
        max_iterations: 10,
        pyramid_levels: 1,
        learning_rate: 0.1,
        verbose: true,
        ..Default::default()
    });
    registration.set_progress_callback(Box::new(history.clone()));

    let outcome = registration.register();
    assert!(outcome.success);
    assert!(!history.history().is_empty());
}
