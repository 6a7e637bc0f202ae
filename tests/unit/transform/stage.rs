use super::*;

#[test]
fn contain_fit_centers_the_letterboxed_content() {
    let surface = SurfaceSize::new(200, 100).unwrap();
    let stage = StageTransform::fit(surface, 100.0, 100.0).unwrap();

    assert_eq!(stage.scale(), 1.0);
    let origin = stage.to_display(Point::new(0.0, 0.0));
    assert!((origin.x - 50.0).abs() < 1e-9);
    assert!(origin.y.abs() < 1e-9);

    let corner = stage.to_display(Point::new(1.0, 1.0));
    assert!((corner.x - 150.0).abs() < 1e-9);
    assert!((corner.y - 100.0).abs() < 1e-9);
}

#[test]
fn display_and_authoring_round_trip() {
    let surface = SurfaceSize::new(1280, 720).unwrap();
    let stage = StageTransform::fit(surface, 1920.0, 1080.0).unwrap();

    for p in [
        Point::new(0.0, 0.0),
        Point::new(0.25, 0.75),
        Point::new(1.0, 1.0),
    ] {
        let back = stage.to_authoring(stage.to_display(p));
        assert!((back - p).hypot() < 1e-9);
    }
}

#[test]
fn scale_reports_pixels_per_content_pixel() {
    let surface = SurfaceSize::new(960, 540).unwrap();
    let stage = StageTransform::fit(surface, 1920.0, 1080.0).unwrap();
    assert!((stage.scale() - 0.5).abs() < 1e-12);
}

#[test]
fn degenerate_content_is_rejected() {
    let surface = SurfaceSize::new(100, 100).unwrap();
    assert!(StageTransform::fit(surface, 0.0, 100.0).is_err());
    assert!(StageTransform::fit(surface, 100.0, f64::NAN).is_err());
}
