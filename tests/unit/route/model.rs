use super::*;
use crate::foundation::core::Point;

fn straight_path() -> RoutePath {
    crate::route::pipeline::build_route_path(
        &[Waypoint::major(0.0, 0.0), Waypoint::major(20.0, 0.0)],
        &PathConfig {
            points_per_segment: 10,
            target_spacing: 2.0,
            ..PathConfig::default()
        },
    )
    .unwrap()
}

#[test]
fn parse_shape_accepts_known_tags() {
    assert_eq!(parse_shape("line").unwrap(), PathShape::Line);
    assert_eq!(parse_shape(" Squiggle ").unwrap(), PathShape::Squiggle);
    assert_eq!(parse_shape("randomised").unwrap(), PathShape::Randomised);
    assert_eq!(parse_shape("RANDOMIZED").unwrap(), PathShape::Randomised);
}

#[test]
fn parse_shape_rejects_unknown_tags() {
    let err = parse_shape("zigzag").unwrap_err();
    assert!(err.to_string().contains("unknown path shape 'zigzag'"));
}

#[test]
fn waypoint_list_validation_names_the_offender() {
    assert!(validate_waypoints(&[Waypoint::major(0.0, 0.0)]).is_err());

    let bad = [Waypoint::major(0.0, 0.0), Waypoint::major(f64::NAN, 1.0)];
    let err = validate_waypoints(&bad).unwrap_err();
    assert!(err.to_string().contains("waypoint 1"));

    let bad = [
        Waypoint::major(0.0, 0.0),
        Waypoint::major(1.0, 1.0).with_pause(-5.0),
    ];
    assert!(validate_waypoints(&bad).is_err());
}

#[test]
fn config_validation_bounds_every_field() {
    assert!(PathConfig::default().validate().is_ok());

    let mut c = PathConfig::default();
    c.points_per_segment = 1;
    assert!(c.validate().is_err());

    let mut c = PathConfig::default();
    c.target_spacing = 0.0;
    assert!(c.validate().is_err());

    let mut c = PathConfig::default();
    c.min_corner_speed = 0.0;
    assert!(c.validate().is_err());

    let mut c = PathConfig::default();
    c.max_curvature = 1.5;
    assert!(c.validate().is_err());
}

#[test]
fn waypoint_serde_round_trip() {
    let wp = Waypoint::major(0.25, 0.75)
        .with_pause(500.0)
        .with_tension(0.4)
        .with_shape(PathShape::Squiggle);
    let json = serde_json::to_string(&wp).unwrap();
    let back: Waypoint = serde_json::from_str(&json).unwrap();
    assert_eq!(back, wp);

    // Optional fields stay out of the compact form.
    let json = serde_json::to_string(&Waypoint::minor(0.0, 0.0)).unwrap();
    assert!(!json.contains("pause_ms"));
    assert!(!json.contains("shape"));
}

#[test]
fn arc_length_sampling_walks_the_metric() {
    let path = straight_path();
    let (p, tangent) = path.point_at_arc_length(5.0).unwrap();
    assert!((p.x - 5.0).abs() < 1e-9);
    assert!(p.y.abs() < 1e-9);
    assert!((tangent.x - 1.0).abs() < 1e-9);

    // Out-of-range lengths clamp to the endpoints.
    let (start, _) = path.point_at_arc_length(-10.0).unwrap();
    assert_eq!(start, Point::new(0.0, 0.0));
    let (end, _) = path.point_at_arc_length(1e6).unwrap();
    assert!((end.x - 20.0).abs() < 1e-9);
}

#[test]
fn progress_sampling_is_index_based() {
    let path = straight_path();
    let (start, _) = path.point_at_progress(0.0).unwrap();
    let (end, _) = path.point_at_progress(1.0).unwrap();
    assert_eq!(start, Point::new(0.0, 0.0));
    assert!((end.x - 20.0).abs() < 1e-9);

    // Uniform spacing makes index progress match the metric.
    let (mid, _) = path.point_at_progress(0.5).unwrap();
    assert!((mid.x - 10.0).abs() < 0.5);
}

#[test]
fn non_finite_sample_inputs_resolve_to_the_start() {
    let path = straight_path();
    let (p, _) = path.point_at_arc_length(f64::NAN).unwrap();
    assert_eq!(p, Point::new(0.0, 0.0));
    let (p, _) = path.point_at_progress(f64::NEG_INFINITY).unwrap();
    assert_eq!(p, Point::new(0.0, 0.0));
}

#[test]
fn degenerate_paths_sample_safely() {
    let empty = RoutePath::default();
    assert!(empty.point_at_progress(0.5).is_none());
    assert!(empty.point_at_arc_length(0.0).is_none());

    let single = RoutePath {
        points: vec![PathPoint {
            position: Point::new(3.0, 4.0),
            display_position: Point::new(3.0, 4.0),
            cumulative_distance: 0.0,
            normalized_distance: 0.0,
            curvature: 0.0,
            speed_multiplier: 1.0,
            segment_index: 0,
            shape: PathShape::Line,
        }],
        total_length: 0.0,
    };
    let (p, tangent) = single.point_at_progress(0.7).unwrap();
    assert_eq!(p, Point::new(3.0, 4.0));
    assert_eq!(tangent, Vec2::ZERO);
}
