use std::f64::consts::FRAC_PI_4;

use super::*;
use crate::{
    expand::{
        ExpansionMode, expand_primitive,
        tests::{flat_camera, frame_xy, style, vertex},
    },
    foundation::{
        core::{DVec3, Vec2},
        error::WavyteError,
    },
    path::polyline::PathVertex,
    scene::{camera::Camera, style::DrawUniforms},
};

#[test]
fn straight_vertices_give_a_full_rectangle() {
    // width 2, delta 0 at both ends: a rectangle of half-width 2 along the tangent.
    let camera = flat_camera();
    let style = style(2.0);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let p0 = vertex(0.0, 0.0, 0.0, 0.0);
    let p1 = vertex(5.0, 0.0, 0.0, 0.0);
    let prim = expand_primitive(ExpansionMode::Line, SidedMode::Double, &u, &[p0, p1]).unwrap();

    assert_eq!(prim.strips().count(), 2);
    assert_eq!(prim.triangle_count(), 4);
    let ys: Vec<f64> = prim.vertices().iter().map(|v| frame_xy(&camera, v).y).collect();
    assert!(ys.iter().any(|&y| (y - 2.0).abs() < 1e-9));
    assert!(ys.iter().any(|&y| (y + 2.0).abs() < 1e-9));
    let xs: Vec<f64> = prim.vertices().iter().map(|v| frame_xy(&camera, v).x).collect();
    assert!(xs.iter().all(|&x| (-1e-9..=5.0 + 1e-9).contains(&x)));
    // Edge vertices sit on the unit circle of the offset parameterization.
    assert!(
        prim.vertices()
            .iter()
            .all(|v| v.offset.hypot() < 1e-12 || (v.offset.hypot() - 1.0).abs() < 1e-12)
    );
}

#[test]
fn quarter_turn_recession_trapezoid_or_collapse() {
    let w = 1.0;
    let delta = -FRAC_PI_4;

    // 2w/L <= 1: trapezoid with ratio w/L at both ends.
    let length = 4.0;
    match line_body_shape(delta, delta, w, length) {
        LineBodyShape::Trapezoid { ratio_0, ratio_1 } => {
            assert!((ratio_0 - w / length).abs() < 1e-12);
            assert!((ratio_1 - w / length).abs() < 1e-12);
        }
        other => panic!("expected trapezoid, got {other:?}"),
    }

    // 2w/L > 1: single collapsed triangle at the midpoint.
    let length = 1.5;
    match line_body_shape(delta, delta, w, length) {
        LineBodyShape::Collapsed {
            apex_t,
            apex_magnitude,
        } => {
            assert!((apex_t - 0.5).abs() < 1e-12);
            assert!((apex_magnitude - length / (2.0 * w)).abs() < 1e-12);
        }
        other => panic!("expected collapse, got {other:?}"),
    }
}

#[test]
fn positive_side_delta_never_recedes() {
    assert_eq!(
        line_body_shape(0.7, 0.3, 1.0, 0.01),
        LineBodyShape::Trapezoid {
            ratio_0: 0.0,
            ratio_1: 0.0
        }
    );
}

#[test]
fn collapse_is_continuous_with_trapezoid() {
    let (d0, d1, w) = (-0.6, -0.3, 0.8);
    let k = (0.6f64).tan() * w + (0.3f64).tan() * w;

    // At exactly ratio_0 + ratio_1 = 1 the trapezoid's two edge points coincide with the
    // collapsed apex at magnitude 1.
    let LineBodyShape::Trapezoid { ratio_0, ratio_1 } = line_body_shape(d0, d1, w, k) else {
        panic!("expected trapezoid at the boundary");
    };
    assert!((ratio_0 - (1.0 - ratio_1)).abs() < 1e-12);

    let LineBodyShape::Collapsed {
        apex_t,
        apex_magnitude,
    } = line_body_shape(d0, d1, w, k * (1.0 - 1e-9))
    else {
        panic!("expected collapse just below the boundary");
    };
    assert!((apex_t - ratio_0).abs() < 1e-9);
    assert!((apex_magnitude - 1.0).abs() < 1e-8);
}

#[test]
fn zero_length_segment_collapses_gracefully() {
    let LineBodyShape::Collapsed {
        apex_t,
        apex_magnitude,
    } = line_body_shape(-0.5, -0.5, 1.0, 0.0)
    else {
        panic!("expected collapse");
    };
    assert!(apex_t.is_finite());
    assert_eq!(apex_magnitude, 0.0);

    let camera = flat_camera();
    let style = style(1.0);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let p = vertex(1.0, 1.0, 0.0, -0.5);
    let prim = expand_primitive(ExpansionMode::Line, SidedMode::Double, &u, &[p, p]).unwrap();
    assert!(
        prim.vertices()
            .iter()
            .all(|v| v.clip.x.is_finite() && v.clip.y.is_finite())
    );
}

#[test]
fn single_sided_emits_one_side_chosen_by_winding() {
    let camera = flat_camera();
    let style = style(1.0);
    let p0 = vertex(0.0, 0.0, 0.0, 0.0);
    let p1 = vertex(5.0, 0.0, 0.0, 0.0);

    for (winding, expected_y) in [(1.0, -1.0), (-1.0, 1.0)] {
        let u = DrawUniforms::new(&style, &camera, winding).unwrap();
        let prim = expand_primitive(ExpansionMode::Line, SidedMode::Single, &u, &[p0, p1]).unwrap();
        assert_eq!(prim.strips().count(), 1);
        let ys: Vec<f64> = prim.vertices().iter().map(|v| frame_xy(&camera, v).y).collect();
        assert!(ys.iter().any(|&y| (y - expected_y).abs() < 1e-9));
        assert!(ys.iter().all(|&y| y * expected_y >= -1e-9));
    }
}

fn perspective_camera() -> Camera {
    Camera::perspective(Vec2::new(4.0, 4.0), 0.1, 100.0, 5.0).unwrap()
}

#[test]
fn recession_is_measured_in_frame_space_under_perspective() {
    // p0 is much deeper than p1, so a world-linear lerp would misplace the receded edge.
    let camera = perspective_camera();
    let style = style(0.3);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let (w0, w1) = (DVec3::new(1.0, 0.0, -4.0), DVec3::new(-2.0, 0.0, 0.0));
    let a = camera.frame_position(w0).unwrap();
    let b = camera.frame_position(w1).unwrap();
    let angle = (b - a).atan2();

    let p0 = PathVertex {
        position: w0,
        direction: angle,
        delta: 0.0,
    };
    let p1 = PathVertex {
        position: w1,
        direction: angle - 0.5,
        delta: -0.5,
    };
    let prim = expand_primitive(ExpansionMode::Line, SidedMode::Double, &u, &[p0, p1]).unwrap();
    let side: Vec<_> = prim.strips().next().unwrap().to_vec();
    assert_eq!(side.len(), 4);

    let dir = (b - a).normalize();
    let from_a = (frame_xy(&camera, &side[1]) - a).dot(dir);
    assert!(from_a.abs() < 1e-9, "unreceded edge drifted by {from_a}");
    let from_b = (b - frame_xy(&camera, &side[3])).dot(dir);
    let expected = 0.5f64.tan() * 0.3;
    assert!(
        (from_b - expected).abs() < 1e-9,
        "recession {from_b}, expected {expected}"
    );
}

#[test]
fn endpoint_behind_the_camera_is_an_evaluation_error() {
    let camera = perspective_camera();
    let style = style(0.3);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let p0 = vertex(0.0, 0.0, 0.0, 0.0);
    let p1 = PathVertex {
        position: DVec3::new(1.0, 0.0, 6.0),
        direction: 0.0,
        delta: 0.0,
    };
    for sided in [SidedMode::Double, SidedMode::Single] {
        let err = expand_primitive(ExpansionMode::Line, sided, &u, &[p0, p1]).unwrap_err();
        assert!(matches!(err, WavyteError::Evaluation(_)), "{err:?}");
    }
}
