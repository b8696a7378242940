use std::f64::consts::FRAC_PI_4;

use super::*;
use crate::{
    foundation::core::{DVec3, Point},
    scene::{camera::Camera, style::StrokeStyle},
};

/// Camera whose frame space equals world xy.
pub(crate) fn flat_camera() -> Camera {
    Camera::orthographic(Vec2::new(10.0, 10.0), 0.1, 100.0, 5.0).unwrap()
}

pub(crate) fn style(width: f64) -> StrokeStyle {
    StrokeStyle {
        width,
        ..StrokeStyle::default()
    }
}

pub(crate) fn vertex(x: f64, y: f64, direction: f64, delta: f64) -> PathVertex {
    PathVertex {
        position: DVec3::new(x, y, 0.0),
        direction,
        delta,
    }
}

/// Frame-space position of an emitted vertex.
pub(crate) fn frame_xy(camera: &Camera, v: &ExpandedVertex) -> Point {
    Point::new(
        v.clip.x / v.clip.w * camera.frame_radii.x,
        v.clip.y / v.clip.w * camera.frame_radii.y,
    )
}

#[test]
fn arity_mismatch_is_an_error() {
    let camera = flat_camera();
    let style = style(1.0);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let v = vertex(0.0, 0.0, 0.0, 0.0);
    assert!(expand_primitive(ExpansionMode::Line, SidedMode::Double, &u, &[v]).is_err());
    assert!(expand_primitive(ExpansionMode::Join, SidedMode::Double, &u, &[v, v]).is_err());
}

#[test]
fn vertex_budgets_hold_for_every_mode() {
    let camera = flat_camera();
    let style = style(0.5);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let a = vertex(0.0, 0.0, 0.3, -FRAC_PI_4);
    let b = vertex(0.2, 0.1, 0.3, -FRAC_PI_4);
    for mode in ExpansionMode::ALL {
        let verts = if mode.vertices_per_primitive() == 2 {
            vec![a, b]
        } else {
            vec![a]
        };
        for sided in [SidedMode::Double, SidedMode::Single] {
            let prim = expand_primitive(mode, sided, &u, &verts).unwrap();
            assert!(prim.vertices().len() <= mode.max_emitted_vertices());
        }
    }
}

#[test]
fn cap_emits_two_opposed_half_discs() {
    let camera = flat_camera();
    let style = style(1.0);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let start = vertex(0.0, 0.0, 0.0, 0.0);
    let end = vertex(4.0, 0.0, 0.0, 0.0);
    let prim = expand_primitive(ExpansionMode::Cap, SidedMode::Double, &u, &[start, end]).unwrap();

    // Two sectors of two diamonds each.
    let strips: Vec<_> = prim.strips().collect();
    assert_eq!(strips.len(), 4);
    assert_eq!(prim.vertices().len(), 16);
    assert_eq!(prim.triangle_count(), 8);

    // Start cap extends to x = -1, never past the start point; end cap mirrors it.
    let start_xs: Vec<f64> = strips[..2]
        .iter()
        .flat_map(|s| s.iter().map(|v| frame_xy(&camera, v).x))
        .collect();
    let end_xs: Vec<f64> = strips[2..]
        .iter()
        .flat_map(|s| s.iter().map(|v| frame_xy(&camera, v).x))
        .collect();
    assert!(start_xs.iter().all(|&x| x <= 1e-9));
    assert!(start_xs.iter().any(|&x| (x + 1.0).abs() < 1e-9));
    assert!(end_xs.iter().all(|&x| x >= 4.0 - 1e-9));
    assert!(end_xs.iter().any(|&x| (x - 5.0).abs() < 1e-9));
}

#[test]
fn point_emits_full_disc() {
    let camera = flat_camera();
    let style = style(1.0);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let prim = expand_primitive(
        ExpansionMode::Point,
        SidedMode::Double,
        &u,
        &[vertex(1.0, 1.0, 0.0, 0.0)],
    )
    .unwrap();
    let xs: Vec<f64> = prim.vertices().iter().map(|v| frame_xy(&camera, v).x).collect();
    assert!(xs.iter().any(|&x| (x - 2.0).abs() < 1e-9));
    assert!(xs.iter().any(|&x| x.abs() < 1e-9));
}

#[test]
fn strips_decompose_into_triangles() {
    let mut prim = ExpandedPrimitive::default();
    let v = ExpandedVertex {
        clip: DVec4::new(0.0, 0.0, 0.0, 1.0),
        offset: Vec2::ZERO,
    };
    for _ in 0..4 {
        prim.push_vertex(v);
    }
    prim.end_strip();
    prim.end_strip();
    for _ in 0..3 {
        prim.push_vertex(v);
    }
    prim.end_strip();
    assert_eq!(prim.strips().count(), 2);
    assert_eq!(prim.triangle_count(), 3);
    assert_eq!(prim.triangles().count(), 3);
}
