use std::f64::consts::{FRAC_PI_2, PI};

use super::*;
use crate::{
    expand::tests::{flat_camera, frame_xy, style},
    foundation::core::{Point, Vec2},
    scene::style::DrawUniforms,
};

#[test]
fn polar_vertex_scales_offset_by_width_only_in_position() {
    let camera = flat_camera();
    let style = style(-2.0);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let mut e = Emitter::new(&u);
    e.emit_polar_vertex(DVec3::new(1.0, 1.0, 0.0), 0.5, FRAC_PI_2);
    let prim = e.finish();
    let v = prim.vertices()[0];
    assert!((v.offset - Vec2::new(0.0, 0.5)).hypot() < 1e-12);
    let p = frame_xy(&camera, &v);
    assert!((p - Point::new(1.0, 2.0)).hypot() < 1e-9);
}

/// Sample the arc of a sector and check every sample lies inside one of the emitted
/// triangles (in offset space).
fn covers_arc(prim: &crate::expand::ExpandedPrimitive, middle: f64, delta: f64) -> bool {
    fn inside(p: Vec2, t: &[crate::expand::ExpandedVertex; 3]) -> bool {
        let (a, b, c) = (t[0].offset, t[1].offset, t[2].offset);
        let d0 = (b - a).cross(p - a);
        let d1 = (c - b).cross(p - b);
        let d2 = (a - c).cross(p - c);
        let eps = 1e-9;
        (d0 >= -eps && d1 >= -eps && d2 >= -eps) || (d0 <= eps && d1 <= eps && d2 <= eps)
    }
    (0..=64).all(|i| {
        let angle = middle - delta + 2.0 * delta * f64::from(i) / 64.0;
        let p = Vec2::new(angle.cos(), angle.sin()) * 0.999;
        prim.triangles().any(|t| inside(p, &t))
    })
}

#[test]
fn sector_covers_its_arc_up_to_a_half_disc() {
    let camera = flat_camera();
    let style = style(1.0);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    for delta in [0.05, 0.4, 1.0, 1.4, FRAC_PI_2] {
        let mut e = Emitter::new(&u);
        e.emit_sector(DVec3::ZERO, 0.7, delta);
        let prim = e.finish();
        assert_eq!(prim.vertices().len(), 8);
        assert!(covers_arc(&prim, 0.7, delta), "delta {delta}");
    }
}

#[test]
fn sector_extremes_and_tip_magnitude() {
    let camera = flat_camera();
    let style = style(1.0);
    let u = DrawUniforms::new(&style, &camera, 1.0).unwrap();
    let (middle, delta) = (PI / 3.0, 0.8);
    let mut e = Emitter::new(&u);
    e.emit_sector(DVec3::ZERO, middle, delta);
    let prim = e.finish();

    let angles: Vec<f64> = prim
        .vertices()
        .iter()
        .filter(|v| (v.offset.hypot() - 1.0).abs() < 1e-12)
        .map(|v| v.offset.y.atan2(v.offset.x))
        .collect();
    let min = angles.iter().copied().fold(f64::INFINITY, f64::min);
    let max = angles.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!((min - (middle - delta)).abs() < 1e-9);
    assert!((max - (middle + delta)).abs() < 1e-9);

    let tip = prim
        .vertices()
        .iter()
        .map(|v| v.offset.hypot())
        .fold(0.0, f64::max);
    assert!((tip - 1.0 / (delta / 2.0).cos()).abs() < 1e-9);
}
