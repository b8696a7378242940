use std::f64::consts::FRAC_PI_2;

use crate::{
    expand::{SidedMode, emit::Emitter},
    foundation::{
        core::DVec3,
        error::{WavyteError, WavyteResult},
    },
    path::polyline::PathVertex,
};

/// Shape of one side of a line body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineBodyShape {
    /// Full-width quad whose edge endpoints are pulled in from `p0`/`p1` by the given
    /// fractions of the segment length.
    Trapezoid { ratio_0: f64, ratio_1: f64 },
    /// The recessions overlap: one triangle on the base `p0 p1` with its apex at
    /// `mix(p0, p1, apex_t)` and offset magnitude `apex_magnitude`.
    Collapsed { apex_t: f64, apex_magnitude: f64 },
}

/// Classify one side of a segment.
///
/// `side_delta_i` is the vertex delta angle seen from this side (`sigma * delta`); a
/// negative value means the path turns away from the side, so the adjoining segment's
/// edge overlaps this one and the edge must recede by `tan(-side_delta) * width`.
pub fn line_body_shape(side_delta_0: f64, side_delta_1: f64, width: f64, length: f64) -> LineBodyShape {
    let recession = |side_delta: f64| {
        if side_delta < 0.0 {
            (-side_delta).tan() * width
        } else {
            0.0
        }
    };
    let (k0, k1) = (recession(side_delta_0), recession(side_delta_1));

    if k0 + k1 <= length {
        if length > 0.0 {
            LineBodyShape::Trapezoid {
                ratio_0: k0 / length,
                ratio_1: k1 / length,
            }
        } else {
            LineBodyShape::Trapezoid {
                ratio_0: 0.0,
                ratio_1: 0.0,
            }
        }
    } else {
        // ratio_0 / (ratio_0 + ratio_1) and 1 / (ratio_0 + ratio_1) with the length
        // cancelled, so a zero-length segment collapses to a zero-area triangle.
        let k = k0 + k1;
        LineBodyShape::Collapsed {
            apex_t: k0 / k,
            apex_magnitude: length / k,
        }
    }
}

pub(super) fn expand_line(
    e: &mut Emitter<'_>,
    p0: &PathVertex,
    p1: &PathVertex,
    sided: SidedMode,
) -> WavyteResult<()> {
    // p0's outgoing tangent is p1's incoming tangent.
    let line_angle = p0.direction + p0.delta;
    match sided {
        SidedMode::Double => {
            expand_side(e, p0, p1, line_angle, 1.0)?;
            expand_side(e, p0, p1, line_angle, -1.0)
        }
        SidedMode::Single => {
            let sigma = e.uniforms().winding_sign;
            expand_side(e, p0, p1, line_angle, sigma)
        }
    }
}

/// World-space parameter of the point a fraction `r` along the projected segment.
///
/// Screen position is linear in `t / w`, so a frame-space fraction maps back through
/// the endpoints' clip `w`.
fn world_param(r: f64, w0: f64, w1: f64) -> f64 {
    let den = (1.0 - r) * w1 + r * w0;
    if den == 0.0 { r } else { r * w0 / den }
}

/// Side `sigma` has normal angle `line_angle - sigma * PI/2`; joins on that side are
/// emitted for vertices with `sigma * delta > 0`.
fn expand_side(
    e: &mut Emitter<'_>,
    p0: &PathVertex,
    p1: &PathVertex,
    line_angle: f64,
    sigma: f64,
) -> WavyteResult<()> {
    let normal = line_angle - sigma * FRAC_PI_2;
    let camera = e.uniforms().camera;
    let (w0, w1) = (
        camera.clip_position(p0.position).w,
        camera.clip_position(p1.position).w,
    );
    let length = match (
        camera.frame_position(p0.position),
        camera.frame_position(p1.position),
    ) {
        (Some(a), Some(b)) => a.distance(b),
        _ => {
            return Err(WavyteError::evaluation(format!(
                "line segment {} -> {} projects behind the camera",
                p0.position, p1.position
            )));
        }
    };
    let width = e.uniforms().half_width();
    let along = |r: f64| -> DVec3 { p0.position.lerp(p1.position, world_param(r, w0, w1)) };

    match line_body_shape(sigma * p0.delta, sigma * p1.delta, width, length) {
        LineBodyShape::Trapezoid { ratio_0, ratio_1 } => {
            e.emit_polar_vertex(p0.position, 0.0, normal);
            e.emit_polar_vertex(along(ratio_0), 1.0, normal);
            e.emit_polar_vertex(p1.position, 0.0, normal);
            e.emit_polar_vertex(along(1.0 - ratio_1), 1.0, normal);
        }
        LineBodyShape::Collapsed {
            apex_t,
            apex_magnitude,
        } => {
            e.emit_polar_vertex(p0.position, 0.0, normal);
            e.emit_polar_vertex(along(apex_t), apex_magnitude, normal);
            e.emit_polar_vertex(p1.position, 0.0, normal);
        }
    }
    e.end_strip();
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/expand/line.rs"]
mod tests;
