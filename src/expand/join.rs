use std::f64::consts::FRAC_PI_2;

use crate::{
    expand::{SidedMode, emit::Emitter},
    foundation::math::sign,
    path::polyline::PathVertex,
};

/// Round join placed on the outside of a turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoinSector {
    pub middle_angle: f64,
    pub half_width: f64,
}

/// The sector a join emits at `v`, if any.
///
/// Straight vertices need no join. Single-sided strokes only fill turns that are convex
/// on the kept side; the recession of the neighbouring line bodies already closes the
/// concave ones.
pub fn join_sector(v: &PathVertex, sided: SidedMode, winding_sign: f64) -> Option<JoinSector> {
    if v.delta == 0.0 {
        return None;
    }
    if sided == SidedMode::Single && winding_sign * v.delta <= 0.0 {
        return None;
    }
    Some(JoinSector {
        middle_angle: v.direction - sign(v.delta) * FRAC_PI_2,
        half_width: v.delta.abs(),
    })
}

pub(super) fn expand_join(e: &mut Emitter<'_>, v: &PathVertex, sided: SidedMode) {
    if let Some(sector) = join_sector(v, sided, e.uniforms().winding_sign) {
        e.emit_sector(v.position, sector.middle_angle, sector.half_width);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expand/join.rs"]
mod tests;
