use std::f64::consts::{FRAC_PI_2, PI};

use crate::{expand::emit::Emitter, path::polyline::PathVertex};

/// Half discs at both ends of an open path, facing away from the path.
pub(super) fn expand_cap(e: &mut Emitter<'_>, start: &PathVertex, end: &PathVertex) {
    e.emit_sector(start.position, start.direction + PI, FRAC_PI_2);
    e.emit_sector(end.position, end.direction, FRAC_PI_2);
}

/// Full disc for an isolated point.
pub(super) fn expand_point(e: &mut Emitter<'_>, v: &PathVertex) {
    e.emit_sector(v.position, v.direction, FRAC_PI_2);
    e.emit_sector(v.position, v.direction + PI, FRAC_PI_2);
}
