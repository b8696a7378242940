//! Half-space triangle rasterizer.
//!
//! Pixel centers are sampled at `(x + 0.5, y + 0.5)` with y pointing down. Edges follow a
//! top-left fill rule so triangles sharing an edge never both cover a pixel on it. Both
//! the stroke `offset` and depth are screen-linear: expansion places edge vertices at
//! fixed frame-space distances, so the offset profile is affine on screen.

use crate::{
    expand::ExpandedVertex,
    foundation::core::{Canvas, Point, Vec2},
};

/// One covered pixel sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: u32,
    pub y: u32,
    /// Window depth in `[0, 1]`; smaller is nearer.
    pub depth: f64,
    pub offset: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct ScreenVertex {
    p: Point,
    depth: f64,
    offset: Vec2,
}

fn to_screen(v: &ExpandedVertex, canvas: Canvas) -> Option<ScreenVertex> {
    let w = v.clip.w;
    if !v.clip.is_finite() || w <= 0.0 {
        return None;
    }
    let inv_w = 1.0 / w;
    let ndc = v.clip.truncate() * inv_w;
    Some(ScreenVertex {
        p: Point::new(
            (ndc.x * 0.5 + 0.5) * f64::from(canvas.width),
            (0.5 - ndc.y * 0.5) * f64::from(canvas.height),
        ),
        depth: ndc.z * 0.5 + 0.5,
        offset: v.offset,
    })
}

/// Twice the signed area of `(a, b, p)`.
#[inline]
fn edge(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[inline]
fn is_top_left(a: Point, b: Point) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

/// Invoke `emit` for every pixel center covered by `tri`.
///
/// Triangles with a vertex at or behind the eye plane, degenerate triangles and
/// fragments outside the depth range produce nothing.
pub fn rasterize_triangle(tri: &[ExpandedVertex; 3], canvas: Canvas, mut emit: impl FnMut(Fragment)) {
    let (Some(v0), Some(mut v1), Some(mut v2)) = (
        to_screen(&tri[0], canvas),
        to_screen(&tri[1], canvas),
        to_screen(&tri[2], canvas),
    ) else {
        return;
    };

    let mut area = edge(v0.p, v1.p, v2.p);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    if area < 0.0 {
        std::mem::swap(&mut v1, &mut v2);
        area = -area;
    }

    let min_x = v0.p.x.min(v1.p.x).min(v2.p.x).floor().max(0.0);
    let min_y = v0.p.y.min(v1.p.y).min(v2.p.y).floor().max(0.0);
    let max_x = v0.p.x.max(v1.p.x).max(v2.p.x).ceil().min(f64::from(canvas.width));
    let max_y = v0.p.y.max(v1.p.y).max(v2.p.y).ceil().min(f64::from(canvas.height));
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    // Edge i is opposite vertex i.
    let edges = [(v1.p, v2.p), (v2.p, v0.p), (v0.p, v1.p)];
    let top_left = edges.map(|(a, b)| is_top_left(a, b));

    for y in (min_y as u32)..(max_y as u32) {
        for x in (min_x as u32)..(max_x as u32) {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let e = edges.map(|(a, b)| edge(a, b, p));
            let inside = e
                .iter()
                .zip(top_left)
                .all(|(&e, tl)| e > 0.0 || (e == 0.0 && tl));
            if !inside {
                continue;
            }

            let l = e.map(|e| e / area);
            let depth = l[0] * v0.depth + l[1] * v1.depth + l[2] * v2.depth;
            if !(0.0..=1.0).contains(&depth) {
                continue;
            }
            let offset = v0.offset * l[0] + v1.offset * l[1] + v2.offset * l[2];
            emit(Fragment {
                x,
                y,
                depth,
                offset,
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
