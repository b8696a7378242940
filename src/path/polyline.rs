use std::f64::consts::FRAC_PI_2;

use crate::{
    foundation::{
        core::{DVec3, Point},
        error::{WavyteError, WavyteResult},
        math::wrap_angle,
    },
    scene::camera::Camera,
};

/// Largest delta angle handed to expansion. Exact reversals are clamped here so the
/// open interval `(-PI/2, PI/2)` holds for every emitted vertex.
pub const MAX_DELTA_ANGLE: f64 = FRAC_PI_2 - 1e-6;

/// Frame-space distance under which consecutive points are merged.
const DUPLICATE_EPS: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// A single isolated point, drawn as a disc.
    Point,
    /// An open polyline with caps at both ends.
    LineString,
    /// A closed polyline. The closing point is implicit, not repeated.
    LinearRing,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Polyline {
    pub kind: PathKind,
    pub points: Vec<DVec3>,
}

impl Polyline {
    pub fn new(kind: PathKind, points: Vec<DVec3>) -> WavyteResult<Self> {
        let line = Self { kind, points };
        line.validate()?;
        Ok(line)
    }

    pub fn line_string(points: impl IntoIterator<Item = DVec3>) -> WavyteResult<Self> {
        Self::new(PathKind::LineString, points.into_iter().collect())
    }

    pub fn linear_ring(points: impl IntoIterator<Item = DVec3>) -> WavyteResult<Self> {
        Self::new(PathKind::LinearRing, points.into_iter().collect())
    }

    pub fn point(p: DVec3) -> Self {
        Self {
            kind: PathKind::Point,
            points: vec![p],
        }
    }

    pub fn validate(&self) -> WavyteResult<()> {
        let min = match self.kind {
            PathKind::Point => 1,
            PathKind::LineString | PathKind::LinearRing => 2,
        };
        if self.points.len() < min {
            return Err(WavyteError::validation(format!(
                "{:?} needs at least {min} point(s), got {}",
                self.kind,
                self.points.len()
            )));
        }
        if self.kind == PathKind::Point && self.points.len() != 1 {
            return Err(WavyteError::validation("Point path must have exactly 1 point"));
        }
        if !self.points.iter().all(|p| p.is_finite()) {
            return Err(WavyteError::validation("path points must be finite"));
        }
        Ok(())
    }
}

/// Per-vertex stroke descriptor consumed by expansion.
///
/// `direction - delta` is the incoming tangent angle and `direction + delta` the
/// outgoing one, both measured in frame space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PathVertex {
    pub position: DVec3,
    pub direction: f64,
    pub delta: f64,
}

impl PathVertex {
    pub fn new(position: DVec3, direction: f64, delta: f64) -> WavyteResult<Self> {
        let v = Self {
            position,
            direction,
            delta,
        };
        v.validate()?;
        Ok(v)
    }

    pub fn validate(&self) -> WavyteResult<()> {
        if !self.position.is_finite() || !self.direction.is_finite() || !self.delta.is_finite() {
            return Err(WavyteError::validation("path vertex must be finite"));
        }
        if self.delta.abs() >= FRAC_PI_2 {
            return Err(WavyteError::validation(format!(
                "path vertex delta angle {} outside (-PI/2, PI/2)",
                self.delta
            )));
        }
        Ok(())
    }

    pub fn incoming_angle(&self) -> f64 {
        self.direction - self.delta
    }

    pub fn outgoing_angle(&self) -> f64 {
        self.direction + self.delta
    }
}

/// Stroke vertices for one polyline plus the kind it effectively draws as.
///
/// Merging duplicate points can demote a line string or ring to a single point.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedPath {
    pub kind: PathKind,
    pub vertices: Vec<PathVertex>,
}

/// Derive direction/delta angles for every vertex of `line` in frame space.
pub fn compute_path_vertices(line: &Polyline, camera: &Camera) -> WavyteResult<PreparedPath> {
    line.validate()?;

    let mut points = Vec::<(DVec3, Point)>::with_capacity(line.points.len());
    for &p in &line.points {
        let frame = camera.frame_position(p).ok_or_else(|| {
            WavyteError::validation(format!("path point {p} projects behind the camera"))
        })?;
        if let Some((_, last)) = points.last()
            && last.distance(frame) <= DUPLICATE_EPS
        {
            continue;
        }
        points.push((p, frame));
    }
    if line.kind == PathKind::LinearRing
        && points.len() > 1
        && points[0].1.distance(points[points.len() - 1].1) <= DUPLICATE_EPS
    {
        points.pop();
    }

    let kind = if points.len() == 1 {
        PathKind::Point
    } else {
        line.kind
    };
    let closed = kind == PathKind::LinearRing;
    let n = points.len();

    if kind == PathKind::Point {
        return Ok(PreparedPath {
            kind,
            vertices: vec![PathVertex {
                position: points[0].0,
                direction: 0.0,
                delta: 0.0,
            }],
        });
    }

    let segment_count = if closed { n } else { n - 1 };
    let segment_angles: Vec<f64> = (0..segment_count)
        .map(|i| {
            let d = points[(i + 1) % n].1 - points[i].1;
            d.y.atan2(d.x)
        })
        .collect();

    let vertices = (0..n)
        .map(|i| {
            let (incoming, outgoing) = if closed {
                (segment_angles[(i + n - 1) % n], segment_angles[i])
            } else {
                let out_idx = i.min(segment_count - 1);
                let in_idx = i.saturating_sub(1);
                (segment_angles[in_idx], segment_angles[out_idx])
            };
            let delta = (wrap_angle(outgoing - incoming) / 2.0)
                .clamp(-MAX_DELTA_ANGLE, MAX_DELTA_ANGLE);
            PathVertex {
                position: points[i].0,
                direction: wrap_angle(incoming + delta),
                delta,
            }
        })
        .collect();

    Ok(PreparedPath { kind, vertices })
}

#[cfg(test)]
#[path = "../../tests/unit/path/polyline.rs"]
mod tests;
