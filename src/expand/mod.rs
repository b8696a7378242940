//! Stroke expansion: one assembled primitive in, a bounded handful of triangles out.
//!
//! Every shape is composed from [`Emitter::emit_polar_vertex`], the only place where
//! stroke width and projection are applied. Output is a list of triangle strips whose
//! vertices carry the local `offset` used by the coverage stage.

mod cap;
mod emit;
mod join;
mod line;

use smallvec::SmallVec;

use crate::{
    foundation::{
        core::{DVec4, Vec2},
        error::{WavyteError, WavyteResult},
    },
    path::polyline::PathVertex,
    scene::style::DrawUniforms,
};

pub use emit::Emitter;
pub use join::{JoinSector, join_sector};
pub use line::{LineBodyShape, line_body_shape};

/// Which stroke part a draw pass expands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionMode {
    Line,
    Join,
    Cap,
    Point,
}

impl ExpansionMode {
    pub const ALL: [Self; 4] = [Self::Line, Self::Join, Self::Cap, Self::Point];

    pub fn vertices_per_primitive(self) -> usize {
        match self {
            Self::Line | Self::Cap => 2,
            Self::Join | Self::Point => 1,
        }
    }

    /// Upper bound on emitted vertices for one primitive.
    pub fn max_emitted_vertices(self) -> usize {
        match self {
            Self::Line | Self::Join => 8,
            Self::Cap | Self::Point => 16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidedMode {
    /// Fill both sides of the path.
    Double,
    /// Fill only the side picked by the winding sign.
    Single,
}

impl SidedMode {
    pub fn from_single_sided(single_sided: bool) -> Self {
        if single_sided {
            Self::Single
        } else {
            Self::Double
        }
    }
}

/// Output of expansion, consumed by rasterization.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ExpandedVertex {
    pub clip: DVec4,
    /// Position in the unit-disc parameterization of the stroke cross-section.
    pub offset: Vec2,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ExpandedPrimitive {
    vertices: SmallVec<[ExpandedVertex; 16]>,
    strip_ends: SmallVec<[usize; 4]>,
}

impl ExpandedPrimitive {
    pub fn vertices(&self) -> &[ExpandedVertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn strips(&self) -> impl Iterator<Item = &[ExpandedVertex]> + '_ {
        let mut start = 0;
        self.strip_ends.iter().map(move |&end| {
            let strip = &self.vertices[start..end];
            start = end;
            strip
        })
    }

    /// Triangles of all strips, in strip order.
    pub fn triangles(&self) -> impl Iterator<Item = [ExpandedVertex; 3]> + '_ {
        self.strips()
            .flat_map(|s| s.windows(3).map(|w| [w[0], w[1], w[2]]))
    }

    pub fn triangle_count(&self) -> usize {
        self.strips().map(|s| s.len().saturating_sub(2)).sum()
    }

    pub(crate) fn push_vertex(&mut self, v: ExpandedVertex) {
        self.vertices.push(v);
    }

    pub(crate) fn end_strip(&mut self) {
        let end = self.vertices.len();
        if self.strip_ends.last().copied().unwrap_or(0) != end {
            self.strip_ends.push(end);
        }
    }
}

/// Expand one primitive under `mode`.
pub fn expand_primitive(
    mode: ExpansionMode,
    sided: SidedMode,
    uniforms: &DrawUniforms<'_>,
    vertices: &[PathVertex],
) -> WavyteResult<ExpandedPrimitive> {
    if vertices.len() != mode.vertices_per_primitive() {
        return Err(WavyteError::evaluation(format!(
            "{mode:?} primitive expects {} vertices, got {}",
            mode.vertices_per_primitive(),
            vertices.len()
        )));
    }

    let mut emitter = Emitter::new(uniforms);
    match mode {
        ExpansionMode::Line => line::expand_line(&mut emitter, &vertices[0], &vertices[1], sided)?,
        ExpansionMode::Join => join::expand_join(&mut emitter, &vertices[0], sided),
        ExpansionMode::Cap => cap::expand_cap(&mut emitter, &vertices[0], &vertices[1]),
        ExpansionMode::Point => cap::expand_point(&mut emitter, &vertices[0]),
    }
    let out = emitter.finish();
    debug_assert!(out.vertices().len() <= mode.max_emitted_vertices());
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/expand/mod.rs"]
mod tests;
