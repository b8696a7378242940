use smallvec::SmallVec;

use crate::{
    expand::ExpansionMode,
    foundation::error::{WavyteError, WavyteResult},
    path::polyline::{PathKind, PathVertex},
};

/// Index buffers for the draw passes of one stroke, addressing a shared vertex buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrokeIndices {
    pub lines: Vec<u32>,
    pub joins: Vec<u32>,
    pub caps: Vec<u32>,
    pub points: Vec<u32>,
    vertex_count: u32,
}

impl StrokeIndices {
    /// Append the primitives of a path whose `count` vertices follow the ones already pushed.
    pub fn push_path(&mut self, kind: PathKind, count: usize) -> WavyteResult<()> {
        let n: u32 = count
            .try_into()
            .map_err(|_| WavyteError::validation("path vertex count exceeds u32"))?;
        let base = self.vertex_count;
        let end = base
            .checked_add(n)
            .ok_or_else(|| WavyteError::validation("stroke vertex count exceeds u32"))?;

        match kind {
            PathKind::Point => {
                if n != 1 {
                    return Err(WavyteError::validation("Point path must have exactly 1 vertex"));
                }
                self.points.push(base);
            }
            PathKind::LineString => {
                if n < 2 {
                    return Err(WavyteError::validation("LineString needs at least 2 vertices"));
                }
                for i in 0..n - 1 {
                    self.lines.extend([base + i, base + i + 1]);
                }
                self.joins.extend((1..n - 1).map(|i| base + i));
                self.caps.extend([base, base + n - 1]);
            }
            PathKind::LinearRing => {
                if n < 2 {
                    return Err(WavyteError::validation("LinearRing needs at least 2 vertices"));
                }
                for i in 0..n {
                    self.lines.extend([base + i, base + (i + 1) % n]);
                }
                self.joins.extend((0..n).map(|i| base + i));
            }
        }

        self.vertex_count = end;
        Ok(())
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn for_mode(&self, mode: ExpansionMode) -> &[u32] {
        match mode {
            ExpansionMode::Line => &self.lines,
            ExpansionMode::Join => &self.joins,
            ExpansionMode::Cap => &self.caps,
            ExpansionMode::Point => &self.points,
        }
    }
}

/// Vertices of one assembled primitive (1 or 2 depending on the mode).
pub type PrimitiveVertices = SmallVec<[PathVertex; 2]>;

/// Vertex stage plus primitive assembly: vertices pass through unchanged and are grouped
/// per the mode's arity.
pub fn assemble_primitives(
    vertices: &[PathVertex],
    indices: &[u32],
    mode: ExpansionMode,
) -> WavyteResult<Vec<PrimitiveVertices>> {
    let arity = mode.vertices_per_primitive();
    if !indices.len().is_multiple_of(arity) {
        return Err(WavyteError::evaluation(format!(
            "{mode:?} index buffer length {} is not a multiple of {arity}",
            indices.len()
        )));
    }
    indices
        .chunks_exact(arity)
        .map(|chunk| {
            chunk
                .iter()
                .map(|&i| {
                    vertices.get(i as usize).copied().ok_or_else(|| {
                        WavyteError::evaluation(format!(
                            "index {i} out of range for {} vertices",
                            vertices.len()
                        ))
                    })
                })
                .collect::<WavyteResult<PrimitiveVertices>>()
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/path/index.rs"]
mod tests;
