use crate::{
    expand::{ExpandedPrimitive, ExpandedVertex},
    foundation::{core::DVec3, math::polar},
    scene::style::DrawUniforms,
};

/// Collects emitted vertices for one primitive, geometry-shader style.
pub struct Emitter<'u> {
    uniforms: &'u DrawUniforms<'u>,
    out: ExpandedPrimitive,
}

impl<'u> Emitter<'u> {
    pub fn new(uniforms: &'u DrawUniforms<'u>) -> Self {
        Self {
            uniforms,
            out: ExpandedPrimitive::default(),
        }
    }

    pub fn uniforms(&self) -> &DrawUniforms<'u> {
        self.uniforms
    }

    /// Emit `center + magnitude * (cos angle, sin angle) * width`, in frame space.
    pub fn emit_polar_vertex(&mut self, center: DVec3, magnitude: f64, angle: f64) {
        let offset = polar(magnitude, angle);
        let camera = self.uniforms.camera;
        let clip = camera.offset_clip(
            camera.clip_position(center),
            offset * self.uniforms.half_width(),
        );
        self.out.push_vertex(ExpandedVertex { clip, offset });
    }

    pub fn end_strip(&mut self) {
        self.out.end_strip();
    }

    /// Cover the circular sector spanning `middle_angle ± delta_angle` with two diamonds.
    ///
    /// Each diamond is a 4-vertex strip (side, center, tip, side) whose two triangles
    /// share the center-to-tip diagonal. The tip sits at `1 / cos(delta_angle / 2)` so
    /// both outer edges are tangent to the unit circle; the coverage stage trims the
    /// excess back to a round profile.
    pub fn emit_sector(&mut self, center: DVec3, middle_angle: f64, delta_angle: f64) {
        let half = delta_angle / 2.0;
        let tip = 1.0 / half.cos();
        for bisector in [middle_angle - half, middle_angle + half] {
            self.emit_polar_vertex(center, 1.0, bisector - half);
            self.emit_polar_vertex(center, 0.0, bisector);
            self.emit_polar_vertex(center, tip, bisector);
            self.emit_polar_vertex(center, 1.0, bisector + half);
            self.end_strip();
        }
    }

    pub fn finish(mut self) -> ExpandedPrimitive {
        self.out.end_strip();
        self.out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expand/emit.rs"]
mod tests;
