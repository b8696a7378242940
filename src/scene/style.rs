use crate::{
    foundation::{
        core::Rgba,
        error::{WavyteError, WavyteResult},
    },
    scene::camera::Camera,
};

/// Per-stroke appearance. Immutable for the duration of a draw.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "crate::scene::model::StrokeStyleDef")]
pub struct StrokeStyle {
    /// Stroke half-width in frame units. Must be nonzero; the sign selects which side a
    /// single-sided stroke keeps.
    pub width: f64,
    /// Falloff exponent for the radial antialiasing ramp. `0` gives a hard edge.
    pub dilate: f64,
    /// Straight-alpha stroke color.
    pub color: Rgba,
    pub single_sided: bool,
    pub has_linecap: bool,
    /// Composite through the weighted-blended transparency targets instead of the
    /// opaque color target.
    pub apply_oit: bool,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 0.2,
            dilate: 0.0,
            color: Rgba::WHITE,
            single_sided: false,
            has_linecap: true,
            apply_oit: false,
        }
    }
}

impl StrokeStyle {
    pub fn validate(&self) -> WavyteResult<()> {
        if !self.width.is_finite() || self.width == 0.0 {
            return Err(WavyteError::validation(
                "stroke width must be finite and nonzero",
            ));
        }
        if !self.dilate.is_finite() || self.dilate < 0.0 {
            return Err(WavyteError::validation("stroke dilate must be >= 0"));
        }
        let c = self.color;
        if ![c.r, c.g, c.b, c.a].iter().all(|v| v.is_finite()) {
            return Err(WavyteError::validation("stroke color must be finite"));
        }
        Ok(())
    }

    /// Caps and isolated points are only drawn for double-sided strokes.
    pub fn draws_caps(&self) -> bool {
        self.has_linecap && !self.single_sided
    }
}

/// Everything a draw pass reads besides the vertex stream.
#[derive(Clone, Copy, Debug)]
pub struct DrawUniforms<'a> {
    pub style: &'a StrokeStyle,
    pub camera: &'a Camera,
    /// `+1` or `-1`; picks the kept side of single-sided strokes.
    pub winding_sign: f64,
}

impl<'a> DrawUniforms<'a> {
    pub fn new(style: &'a StrokeStyle, camera: &'a Camera, winding_sign: f64) -> WavyteResult<Self> {
        style.validate()?;
        if winding_sign != 1.0 && winding_sign != -1.0 {
            return Err(WavyteError::validation("winding sign must be +1 or -1"));
        }
        Ok(Self {
            style,
            camera,
            winding_sign,
        })
    }

    /// Geometric half-width; the sign of `width` is already folded into `winding_sign`.
    pub fn half_width(&self) -> f64 {
        self.style.width.abs()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/style.rs"]
mod tests;
