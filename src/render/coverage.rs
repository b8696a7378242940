use crate::{
    foundation::core::{Rgba, Vec2},
    scene::style::StrokeStyle,
};

/// Where a stroke's fragments end up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Replace the scene color where the stroke is nearer.
    Opaque,
    /// Weighted-blended order-independent transparency.
    Transparent,
}

impl OutputMode {
    pub fn from_apply_oit(apply_oit: bool) -> Self {
        if apply_oit {
            Self::Transparent
        } else {
            Self::Opaque
        }
    }
}

/// Radial antialiasing ramp: `color_alpha * (1 - |offset|)^dilate`, or `None` outside
/// the unit disc.
pub fn coverage_alpha(offset: Vec2, color_alpha: f32, dilate: f64) -> Option<f32> {
    let base = 1.0 - offset.hypot();
    if base.is_nan() || base <= 0.0 {
        return None;
    }
    Some(color_alpha * base.powf(dilate) as f32)
}

/// Straight-alpha fragment color for a stroke.
pub fn shade_fragment(style: &StrokeStyle, offset: Vec2) -> Option<Rgba> {
    let alpha = coverage_alpha(offset, style.color.a, style.dilate)?;
    Some(style.color.with_alpha(alpha))
}

/// What one transparent fragment adds to the accumulation targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OitSample {
    /// `(rgb * a, a)`, summed.
    pub accum: [f32; 4],
    /// `1 - a`, multiplied into revealage.
    pub revealage_factor: f32,
}

pub fn oit_contribution(color: Rgba) -> OitSample {
    let a = color.a.clamp(0.0, 1.0);
    OitSample {
        accum: [color.r * a, color.g * a, color.b * a, a],
        revealage_factor: 1.0 - a,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/coverage.rs"]
mod tests;
