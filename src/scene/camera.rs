//! Camera matrices and the frame-space mapping used by stroke expansion.
//!
//! Stroke offsets live in *frame space*: normalized device coordinates scaled by the
//! frame radii. Width is therefore measured in frame units regardless of depth, and
//! angles, segment lengths and winding are all computed in the same space.

use crate::foundation::{
    core::{DMat4, DVec3, DVec4, Point, Vec2},
    error::{WavyteError, WavyteResult},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub projection: DMat4,
    pub view: DMat4,
    pub view_position: DVec3,
    /// Half extents of the visible frame in frame units.
    pub frame_radii: Vec2,
}

impl Camera {
    /// Orthographic camera looking down `-z` from `(0, 0, altitude)`.
    pub fn orthographic(frame_radii: Vec2, near: f64, far: f64, altitude: f64) -> WavyteResult<Self> {
        validate_frustum(frame_radii, near, far)?;
        Ok(Self::looking_down(
            orthographic_projection(frame_radii, near, far),
            frame_radii,
            altitude,
        ))
    }

    /// Perspective camera whose `z = 0` plane maps exactly onto the frame radii.
    pub fn perspective(frame_radii: Vec2, near: f64, far: f64, altitude: f64) -> WavyteResult<Self> {
        validate_frustum(frame_radii, near, far)?;
        if !altitude.is_finite() || altitude <= 0.0 {
            return Err(WavyteError::validation(
                "perspective camera altitude must be > 0",
            ));
        }
        let sz = -(far + near) / (far - near);
        let tz = -2.0 * far * near / (far - near);
        let projection = DMat4::from_cols(
            DVec4::new(altitude / frame_radii.x, 0.0, 0.0, 0.0),
            DVec4::new(0.0, altitude / frame_radii.y, 0.0, 0.0),
            DVec4::new(0.0, 0.0, sz, -1.0),
            DVec4::new(0.0, 0.0, tz, 0.0),
        );
        Ok(Self::looking_down(projection, frame_radii, altitude))
    }

    fn looking_down(projection: DMat4, frame_radii: Vec2, altitude: f64) -> Self {
        let view_position = DVec3::new(0.0, 0.0, altitude);
        Self {
            projection,
            view: DMat4::look_at_rh(view_position, DVec3::ZERO, DVec3::Y),
            view_position,
            frame_radii,
        }
    }

    pub fn clip_position(&self, position: DVec3) -> DVec4 {
        self.projection * self.view * position.extend(1.0)
    }

    /// Frame-space position of a point, or `None` when it projects behind the camera.
    pub fn frame_position(&self, position: DVec3) -> Option<Point> {
        let clip = self.clip_position(position);
        if clip.w <= 0.0 {
            return None;
        }
        Some(Point::new(
            clip.x / clip.w * self.frame_radii.x,
            clip.y / clip.w * self.frame_radii.y,
        ))
    }

    /// Displace a clip-space position by `offset` frame units.
    pub fn offset_clip(&self, clip: DVec4, offset: Vec2) -> DVec4 {
        DVec4::new(
            clip.x + offset.x / self.frame_radii.x * clip.w,
            clip.y + offset.y / self.frame_radii.y * clip.w,
            clip.z,
            clip.w,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        let frame_radii = Vec2::new(DEFAULT_FRAME_HEIGHT * 8.0 / 9.0, DEFAULT_FRAME_HEIGHT / 2.0);
        Self::looking_down(
            orthographic_projection(frame_radii, DEFAULT_NEAR, DEFAULT_FAR),
            frame_radii,
            DEFAULT_ALTITUDE,
        )
    }
}

pub(crate) const DEFAULT_FRAME_HEIGHT: f64 = 8.0;
pub(crate) const DEFAULT_NEAR: f64 = 0.1;
pub(crate) const DEFAULT_FAR: f64 = 100.0;
pub(crate) const DEFAULT_ALTITUDE: f64 = 5.0;

fn orthographic_projection(frame_radii: Vec2, near: f64, far: f64) -> DMat4 {
    let sz = -2.0 / (far - near);
    let tz = -(far + near) / (far - near);
    DMat4::from_cols(
        DVec4::new(1.0 / frame_radii.x, 0.0, 0.0, 0.0),
        DVec4::new(0.0, 1.0 / frame_radii.y, 0.0, 0.0),
        DVec4::new(0.0, 0.0, sz, 0.0),
        DVec4::new(0.0, 0.0, tz, 1.0),
    )
}

fn validate_frustum(frame_radii: Vec2, near: f64, far: f64) -> WavyteResult<()> {
    if !(frame_radii.x.is_finite() && frame_radii.y.is_finite())
        || frame_radii.x <= 0.0
        || frame_radii.y <= 0.0
    {
        return Err(WavyteError::validation("camera frame radii must be > 0"));
    }
    if !near.is_finite() || !far.is_finite() || near <= 0.0 || far <= near {
        return Err(WavyteError::validation(
            "camera clip planes must satisfy 0 < near < far",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/camera.rs"]
mod tests;
