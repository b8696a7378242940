use crate::{
    foundation::error::{WavyteError, WavyteResult},
    path::polyline::Polyline,
    scene::camera::Camera,
};

/// Twice the signed shoelace area of all paths in frame space, each path closed.
///
/// Positive for counter-clockwise paths (y up).
pub fn signed_frame_area(paths: &[Polyline], camera: &Camera) -> WavyteResult<f64> {
    let mut area = 0.0;
    for path in paths {
        let pts = path
            .points
            .iter()
            .map(|&p| {
                camera.frame_position(p).ok_or_else(|| {
                    WavyteError::validation(format!("path point {p} projects behind the camera"))
                })
            })
            .collect::<WavyteResult<Vec<_>>>()?;
        for (i, a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            area += a.to_vec2().cross(b.to_vec2());
        }
    }
    Ok(area)
}

/// `+1` when the paths' orientation agrees with the sign of `width`, else `-1`.
///
/// Single-sided strokes keep the side picked by this sign, so flipping either the
/// path orientation or the width sign moves the stroke to the other side.
pub fn winding_sign(paths: &[Polyline], camera: &Camera, width: f64) -> WavyteResult<f64> {
    if !width.is_finite() || width == 0.0 {
        return Err(WavyteError::validation(
            "stroke width must be finite and nonzero",
        ));
    }
    let area = signed_frame_area(paths, camera)?;
    Ok(if area * width >= 0.0 { 1.0 } else { -1.0 })
}

#[cfg(test)]
#[path = "../../tests/unit/path/winding.rs"]
mod tests;
