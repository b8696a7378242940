use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::{
        core::{Canvas, Rgba, Vec2},
        error::{WavyteError, WavyteResult},
    },
    path::polyline::Polyline,
    render::pipeline::RenderThreading,
    scene::{
        camera::{Camera, DEFAULT_ALTITUDE, DEFAULT_FAR, DEFAULT_FRAME_HEIGHT, DEFAULT_NEAR},
        style::StrokeStyle,
    },
};

/// One stroked object: any number of paths sharing a style and a winding sign.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stroke {
    pub paths: Vec<Polyline>,
    #[serde(default)]
    pub style: StrokeStyle,
}

impl Stroke {
    pub fn new(paths: Vec<Polyline>, style: StrokeStyle) -> WavyteResult<Self> {
        let stroke = Self { paths, style };
        stroke.validate()?;
        Ok(stroke)
    }

    pub fn validate(&self) -> WavyteResult<()> {
        self.style.validate()?;
        for path in &self.paths {
            path.validate()?;
        }
        Ok(())
    }
}

/// JSON form of [`StrokeStyle`].
///
/// `opacity` scales the color alpha. Giving an opacity or a dilate turns on
/// order-independent transparency unless `apply_oit` says otherwise.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StrokeStyleDef {
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    dilate: Option<f64>,
    #[serde(default)]
    color: Option<Rgba>,
    #[serde(default)]
    opacity: Option<f32>,
    #[serde(default)]
    single_sided: Option<bool>,
    #[serde(default)]
    has_linecap: Option<bool>,
    #[serde(default)]
    apply_oit: Option<bool>,
}

impl TryFrom<StrokeStyleDef> for StrokeStyle {
    type Error = WavyteError;

    fn try_from(def: StrokeStyleDef) -> WavyteResult<Self> {
        let base = StrokeStyle::default();
        let color = def.color.unwrap_or(base.color);
        let color = match def.opacity {
            Some(opacity) if opacity.is_finite() && (0.0..=1.0).contains(&opacity) => {
                color.with_alpha(color.a * opacity)
            }
            Some(opacity) => {
                return Err(WavyteError::validation(format!(
                    "stroke opacity must be within [0, 1], got {opacity}"
                )));
            }
            None => color,
        };
        let implied_oit = def.opacity.is_some() || def.dilate.is_some();
        Ok(Self {
            width: def.width.unwrap_or(base.width),
            dilate: def.dilate.unwrap_or(base.dilate),
            color,
            single_sided: def.single_sided.unwrap_or(base.single_sided),
            has_linecap: def.has_linecap.unwrap_or(base.has_linecap),
            apply_oit: def.apply_oit.unwrap_or(implied_oit),
        })
    }
}

/// Visible frame and clip planes. The frame width defaults to the canvas aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Frustum {
    pub frame_height: f64,
    pub frame_width: Option<f64>,
    pub near: f64,
    pub far: f64,
    pub altitude: f64,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            frame_height: DEFAULT_FRAME_HEIGHT,
            frame_width: None,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            altitude: DEFAULT_ALTITUDE,
        }
    }
}

impl Frustum {
    fn frame_radii(&self, canvas: Canvas) -> Vec2 {
        let width = self.frame_width.unwrap_or_else(|| {
            self.frame_height * f64::from(canvas.width) / f64::from(canvas.height)
        });
        Vec2::new(width / 2.0, self.frame_height / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraDef {
    Orthographic(Frustum),
    Perspective(Frustum),
}

impl Default for CameraDef {
    fn default() -> Self {
        Self::Orthographic(Frustum::default())
    }
}

impl CameraDef {
    pub fn build(&self, canvas: Canvas) -> WavyteResult<Camera> {
        match self {
            Self::Orthographic(f) => {
                Camera::orthographic(f.frame_radii(canvas), f.near, f.far, f.altitude)
            }
            Self::Perspective(f) => {
                Camera::perspective(f.frame_radii(canvas), f.near, f.far, f.altitude)
            }
        }
    }
}

/// A complete frame description: what to draw and how to view it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    pub canvas: Canvas,
    #[serde(default)]
    pub background: Rgba,
    #[serde(default)]
    pub camera: CameraDef,
    #[serde(default)]
    pub threading: RenderThreading,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

impl Scene {
    /// Parse and validate a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> WavyteResult<Self> {
        let scene: Self = serde_json::from_reader(r)
            .map_err(|e| WavyteError::serde(format!("parse scene JSON: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_json_str(s: &str) -> WavyteResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> WavyteResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            WavyteError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> WavyteResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        self.camera.build(self.canvas)?;
        if let Some(0) = self.threading.threads {
            return Err(WavyteError::validation(
                "scene threading 'threads' must be >= 1 when set",
            ));
        }
        for (i, stroke) in self.strokes.iter().enumerate() {
            stroke
                .validate()
                .map_err(|e| WavyteError::validation(format!("stroke {i}: {e}")))?;
        }
        Ok(())
    }

    pub fn camera(&self) -> WavyteResult<Camera> {
        self.camera.build(self.canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
