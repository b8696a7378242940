//! CPU rendering: rasterization, per-stroke targets, order-independent transparency and
//! the final resolve into premultiplied RGBA8.

pub(crate) mod composite;
pub(crate) mod coverage;
pub(crate) mod pipeline;
pub(crate) mod raster;
pub(crate) mod targets;

/// Rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, top row first.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Premultiplied RGBA8 the frame is cleared to before strokes are composited.
    pub clear_rgba: Option<[u8; 4]>,
}
