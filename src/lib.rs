//! Antialiased stroke rendering for 3D polylines.
//!
//! Every polyline vertex carries a position plus two angles (`direction`, `delta`)
//! describing its incoming and outgoing tangents. A stroke is drawn as a handful of
//! passes, one per [`ExpansionMode`], each turning assembled primitives into small
//! triangle strips whose vertices carry a local `offset` inside the unit disc. The
//! coverage stage turns that offset into a radial antialiasing ramp.
//!
//! # Pipeline overview
//!
//! 1. **Prepare**: [`Polyline`] → [`PathVertex`] angles in frame space ([`compute_path_vertices`])
//! 2. **Assemble**: per-pass index buffers ([`StrokeIndices`], [`assemble_primitives`])
//! 3. **Expand**: primitive → triangle strips ([`expand_primitive`])
//! 4. **Rasterize + shade**: per-stroke component target with MAX blending
//! 5. **Composite**: depth-tested opaque merge, weighted-blended transparency, resolve to
//!    premultiplied RGBA8 ([`FrameRGBA`])
//!
//! Width is measured in *frame units* (normalized device coordinates scaled by the
//! camera's frame radii), so a stroke keeps its on-screen thickness at any depth.
#![forbid(unsafe_code)]

mod expand;
mod foundation;
mod path;
mod render;
mod scene;

pub use expand::{
    Emitter, ExpandedPrimitive, ExpandedVertex, ExpansionMode, JoinSector, LineBodyShape,
    SidedMode, expand_primitive, join_sector, line_body_shape,
};
pub use foundation::core::{Canvas, DMat4, DVec3, DVec4, Point, Rgba, Rgba8Premul, Vec2};
pub use foundation::error::{WavyteError, WavyteResult};
pub use path::index::{PrimitiveVertices, StrokeIndices, assemble_primitives};
pub use path::polyline::{
    MAX_DELTA_ANGLE, PathKind, PathVertex, Polyline, PreparedPath, compute_path_vertices,
};
pub use path::winding::{signed_frame_area, winding_sign};
pub use render::composite::{PremulRgba8, over, over_in_place, resolve_frame, resolve_pixel};
pub use render::coverage::{OitSample, OutputMode, coverage_alpha, oit_contribution, shade_fragment};
pub use render::pipeline::{
    ExpandedPass, ExpandedStroke, RenderThreading, StrokeRenderer, THREADS_ENV, expand_scene,
    expand_stroke, rasterize_stroke, render_scene,
};
pub use render::raster::{Fragment, rasterize_triangle};
pub use render::targets::{
    AccumTarget, CLEAR_DEPTH, ColorTarget, ComponentTarget, DepthBuffer, FrameTargets,
    RevealageTarget,
};
pub use render::{FrameRGBA, RenderSettings};
pub use scene::camera::Camera;
pub use scene::model::{CameraDef, Frustum, Scene, Stroke};
pub use scene::style::{DrawUniforms, StrokeStyle};
