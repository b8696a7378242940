use rayon::prelude::*;

use crate::{
    expand::{ExpandedPrimitive, ExpansionMode, SidedMode, expand_primitive},
    foundation::{
        core::Canvas,
        error::{WavyteError, WavyteResult},
    },
    path::{
        index::{PrimitiveVertices, StrokeIndices, assemble_primitives},
        polyline::{PathVertex, compute_path_vertices},
        winding::winding_sign,
    },
    render::{
        FrameRGBA, RenderSettings,
        composite::resolve_frame,
        coverage::{OutputMode, shade_fragment},
        raster::rasterize_triangle,
        targets::{ComponentTarget, FrameTargets},
    },
    scene::{
        camera::Camera,
        model::{Scene, Stroke},
        style::{DrawUniforms, StrokeStyle},
    },
};

/// Environment override for the worker count when none is configured.
pub const THREADS_ENV: &str = "WAVYTE_STROKE_THREADS";

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderThreading {
    /// Expand primitives and accumulate transparency on a rayon pool.
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl RenderThreading {
    /// Configured worker count, falling back to [`THREADS_ENV`].
    pub fn resolved_threads(&self) -> Option<usize> {
        self.threads.or_else(|| {
            std::env::var(THREADS_ENV)
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
        })
    }

    pub fn build_pool(&self) -> WavyteResult<Option<rayon::ThreadPool>> {
        if !self.parallel {
            return Ok(None);
        }
        build_thread_pool(self.resolved_threads()).map(Some)
    }
}

fn build_thread_pool(threads: Option<usize>) -> WavyteResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(WavyteError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| WavyteError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

/// All primitives of one draw pass.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ExpandedPass {
    pub mode: ExpansionMode,
    pub sided: SidedMode,
    pub primitives: Vec<ExpandedPrimitive>,
}

impl ExpandedPass {
    pub fn triangle_count(&self) -> usize {
        self.primitives.iter().map(ExpandedPrimitive::triangle_count).sum()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ExpandedStroke {
    pub winding_sign: f64,
    pub passes: Vec<ExpandedPass>,
}

impl ExpandedStroke {
    pub fn triangle_count(&self) -> usize {
        self.passes.iter().map(ExpandedPass::triangle_count).sum()
    }
}

/// Draw passes a style asks for, in submission order.
fn passes_for(style: &StrokeStyle) -> &'static [ExpansionMode] {
    if style.draws_caps() {
        &ExpansionMode::ALL
    } else {
        &[ExpansionMode::Line, ExpansionMode::Join]
    }
}

/// Preprocess, assemble and expand every draw pass of `stroke`.
#[tracing::instrument(skip_all, fields(paths = stroke.paths.len()))]
pub fn expand_stroke(
    stroke: &Stroke,
    camera: &Camera,
    pool: Option<&rayon::ThreadPool>,
) -> WavyteResult<ExpandedStroke> {
    stroke.validate()?;
    let style = &stroke.style;
    let winding = winding_sign(&stroke.paths, camera, style.width)?;
    let uniforms = DrawUniforms::new(style, camera, winding)?;
    let sided = SidedMode::from_single_sided(style.single_sided);

    let mut vertices = Vec::<PathVertex>::new();
    let mut indices = StrokeIndices::default();
    for path in &stroke.paths {
        let prepared = compute_path_vertices(path, camera)?;
        indices.push_path(prepared.kind, prepared.vertices.len())?;
        vertices.extend(prepared.vertices);
    }

    let mut passes = Vec::new();
    for &mode in passes_for(style) {
        let prims = assemble_primitives(&vertices, indices.for_mode(mode), mode)?;
        let expand = |p: &PrimitiveVertices| {
            expand_primitive(mode, sided, &uniforms, p)
        };
        let primitives = match pool {
            Some(pool) => pool.install(|| {
                prims
                    .par_iter()
                    .map(expand)
                    .collect::<WavyteResult<Vec<_>>>()
            })?,
            None => prims.iter().map(expand).collect::<WavyteResult<Vec<_>>>()?,
        };
        let pass = ExpandedPass {
            mode,
            sided,
            primitives,
        };
        tracing::debug!(
            ?mode,
            primitives = pass.primitives.len(),
            triangles = pass.triangle_count(),
            "expanded pass"
        );
        passes.push(pass);
    }

    Ok(ExpandedStroke {
        winding_sign: winding,
        passes,
    })
}

/// Rasterize every pass of an expanded stroke into its own component target.
pub fn rasterize_stroke(expanded: &ExpandedStroke, style: &StrokeStyle, canvas: Canvas) -> ComponentTarget {
    let mut component = ComponentTarget::new(canvas);
    let triangles = expanded
        .passes
        .iter()
        .flat_map(|pass| &pass.primitives)
        .flat_map(ExpandedPrimitive::triangles);
    for tri in triangles {
        rasterize_triangle(&tri, canvas, |fragment| {
            if let Some(color) = shade_fragment(style, fragment.offset) {
                component.write(&fragment, color);
            }
        });
    }
    component
}

/// Draws strokes one at a time into shared scene targets, then resolves them.
///
/// Opaque strokes are merged as soon as they are drawn. Transparent strokes are held
/// back until [`StrokeRenderer::resolve`], so they are depth tested against every opaque
/// stroke regardless of submission order.
pub struct StrokeRenderer {
    camera: Camera,
    settings: RenderSettings,
    targets: FrameTargets,
    pending_oit: Vec<ComponentTarget>,
    pool: Option<rayon::ThreadPool>,
}

impl StrokeRenderer {
    pub fn new(
        canvas: Canvas,
        camera: Camera,
        settings: RenderSettings,
        threading: &RenderThreading,
    ) -> WavyteResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        Ok(Self {
            camera,
            settings,
            targets: FrameTargets::new(canvas),
            pending_oit: Vec::new(),
            pool: threading.build_pool()?,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.targets.canvas()
    }

    #[tracing::instrument(skip_all, fields(paths = stroke.paths.len(), oit = stroke.style.apply_oit))]
    pub fn draw_stroke(&mut self, stroke: &Stroke) -> WavyteResult<()> {
        let expanded = expand_stroke(stroke, &self.camera, self.pool.as_ref())?;
        let component = rasterize_stroke(&expanded, &stroke.style, self.canvas());
        match OutputMode::from_apply_oit(stroke.style.apply_oit) {
            OutputMode::Opaque => self.targets.merge_opaque(&component),
            OutputMode::Transparent => {
                self.pending_oit.push(component);
                Ok(())
            }
        }
    }

    /// Accumulate held-back transparent strokes, then resolve all targets into a frame.
    #[tracing::instrument(skip_all, fields(transparent = self.pending_oit.len()))]
    pub fn resolve(&mut self) -> WavyteResult<FrameRGBA> {
        for component in self.pending_oit.drain(..) {
            self.targets.accumulate_oit(&component, self.pool.as_ref())?;
        }
        resolve_frame(&self.targets, &self.settings)
    }
}

/// Render a whole scene to a premultiplied frame.
#[tracing::instrument(skip_all, fields(width = scene.canvas.width, height = scene.canvas.height, strokes = scene.strokes.len()))]
pub fn render_scene(scene: &Scene) -> WavyteResult<FrameRGBA> {
    scene.validate()?;
    let settings = RenderSettings {
        clear_rgba: Some(scene.background.to_rgba8_premul().to_array()),
    };
    let mut renderer = StrokeRenderer::new(scene.canvas, scene.camera()?, settings, &scene.threading)?;
    for stroke in &scene.strokes {
        renderer.draw_stroke(stroke)?;
    }
    renderer.resolve()
}

/// Expand every stroke of a scene without rasterizing.
pub fn expand_scene(scene: &Scene) -> WavyteResult<Vec<ExpandedStroke>> {
    scene.validate()?;
    let camera = scene.camera()?;
    let pool = scene.threading.build_pool()?;
    scene
        .strokes
        .iter()
        .map(|stroke| expand_stroke(stroke, &camera, pool.as_ref()))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
