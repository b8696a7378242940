//! Render targets and the per-pixel combine operations between them.

use rayon::prelude::*;

use crate::{
    foundation::{
        core::{Canvas, Rgba},
        error::{WavyteError, WavyteResult},
    },
    render::{
        coverage::oit_contribution,
        raster::Fragment,
    },
};

/// Depth value the buffers are cleared to (the far plane).
pub const CLEAR_DEPTH: f64 = 1.0;

fn index(canvas: Canvas, x: u32, y: u32) -> usize {
    (y as usize) * (canvas.width as usize) + (x as usize)
}

fn ensure_same_canvas(a: Canvas, b: Canvas) -> WavyteResult<()> {
    if a != b {
        return Err(WavyteError::evaluation(format!(
            "render target size mismatch: {}x{} vs {}x{}",
            a.width, a.height, b.width, b.height
        )));
    }
    Ok(())
}

/// Straight-alpha float color target.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTarget {
    canvas: Canvas,
    data: Vec<Rgba>,
}

impl ColorTarget {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![Rgba::TRANSPARENT; canvas.pixel_count()],
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.data[index(self.canvas, x, y)]
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.data
    }

    /// Per-channel MAX blend.
    pub fn blend_max(&mut self, x: u32, y: u32, color: Rgba) {
        let i = index(self.canvas, x, y);
        self.data[i] = self.data[i].max(color);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DepthBuffer {
    canvas: Canvas,
    data: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![CLEAR_DEPTH; canvas.pixel_count()],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.data[index(self.canvas, x, y)]
    }

    /// Keep the nearest depth seen so far.
    pub fn write_min(&mut self, x: u32, y: u32, depth: f64) {
        let i = index(self.canvas, x, y);
        self.data[i] = self.data[i].min(depth);
    }
}

/// Color and depth of a single stroke, rendered in isolation before it is merged into
/// the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentTarget {
    pub color: ColorTarget,
    pub depth: DepthBuffer,
}

impl ComponentTarget {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            color: ColorTarget::new(canvas),
            depth: DepthBuffer::new(canvas),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.color.canvas
    }

    /// Fragments of one stroke combine with MAX, so overlapping line, join and cap
    /// coverage never double-counts and draw order is irrelevant.
    pub fn write(&mut self, fragment: &Fragment, color: Rgba) {
        self.color.blend_max(fragment.x, fragment.y, color);
        self.depth.write_min(fragment.x, fragment.y, fragment.depth);
    }
}

/// Additive `(rgb * a, a)` accumulation.
#[derive(Clone, Debug, PartialEq)]
pub struct AccumTarget {
    canvas: Canvas,
    data: Vec<[f32; 4]>,
}

impl AccumTarget {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![[0.0; 4]; canvas.pixel_count()],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> [f32; 4] {
        self.data[index(self.canvas, x, y)]
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.data
    }
}

/// Product of `(1 - a)` over all transparent fragments; cleared to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealageTarget {
    canvas: Canvas,
    data: Vec<f32>,
}

impl RevealageTarget {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![1.0; canvas.pixel_count()],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[index(self.canvas, x, y)]
    }

    pub fn pixels(&self) -> &[f32] {
        &self.data
    }
}

/// Scene-wide targets shared by every stroke of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameTargets {
    canvas: Canvas,
    pub color: ColorTarget,
    pub depth: DepthBuffer,
    pub accum: AccumTarget,
    pub revealage: RevealageTarget,
}

impl FrameTargets {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            color: ColorTarget::new(canvas),
            depth: DepthBuffer::new(canvas),
            accum: AccumTarget::new(canvas),
            revealage: RevealageTarget::new(canvas),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Copy an opaque stroke into the scene wherever it is strictly nearer.
    pub fn merge_opaque(&mut self, component: &ComponentTarget) -> WavyteResult<()> {
        ensure_same_canvas(self.canvas, component.canvas())?;
        for (i, (&depth, &color)) in component
            .depth
            .data
            .iter()
            .zip(&component.color.data)
            .enumerate()
        {
            if depth < self.depth.data[i] {
                self.color.data[i] = color;
                self.depth.data[i] = depth;
            }
        }
        Ok(())
    }

    /// Accumulate a transparent stroke into the OIT targets. Fragments are depth tested
    /// against the scene depth, which is never written.
    pub fn accumulate_oit(
        &mut self,
        component: &ComponentTarget,
        pool: Option<&rayon::ThreadPool>,
    ) -> WavyteResult<()> {
        ensure_same_canvas(self.canvas, component.canvas())?;
        let scene_depth = &self.depth.data;
        let accum = &mut self.accum.data;
        let revealage = &mut self.revealage.data;
        let sources = &component.color.data;
        let depths = &component.depth.data;

        let accumulate = |(((acc, rv), &color), (&depth, &scene)): (
            ((&mut [f32; 4], &mut f32), &Rgba),
            (&f64, &f64),
        )| {
            if depth >= scene || color.a <= 0.0 {
                return;
            }
            let s = oit_contribution(color);
            for (a, c) in acc.iter_mut().zip(s.accum) {
                *a += c;
            }
            *rv *= s.revealage_factor;
        };

        match pool {
            Some(pool) => pool.install(|| {
                accum
                    .par_iter_mut()
                    .zip(revealage.par_iter_mut())
                    .zip(sources.par_iter())
                    .zip(depths.par_iter().zip(scene_depth.par_iter()))
                    .for_each(accumulate)
            }),
            None => accum
                .iter_mut()
                .zip(revealage.iter_mut())
                .zip(sources.iter())
                .zip(depths.iter().zip(scene_depth.iter()))
                .for_each(accumulate),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/targets.rs"]
mod tests;
