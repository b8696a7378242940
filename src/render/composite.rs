use crate::{
    foundation::{
        core::{Rgba, Rgba8Premul},
        error::{WavyteError, WavyteResult},
        math::mul_div255_u8,
    },
    render::{FrameRGBA, RenderSettings, targets::FrameTargets},
};

pub type PremulRgba8 = [u8; 4];

/// Lower bound on accumulated alpha before dividing it out.
const ACCUM_ALPHA_EPS: f32 = 1e-5;

/// Source-over for premultiplied RGBA8.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> WavyteResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WavyteError::evaluation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Blend the weighted-average transparent color over the opaque one.
///
/// Returns premultiplied float RGBA.
pub fn resolve_pixel(opaque: Rgba, accum: [f32; 4], revealage: f32) -> [f32; 4] {
    let oa = opaque.a.clamp(0.0, 1.0);
    let opaque = [opaque.r * oa, opaque.g * oa, opaque.b * oa, oa];

    let oit_alpha = (1.0 - revealage).clamp(0.0, 1.0);
    if oit_alpha <= 0.0 {
        return opaque;
    }
    let weight = accum[3].max(ACCUM_ALPHA_EPS);
    let keep = 1.0 - oit_alpha;
    [
        accum[0] / weight * oit_alpha + opaque[0] * keep,
        accum[1] / weight * oit_alpha + opaque[1] * keep,
        accum[2] / weight * oit_alpha + opaque[2] * keep,
        oit_alpha + opaque[3] * keep,
    ]
}

fn quantize(premul: [f32; 4]) -> Rgba8Premul {
    let q = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
    let a = q(premul[3]);
    // Keep the premultiplied invariant after rounding.
    let c = |x: f32| q(x).min(a);
    Rgba8Premul {
        r: c(premul[0]),
        g: c(premul[1]),
        b: c(premul[2]),
        a,
    }
}

/// Resolve pass: opaque and transparent targets into one premultiplied frame, composited
/// over the clear color.
pub fn resolve_frame(targets: &FrameTargets, settings: &RenderSettings) -> WavyteResult<FrameRGBA> {
    let canvas = targets.canvas();
    let clear = settings
        .clear_rgba
        .unwrap_or_else(|| Rgba8Premul::transparent().to_array());

    let mut data = Vec::with_capacity(canvas.pixel_count() * 4);
    for _ in 0..canvas.pixel_count() {
        data.extend_from_slice(&clear);
    }

    let layer = targets
        .color
        .pixels()
        .iter()
        .zip(targets.accum.pixels())
        .zip(targets.revealage.pixels())
        .flat_map(|((&opaque, &accum), &rv)| quantize(resolve_pixel(opaque, accum, rv)).to_array())
        .collect::<Vec<u8>>();
    over_in_place(&mut data, &layer)?;

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
        premultiplied: true,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
