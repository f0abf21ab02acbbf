//! Separable Gaussian blur over premultiplied RGBA8 surfaces.
//!
//! The kernel extends to three standard deviations each side, so the
//! tails fade smoothly instead of cutting off. Weights are fixed-point
//! Q16 and normalized to sum exactly to one, so a constant surface
//! blurs to itself and repeated runs are bit-identical. Edges clamp to
//! the border pixel.

use crate::error::{PatternError, PatternResult};
use crate::raster::Pixmap;

pub fn gaussian_blur(src: &Pixmap, sigma: f32) -> PatternResult<Pixmap> {
    if sigma == 0.0 {
        return Ok(src.clone());
    }
    let kernel = kernel_q16(sigma)?;
    let (w, h) = (src.width(), src.height());
    let mut tmp = Pixmap::new(w, h)?;
    let mut out = Pixmap::new(w, h)?;
    pass(src.data(), tmp.data_mut(), w, h, &kernel, Axis::X);
    pass(tmp.data(), out.data_mut(), w, h, &kernel, Axis::Y);
    Ok(out)
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn kernel_q16(sigma: f32) -> PatternResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PatternError::validation("blur sigma must be > 0"));
    }
    let sigma = f64::from(sigma);
    let r = (3.0 * sigma).ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights_f = Vec::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for wf in weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // push rounding drift into the center tap so the kernel sums to 1.0
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, kernel: &[u32], axis: Axis) {
    let radius = (kernel.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in kernel.iter().enumerate() {
                let offset = ki as i32 - radius;
                let (sx, sy) = match axis {
                    Axis::X => ((x + offset).clamp(0, w - 1), y),
                    Axis::Y => (x, (y + offset).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = (((acc[c] + 32768) >> 16).min(255)) as u8;
            }
        }
    }
}
