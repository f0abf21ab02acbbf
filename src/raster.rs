//! CPU raster surface and drawing primitives.
//!
//! Pixels are premultiplied RGBA8 end-to-end; straight colors are
//! premultiplied at the blend site. All geometry is in pixel space with
//! sample points at pixel centers. Strokes get a half-pixel soft edge;
//! polygon fills are hard-edged scanline spans.

use crate::error::{PatternError, PatternResult};
use crate::theme::{Rgb, Rgba};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>, // premultiplied RGBA8, row-major
}

impl Pixmap {
    pub fn new(width: u32, height: u32) -> PatternResult<Self> {
        if width == 0 || height == 0 {
            return Err(PatternError::validation("pixmap dimensions must be > 0"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PatternError::render("pixmap buffer size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Flattens to straight RGB8, un-premultiplying partially covered
    /// pixels. A fully drawn scene has an opaque background so this is
    /// usually a plain channel drop.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() / 4 * 3);
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            if a == 0 {
                out.extend_from_slice(&[0, 0, 0]);
            } else if a == 255 {
                out.extend_from_slice(&px[..3]);
            } else {
                for &c in &px[..3] {
                    out.push(((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)) as u8);
                }
            }
        }
        out
    }

    /// Blends a straight-alpha color into one pixel with the given
    /// coverage (0..=1). Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let cov = coverage.clamp(0.0, 1.0);
        if cov <= 0.0 || color[3] == 0 {
            return;
        }
        let sa = mul_div255(
            u16::from(color[3]),
            ((cov * 255.0).round() as i32).clamp(0, 255) as u16,
        );
        if sa == 0 {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let inv = 255u16 - u16::from(sa);
        for c in 0..3 {
            let sc = mul_div255(u16::from(color[c]), u16::from(sa));
            let dc = mul_div255(u16::from(self.data[idx + c]), inv);
            self.data[idx + c] = sc.saturating_add(dc);
        }
        let da = mul_div255(u16::from(self.data[idx + 3]), inv);
        self.data[idx + 3] = sa.saturating_add(da);
    }

    /// Opaque top-to-bottom gradient covering the whole surface.
    pub fn fill_vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let h = self.height;
        let denom = (h.saturating_sub(1)).max(1) as f64;
        for y in 0..h {
            let t = f64::from(y) / denom;
            let row = [
                lerp_u8(top[0], bottom[0], t),
                lerp_u8(top[1], bottom[1], t),
                lerp_u8(top[2], bottom[2], t),
                255,
            ];
            let start = (y as usize) * (self.width as usize) * 4;
            for px in self.data[start..start + (self.width as usize) * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&row);
            }
        }
    }

    /// Axis-aligned rectangle fill over `[x0,x1) x [y0,y1)` pixel
    /// centers, blended with the given straight color.
    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        let xs = x0.floor().max(0.0) as i64;
        let xe = x1.ceil().min(f64::from(self.width)) as i64;
        let ys = y0.floor().max(0.0) as i64;
        let ye = y1.ceil().min(f64::from(self.height)) as i64;
        for y in ys..ye {
            let cy = y as f64 + 0.5;
            if cy < y0 || cy >= y1 {
                continue;
            }
            for x in xs..xe {
                let cx = x as f64 + 0.5;
                if cx < x0 || cx >= x1 {
                    continue;
                }
                self.blend_pixel(x, y, color, 1.0);
            }
        }
    }

    /// Thick line segment with a half-pixel antialiased edge.
    pub fn stroke_line(&mut self, a: (f64, f64), b: (f64, f64), width: f64, color: Rgba) {
        let half = width.max(1.0) / 2.0;
        let pad = half + 1.0;
        let xs = (a.0.min(b.0) - pad).floor().max(0.0) as i64;
        let xe = (a.0.max(b.0) + pad).ceil().min(f64::from(self.width)) as i64;
        let ys = (a.1.min(b.1) - pad).floor().max(0.0) as i64;
        let ye = (a.1.max(b.1) + pad).ceil().min(f64::from(self.height)) as i64;
        for y in ys..ye {
            for x in xs..xe {
                let d = dist_point_segment((x as f64 + 0.5, y as f64 + 0.5), a, b);
                let cov = (half + 0.5 - d).clamp(0.0, 1.0) as f32;
                if cov > 0.0 {
                    self.blend_pixel(x, y, color, cov);
                }
            }
        }
    }

    /// Connected segments through `pts` in order.
    pub fn stroke_polyline(&mut self, pts: &[(f64, f64)], width: f64, color: Rgba) {
        for pair in pts.windows(2) {
            self.stroke_line(pair[0], pair[1], width, color);
        }
    }

    /// Even-odd scanline fill of a closed polygon. The closing edge
    /// from the last point back to the first is implicit.
    pub fn fill_polygon(&mut self, pts: &[(f64, f64)], color: Rgba) {
        if pts.len() < 3 {
            return;
        }
        let y_min = pts.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let y_max = pts.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let ys = y_min.floor().max(0.0) as i64;
        let ye = y_max.ceil().min(f64::from(self.height)) as i64;
        let mut xs_hit = Vec::new();
        for y in ys..ye {
            let cy = y as f64 + 0.5;
            xs_hit.clear();
            for i in 0..pts.len() {
                let (x0, y0) = pts[i];
                let (x1, y1) = pts[(i + 1) % pts.len()];
                if (y0 <= cy && cy < y1) || (y1 <= cy && cy < y0) {
                    xs_hit.push(x0 + (cy - y0) * (x1 - x0) / (y1 - y0));
                }
            }
            xs_hit.sort_by(|a, b| a.total_cmp(b));
            for span in xs_hit.chunks_exact(2) {
                let sx = span[0].round().max(0.0) as i64;
                let ex = span[1].round().min(f64::from(self.width)) as i64;
                for x in sx..ex {
                    self.blend_pixel(x, y, color, 1.0);
                }
            }
        }
    }

    /// Rounded rectangle fill via signed distance to the rounded
    /// boundary, half-pixel antialiased.
    pub fn fill_rounded_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, radius: f64, color: Rgba) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        let hw = (x1 - x0) / 2.0;
        let hh = (y1 - y0) / 2.0;
        let r = radius.clamp(0.0, hw.min(hh));
        let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        let xs = x0.floor().max(0.0) as i64;
        let xe = x1.ceil().min(f64::from(self.width)) as i64;
        let ys = y0.floor().max(0.0) as i64;
        let ye = y1.ceil().min(f64::from(self.height)) as i64;
        for y in ys..ye {
            for x in xs..xe {
                let qx = ((x as f64 + 0.5 - cx).abs() - (hw - r)).max(0.0);
                let qy = ((y as f64 + 0.5 - cy).abs() - (hh - r)).max(0.0);
                let d = (qx * qx + qy * qy).sqrt() - r;
                let cov = (0.5 - d).clamp(0.0, 1.0) as f32;
                if cov > 0.0 {
                    self.blend_pixel(x, y, color, cov);
                }
            }
        }
    }

    /// Source-over composite of an equal-sized premultiplied layer.
    pub fn composite_over(&mut self, src: &Pixmap) -> PatternResult<()> {
        if src.width != self.width || src.height != self.height {
            return Err(PatternError::render(
                "composite_over expects equal-sized surfaces",
            ));
        }
        for (d, s) in self
            .data
            .chunks_exact_mut(4)
            .zip(src.data.chunks_exact(4))
        {
            let sa = s[3];
            if sa == 0 {
                continue;
            }
            let inv = 255u16 - u16::from(sa);
            for c in 0..4 {
                let dc = mul_div255(u16::from(d[c]), inv);
                d[c] = s[c].saturating_add(dc);
            }
        }
        Ok(())
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}

fn dist_point_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return ((p.0 - a.0).powi(2) + (p.1 - a.1).powi(2)).sqrt();
    }
    let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0);
    let (px, py) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - px).powi(2) + (p.1 - py).powi(2)).sqrt()
}
