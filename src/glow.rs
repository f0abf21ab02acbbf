//! Overlay compositing: glow-lines, parallel channels, polygons.
//!
//! Overlay items are applied in list order, later items over earlier
//! ones. A glow-line is a crisp stroke with blurred copies at radii
//! 8, 4, 2 (scaled by density) composited beneath it; exactly this
//! radius sequence produces the intended halo.

use crate::blur::gaussian_blur;
use crate::error::PatternResult;
use crate::raster::Pixmap;
use crate::template::OverlayItem;
use crate::theme::{Rgb, Theme};

const GLOW_RADII: [f64; 3] = [8.0, 4.0, 2.0];
const POLYGON_FILL_ALPHA: u8 = 40;
const POLYGON_STROKE_ALPHA: u8 = 220;

/// Strokes a polyline with the halo effect. `pts` and `width` are
/// already in device pixels; `scale` sizes the blur radii.
pub fn glow_line(
    base: &mut Pixmap,
    pts: &[(f64, f64)],
    color: Rgb,
    width: f64,
    scale: f64,
) -> PatternResult<()> {
    let mut layer = Pixmap::new(base.width(), base.height())?;
    layer.stroke_polyline(pts, width, [color[0], color[1], color[2], 255]);
    for r in GLOW_RADII {
        let sigma = (r * scale).max(1.0) as f32;
        let halo = gaussian_blur(&layer, sigma)?;
        base.composite_over(&halo)?;
    }
    base.composite_over(&layer)
}

/// The two parallel lines of a channel band: the anchors shifted by
/// `+offset` and `-offset` along the perpendicular unit normal.
///
/// When `p1 == p2` the normal is undefined; the divisor falls back to 1,
/// the normal collapses to zero and both lines land on the (pointlike)
/// anchors, so the channel renders nothing visible.
pub fn channel_lines(
    p1: (f64, f64),
    p2: (f64, f64),
    offset: f64,
) -> [((f64, f64), (f64, f64)); 2] {
    let (dx, dy) = (p2.0 - p1.0, p2.1 - p1.1);
    let (nx, ny) = (-dy, dx);
    let len = (nx * nx + ny * ny).sqrt();
    let len = if len == 0.0 { 1.0 } else { len };
    let (nx, ny) = (nx / len, ny / len);
    [
        (
            (p1.0 + nx * offset, p1.1 + ny * offset),
            (p2.0 + nx * offset, p2.1 + ny * offset),
        ),
        (
            (p1.0 - nx * offset, p1.1 - ny * offset),
            (p2.0 - nx * offset, p2.1 - ny * offset),
        ),
    ]
}

/// Applies every overlay item in paint order. Coordinates are authored
/// in base-canvas space and multiplied by `scale` here, together with
/// stroke widths and channel offsets.
pub fn composite_overlay(
    canvas: &mut Pixmap,
    overlay: &[OverlayItem],
    theme: &Theme,
    scale: f64,
) -> PatternResult<()> {
    let accent = theme.accent;
    for item in overlay {
        match item {
            OverlayItem::Line { pts, width } => {
                let pts = scaled_points(pts, scale);
                glow_line(canvas, &pts, accent, width * scale, scale)?;
            }
            OverlayItem::Channel { pts, width, offset } => {
                let p1 = (pts[0][0] * scale, pts[0][1] * scale);
                let p2 = (pts[1][0] * scale, pts[1][1] * scale);
                for (a, b) in channel_lines(p1, p2, offset * scale) {
                    glow_line(canvas, &[a, b], accent, width * scale, scale)?;
                }
            }
            OverlayItem::Polygon { pts, width } => {
                let pts = scaled_points(pts, scale);
                canvas.fill_polygon(
                    &pts,
                    [accent[0], accent[1], accent[2], POLYGON_FILL_ALPHA],
                );
                let stroke = [accent[0], accent[1], accent[2], POLYGON_STROKE_ALPHA];
                for i in 0..pts.len() {
                    canvas.stroke_line(pts[i], pts[(i + 1) % pts.len()], width * scale, stroke);
                }
            }
        }
    }
    Ok(())
}

fn scaled_points(pts: &[[f64; 2]], scale: f64) -> Vec<(f64, f64)> {
    pts.iter().map(|p| (p[0] * scale, p[1] * scale)).collect()
}
