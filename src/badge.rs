//! Label/confidence badge stamped into the bottom-left corner.
//!
//! Padding and corner radius are both fractions of the short canvas
//! side, so the badge keeps its proportions across density tiers.

use crate::error::{PatternError, PatternResult};
use crate::font;
use crate::raster::Pixmap;
use crate::theme::Theme;

const PAD_FRACTION: f64 = 0.04;
const RADIUS_FRACTION: f64 = 0.08;
const BODY_FILL: [u8; 4] = [20, 48, 70, 200];
const SHADOW_DELTA: f64 = 2.0;

/// Badge geometry for a given canvas size, exposed so exporters and
/// tests can reason about placement without re-deriving it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BadgeRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub radius: f64,
    pub pad: f64,
}

pub fn badge_rect(width: u32, height: u32) -> BadgeRect {
    let m = f64::from(width.min(height));
    let pad = (m * PAD_FRACTION).round();
    let radius = (m * RADIUS_FRACTION).round();
    let h = f64::from(height);
    BadgeRect {
        x0: pad,
        y0: h - pad - radius * 2.0,
        x1: pad + radius * 5.0,
        y1: h - pad,
        radius,
        pad,
    }
}

/// Draws the drop shadow, the rounded body and two text lines: the
/// label and the confidence as an integer percentage.
pub fn stamp_badge(
    canvas: &mut Pixmap,
    label: &str,
    confidence: f64,
    theme: &Theme,
    scale: f64,
) -> PatternResult<()> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(PatternError::validation(format!(
            "badge confidence must be in [0, 1], got {confidence}"
        )));
    }

    let rect = badge_rect(canvas.width(), canvas.height());
    let delta = (SHADOW_DELTA * scale).round().max(1.0);
    canvas.fill_rounded_rect(
        rect.x0 + delta,
        rect.y0 + delta,
        rect.x1 + delta,
        rect.y1 + delta,
        rect.radius,
        theme.shadow,
    );
    canvas.fill_rounded_rect(rect.x0, rect.y0, rect.x1, rect.y1, rect.radius, BODY_FILL);

    let r = rect.radius;
    let text_x = (rect.x0 + r * 0.6).round() as i64;
    // cap the text scale so a line cannot run past the badge body
    let avail = (rect.x1 - r * 0.6 - text_x as f64).max(f64::from(font::CHAR_ADVANCE));
    let fit = |text: &str, want: f64| -> u32 {
        let want = want.round().max(1.0) as u32;
        let unit = font::text_width(text, 1).max(1);
        want.min((avail as u32 / unit).max(1))
    };
    let label_scale = fit(label, (r * 0.8) / f64::from(font::CHAR_HEIGHT));
    let text = theme.text;
    font::draw_text(
        canvas,
        text_x,
        (rect.y0 + r * 0.35).round() as i64,
        label,
        label_scale,
        [text[0], text[1], text[2], 255],
    );

    let conf_text = format!("{}% conf.", (confidence * 100.0).round() as i64);
    let conf_scale = fit(&conf_text, (r * 0.9) / f64::from(font::CHAR_HEIGHT));
    let accent = theme.accent;
    font::draw_text(
        canvas,
        text_x,
        (rect.y0 + r * 1.15).round() as i64,
        &conf_text,
        conf_scale,
        [accent[0], accent[1], accent[2], 255],
    );
    Ok(())
}
