//! Whole-scene rendering for one (template, theme, density) triple.
//!
//! A render is a pure function of its inputs: background gradient and
//! grid, the seeded synthetic series (line or candles), the glow
//! overlay, then the badge. The generator draw order is fixed: `n`
//! standard-normal draws for the series, then two uniform draws per
//! candle (top wick end first, bottom second). Reordering any of these
//! draws breaks byte-level reproducibility.

use rand::Rng as _;
use rand::rngs::StdRng;

use crate::badge::stamp_badge;
use crate::error::{PatternError, PatternResult};
use crate::glow::composite_overlay;
use crate::raster::Pixmap;
use crate::seed::rng_for;
use crate::series::synth_series;
use crate::template::{PatternTemplate, SeriesStyle};
use crate::theme::{Rgb, Theme};

/// Base canvas the overlay coordinates are authored against.
pub const BASE_WIDTH: u32 = 320;
pub const BASE_HEIGHT: u32 = 240;

const SERIES_BAND: f64 = 0.76;
const SERIES_SHIFT: f64 = 0.12;
const LINE_SERIES_ALPHA: u8 = 180;
const WICK_ALPHA: u8 = 200;
const BODY_ALPHA: u8 = 220;

/// Mean-reversion tilt chosen from the pattern name. This is caller
/// policy, not part of the series generator itself.
pub fn trend_bias(name: &str) -> f64 {
    let n = name.to_ascii_lowercase();
    if n.contains("bull") || n.contains("ascending") || n.contains("cup") {
        0.15
    } else if n.contains("bear") || n.contains("descending") {
        -0.05
    } else {
        0.0
    }
}

/// Device canvas size for a density scale factor.
pub fn canvas_size(scale: f64) -> PatternResult<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(PatternError::validation("density scale must be > 0"));
    }
    let w = (f64::from(BASE_WIDTH) * scale).round() as u32;
    let h = (f64::from(BASE_HEIGHT) * scale).round() as u32;
    Ok((w, h))
}

/// Renders the full scene at native resolution for `scale`. Each call
/// owns its buffer and generator; nothing is shared or cached.
#[tracing::instrument(skip(template, theme), fields(name = %template.name))]
pub fn render_template(
    template: &PatternTemplate,
    theme: &Theme,
    scale: f64,
) -> PatternResult<Pixmap> {
    template.validate()?;
    let (w, h) = canvas_size(scale)?;
    let mut canvas = Pixmap::new(w, h)?;

    draw_background(&mut canvas, theme, scale);

    let mut rng = rng_for(&template.name);
    let bias = trend_bias(&template.name);
    let band = f64::from(h) * SERIES_BAND;
    let shift = f64::from(h) * SERIES_SHIFT;
    let mut series = synth_series(&mut rng, template.points as usize, band, bias)?;
    for y in &mut series {
        *y += shift;
    }

    match template.style {
        SeriesStyle::Line => {
            let width = (2.0 * scale).max(2.0);
            draw_line_series(&mut canvas, &series, width, theme.accent);
        }
        SeriesStyle::Candles => {
            draw_candles(&mut canvas, &mut rng, &series, theme, scale);
        }
    }

    composite_overlay(&mut canvas, &template.overlay, theme, scale)?;
    stamp_badge(
        &mut canvas,
        &template.label,
        template.confidence,
        theme,
        scale,
    )?;
    Ok(canvas)
}

fn draw_background(canvas: &mut Pixmap, theme: &Theme, scale: f64) {
    canvas.fill_vertical_gradient(theme.bg1, theme.bg2);

    let (w, h) = (canvas.width(), canvas.height());
    let gx = (w / 16).max(1);
    let gy = (h / 12).max(1);
    let stroke = scale.max(1.0);
    let mut x = 0;
    while x < w {
        canvas.fill_rect(f64::from(x), 0.0, f64::from(x) + stroke, f64::from(h), theme.grid);
        x += gx;
    }
    let mut y = 0;
    while y < h {
        canvas.fill_rect(0.0, f64::from(y), f64::from(w), f64::from(y) + stroke, theme.grid);
        y += gy;
    }
}

/// Evenly spaced polyline through the series, `x_i = i * w / (n - 1)`.
fn draw_line_series(canvas: &mut Pixmap, series: &[f64], width: f64, color: Rgb) {
    let n = series.len();
    if n < 2 {
        return;
    }
    let w = f64::from(canvas.width());
    let denom = (n - 1) as f64;
    let stroke = [color[0], color[1], color[2], LINE_SERIES_ALPHA];
    for i in 1..n {
        let x0 = (i - 1) as f64 * w / denom;
        let x1 = i as f64 * w / denom;
        canvas.stroke_line((x0, series[i - 1]), (x1, series[i]), width, stroke);
    }
}

/// Candle glyphs, one per series point. Consumes exactly two uniform
/// draws per candle from `rng` in iteration order.
fn draw_candles(canvas: &mut Pixmap, rng: &mut StdRng, series: &[f64], theme: &Theme, scale: f64) {
    let n = series.len();
    let w = f64::from(canvas.width());
    let slot = (w / (n as f64 * 1.2)).floor().max(2.0);
    let denom = n.saturating_sub(1).max(1) as f64;
    let wick_width = scale.max(1.0);

    let mut last = series[0];
    for (i, &y) in series.iter().enumerate() {
        let x = i as f64 * w / denom;
        let change = y - last;
        last = y;
        let col = if change >= 0.0 {
            theme.candle_up
        } else {
            theme.candle_dn
        };

        let jitter_top: f64 = rng.gen_range(2.0..5.0);
        let jitter_bot: f64 = rng.gen_range(2.0..5.0);
        let wick_top = y - change.abs() * 1.2 - jitter_top * scale;
        let wick_bot = y + change.abs() * 1.2 + jitter_bot * scale;
        canvas.stroke_line(
            (x, wick_top),
            (x, wick_bot),
            wick_width,
            [col[0], col[1], col[2], WICK_ALPHA],
        );

        let body_top = y.min(y - change * 0.8);
        let mut body_bot = y.max(y - change * 0.8);
        if body_bot - body_top < 1.0 {
            body_bot = body_top + 1.0;
        }
        canvas.fill_rect(
            x - slot / 2.0,
            body_top,
            x + slot / 2.0,
            body_bot,
            [col[0], col[1], col[2], BODY_ALPHA],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{OverlayItem, RenderSpec, fallback_templates};

    fn small_template(style: SeriesStyle) -> PatternTemplate {
        PatternTemplate::from_spec(
            "bull_flag",
            RenderSpec {
                series_style: style,
                series_points: 24,
                overlay: vec![OverlayItem::Line {
                    pts: vec![[45.0, 60.0], [95.0, 35.0]],
                    width: 4.0,
                }],
                label: Some("Bull Flag".to_string()),
                confidence: 0.91,
            },
        )
    }

    #[test]
    fn bias_policy_matches_name_keywords() {
        assert_eq!(trend_bias("bull_flag"), 0.15);
        assert_eq!(trend_bias("Ascending_Triangle"), 0.15);
        assert_eq!(trend_bias("cup_handle"), 0.15);
        assert_eq!(trend_bias("bear_flag"), -0.05);
        assert_eq!(trend_bias("descending_triangle"), -0.05);
        assert_eq!(trend_bias("double_top"), 0.0);
    }

    #[test]
    fn canvas_size_follows_scale() {
        assert_eq!(canvas_size(1.0).unwrap(), (320, 240));
        assert_eq!(canvas_size(1.5).unwrap(), (480, 360));
        assert_eq!(canvas_size(4.0).unwrap(), (1280, 960));
        assert!(canvas_size(0.0).is_err());
        assert!(canvas_size(f64::NAN).is_err());
    }

    #[test]
    fn repeated_renders_are_byte_identical() {
        let theme = Theme::neon();
        for style in [SeriesStyle::Line, SeriesStyle::Candles] {
            let tpl = small_template(style);
            let a = render_template(&tpl, &theme, 1.0).unwrap();
            let b = render_template(&tpl, &theme, 1.0).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn render_is_not_blank() {
        let tpl = small_template(SeriesStyle::Candles);
        let pm = render_template(&tpl, &Theme::mono(), 1.0).unwrap();
        assert!(pm.data().iter().any(|&b| b != 0));
    }

    #[test]
    fn fallback_templates_all_render() {
        let theme = Theme::neon();
        for tpl in fallback_templates() {
            render_template(&tpl, &theme, 1.0).unwrap();
        }
    }

    #[test]
    fn single_point_series_renders_without_panic() {
        let tpl = PatternTemplate::from_spec(
            "dot",
            RenderSpec {
                series_points: 1,
                ..RenderSpec::default()
            },
        );
        render_template(&tpl, &Theme::neon(), 1.0).unwrap();
    }
}
