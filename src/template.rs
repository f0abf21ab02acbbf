//! Pattern template model, JSON schema and on-disk discovery.
//!
//! A template names a chart-pattern archetype and carries a render
//! section: series style and length, an ordered overlay list (paint
//! order; later items draw over earlier ones), a display label and a
//! confidence value. Overlay coordinates are authored against the fixed
//! base canvas and rescaled per density at render time.

use std::path::Path;

use crate::error::{PatternError, PatternResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStyle {
    Line,
    Candles,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverlayItem {
    Line {
        pts: Vec<[f64; 2]>,
        #[serde(default = "default_stroke_width")]
        width: f64,
    },
    Channel {
        pts: Vec<[f64; 2]>,
        #[serde(default = "default_stroke_width")]
        width: f64,
        #[serde(default = "default_channel_offset")]
        offset: f64,
    },
    Polygon {
        pts: Vec<[f64; 2]>,
        #[serde(default = "default_stroke_width")]
        width: f64,
    },
}

impl OverlayItem {
    fn validate(&self, index: usize) -> PatternResult<()> {
        let (pts, width, min_pts, kind) = match self {
            OverlayItem::Line { pts, width } => (pts, *width, 2, "line"),
            OverlayItem::Channel { pts, width, offset } => {
                if !offset.is_finite() {
                    return Err(PatternError::template(format!(
                        "overlay[{index}]: channel offset must be finite"
                    )));
                }
                (pts, *width, 2, "channel")
            }
            OverlayItem::Polygon { pts, width } => (pts, *width, 3, "polygon"),
        };
        if pts.len() < min_pts {
            return Err(PatternError::template(format!(
                "overlay[{index}]: {kind} needs at least {min_pts} points, got {}",
                pts.len()
            )));
        }
        if pts.iter().flatten().any(|v| !v.is_finite()) {
            return Err(PatternError::template(format!(
                "overlay[{index}]: {kind} has non-finite coordinates"
            )));
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(PatternError::template(format!(
                "overlay[{index}]: stroke width must be > 0"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderSpec {
    #[serde(default = "default_series_style")]
    pub series_style: SeriesStyle,
    #[serde(default = "default_series_points")]
    pub series_points: u32,
    #[serde(default)]
    pub overlay: Vec<OverlayItem>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            series_style: default_series_style(),
            series_points: default_series_points(),
            overlay: Vec::new(),
            label: None,
            confidence: default_confidence(),
        }
    }
}

fn default_series_style() -> SeriesStyle {
    SeriesStyle::Candles
}

fn default_series_points() -> u32 {
    120
}

fn default_confidence() -> f64 {
    0.85
}

fn default_stroke_width() -> f64 {
    3.0
}

fn default_channel_offset() -> f64 {
    8.0
}

#[derive(serde::Deserialize)]
struct TemplateFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    render: Option<RenderSpec>,
}

/// A resolved, immutable template. Constructed once, consumed once per
/// (template x density) render.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternTemplate {
    pub name: String,
    pub style: SeriesStyle,
    pub points: u32,
    pub overlay: Vec<OverlayItem>,
    pub label: String,
    pub confidence: f64,
}

impl PatternTemplate {
    pub fn from_spec(name: impl Into<String>, spec: RenderSpec) -> Self {
        let name = name.into();
        let label = spec.label.unwrap_or_else(|| title_case(&name));
        Self {
            name,
            style: spec.series_style,
            points: spec.series_points,
            overlay: spec.overlay,
            label,
            confidence: spec.confidence,
        }
    }

    /// Template with default styling for a bare pattern name.
    pub fn named(name: &str) -> Self {
        Self::from_spec(name, RenderSpec::default())
    }

    pub fn from_json_str(fallback_name: &str, json: &str) -> PatternResult<Self> {
        let file: TemplateFile = serde_json::from_str(json)
            .map_err(|e| PatternError::template(format!("invalid template JSON: {e}")))?;
        let name = file
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());
        let tpl = Self::from_spec(name, file.render.unwrap_or_default());
        tpl.validate()?;
        Ok(tpl)
    }

    pub fn validate(&self) -> PatternResult<()> {
        if self.name.trim().is_empty() {
            return Err(PatternError::template("template name must be non-empty"));
        }
        if self.points == 0 {
            return Err(PatternError::template(format!(
                "template '{}': series_points must be >= 1",
                self.name
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(PatternError::template(format!(
                "template '{}': confidence must be in [0, 1]",
                self.name
            )));
        }
        for (i, item) in self.overlay.iter().enumerate() {
            item.validate(i).map_err(|e| {
                PatternError::template(format!("template '{}': {e}", self.name))
            })?;
        }
        Ok(())
    }
}

/// "bull_flag" -> "Bull Flag".
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reads every `*.json` template in `dir`, sorted by file name.
/// Malformed files are logged and skipped; a missing or empty directory
/// yields an empty list (the caller decides whether to fall back).
pub fn load_templates(dir: &Path) -> PatternResult<Vec<PatternTemplate>> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "template directory missing");
        return Ok(Vec::new());
    }
    let mut paths = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| {
        PatternError::template(format!("cannot read template dir '{}': {e}", dir.display()))
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| {
            PatternError::template(format!("cannot read template dir entry: {e}"))
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut out = Vec::new();
    for path in paths {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| PatternError::template(format!("read '{}': {e}", path.display())))
            .and_then(|json| PatternTemplate::from_json_str(&stem, &json));
        match parsed {
            Ok(tpl) => out.push(tpl),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping bad template");
            }
        }
    }
    Ok(out)
}

/// Built-in templates used whenever discovery comes up empty, so a
/// batch can never produce zero artifacts.
pub fn fallback_templates() -> Vec<PatternTemplate> {
    vec![
        PatternTemplate::from_spec(
            "head_shoulders",
            RenderSpec {
                series_style: SeriesStyle::Line,
                series_points: 140,
                overlay: vec![
                    OverlayItem::Line {
                        pts: vec![[30.0, 130.0], [70.0, 60.0]],
                        width: 4.0,
                    },
                    OverlayItem::Line {
                        pts: vec![[70.0, 60.0], [110.0, 130.0]],
                        width: 4.0,
                    },
                    OverlayItem::Line {
                        pts: vec![[110.0, 130.0], [150.0, 80.0]],
                        width: 4.0,
                    },
                    OverlayItem::Line {
                        pts: vec![[150.0, 80.0], [190.0, 130.0]],
                        width: 4.0,
                    },
                    OverlayItem::Line {
                        pts: vec![[30.0, 150.0], [190.0, 150.0]],
                        width: 2.0,
                    },
                ],
                label: Some("Head & Shoulders".to_string()),
                confidence: 0.88,
            },
        ),
        PatternTemplate::from_spec(
            "bull_flag",
            RenderSpec {
                series_style: SeriesStyle::Candles,
                series_points: 110,
                overlay: vec![
                    OverlayItem::Line {
                        pts: vec![[45.0, 60.0], [95.0, 35.0]],
                        width: 4.0,
                    },
                    OverlayItem::Line {
                        pts: vec![[45.0, 70.0], [95.0, 45.0]],
                        width: 4.0,
                    },
                    OverlayItem::Channel {
                        pts: vec![[95.0, 35.0], [160.0, 60.0]],
                        width: 3.0,
                        offset: 10.0,
                    },
                ],
                label: Some("Bull Flag".to_string()),
                confidence: 0.91,
            },
        ),
        PatternTemplate::from_spec(
            "descending_triangle",
            RenderSpec {
                series_style: SeriesStyle::Candles,
                series_points: 120,
                overlay: vec![
                    OverlayItem::Line {
                        pts: vec![[40.0, 150.0], [180.0, 150.0]],
                        width: 3.0,
                    },
                    OverlayItem::Line {
                        pts: vec![[40.0, 70.0], [180.0, 150.0]],
                        width: 3.0,
                    },
                ],
                label: Some("Descending Triangle".to_string()),
                confidence: 0.83,
            },
        ),
    ]
}
