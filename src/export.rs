//! Multi-density PNG export.
//!
//! Every (template x density) pair is re-rendered at native resolution
//! rather than resampled, so stroke widths, blur radii and badge
//! proportions are recomputed per tier. Renders are pure and own their
//! buffers, which makes the fan-out across pairs trivially parallel.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{PatternError, PatternResult};
use crate::scene::render_template;
use crate::template::{PatternTemplate, fallback_templates};
use crate::theme::Theme;

/// Named density tiers mapped to scale factors. Injected configuration,
/// not a process-wide table; tests swap in alternate tiers freely.
#[derive(Clone, Debug)]
pub struct DensityTable {
    tiers: BTreeMap<String, f64>,
}

impl DensityTable {
    /// The standard Android tier set.
    pub fn default_tiers() -> Self {
        Self::from_pairs([
            ("mdpi", 1.0),
            ("hdpi", 1.5),
            ("xhdpi", 2.0),
            ("xxhdpi", 3.0),
            ("xxxhdpi", 4.0),
        ])
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            tiers: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn scale_for(&self, density: &str) -> PatternResult<f64> {
        self.tiers.get(density).copied().ok_or_else(|| {
            PatternError::validation(format!("unknown density '{density}'"))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }

    /// Output subdirectory for a tier, following the Android resource
    /// convention: `drawable` for mdpi, `drawable-<density>` otherwise.
    pub fn dir_name(density: &str) -> String {
        if density == "mdpi" {
            "drawable".to_string()
        } else {
            format!("drawable-{density}")
        }
    }
}

/// How pattern art gets produced. Only the local deterministic renderer
/// is implemented; the remote generative variant exists as a
/// configuration point and is rejected when selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    LocalDeterministic,
    RemoteGenerative,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub pattern: String,
    pub density: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct ExportFailure {
    pub pattern: String,
    pub density: String,
    pub error: String,
}

#[derive(Clone, Debug, Default)]
pub struct ExportReport {
    pub written: Vec<Artifact>,
    pub failed: Vec<ExportFailure>,
}

/// Renders and writes one PNG per (template x requested density).
///
/// Unknown density names fail the whole invocation before any pixel is
/// rendered. An empty template slice falls back to the built-in set so
/// the batch always produces artifacts. A write failure is fatal only
/// for its own artifact; the rest of the batch still completes and the
/// failure is reported.
pub fn export_batch(
    templates: &[PatternTemplate],
    theme: &Theme,
    table: &DensityTable,
    densities: &[String],
    out_root: &Path,
    provider: Provider,
) -> PatternResult<ExportReport> {
    if provider == Provider::RemoteGenerative {
        return Err(PatternError::validation(
            "the remote generative provider is not available; use the local deterministic one",
        ));
    }
    if densities.is_empty() {
        return Err(PatternError::validation("no densities requested"));
    }
    let mut scales = Vec::with_capacity(densities.len());
    for d in densities {
        scales.push((d.as_str(), table.scale_for(d)?));
    }

    let fallback;
    let templates = if templates.is_empty() {
        tracing::warn!("no templates found, using built-in fallbacks");
        fallback = fallback_templates();
        &fallback
    } else {
        templates
    };

    let jobs: Vec<(&PatternTemplate, &str, f64)> = templates
        .iter()
        .flat_map(|tpl| scales.iter().map(move |&(d, s)| (tpl, d, s)))
        .collect();

    let results: Vec<Result<Artifact, ExportFailure>> = jobs
        .par_iter()
        .map(|&(tpl, density, scale)| {
            write_artifact(tpl, theme, density, scale, out_root).map_err(|e| ExportFailure {
                pattern: tpl.name.clone(),
                density: density.to_string(),
                error: e.to_string(),
            })
        })
        .collect();

    let mut report = ExportReport::default();
    for r in results {
        match r {
            Ok(artifact) => {
                tracing::info!(path = %artifact.path.display(), "wrote artifact");
                report.written.push(artifact);
            }
            Err(failure) => {
                tracing::warn!(
                    pattern = %failure.pattern,
                    density = %failure.density,
                    error = %failure.error,
                    "artifact export failed"
                );
                report.failed.push(failure);
            }
        }
    }
    report
        .written
        .sort_by(|a, b| (&a.pattern, &a.density).cmp(&(&b.pattern, &b.density)));
    Ok(report)
}

fn write_artifact(
    template: &PatternTemplate,
    theme: &Theme,
    density: &str,
    scale: f64,
    out_root: &Path,
) -> PatternResult<Artifact> {
    let canvas = render_template(template, theme, scale)?;
    let dir = out_root.join(DensityTable::dir_name(density));
    std::fs::create_dir_all(&dir).map_err(|e| {
        PatternError::render(format!("create output dir '{}': {e}", dir.display()))
    })?;
    let path = dir.join(format!("pattern_{}.png", template.name));
    let rgb = canvas.to_rgb8();
    image::save_buffer_with_format(
        &path,
        &rgb,
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .map_err(|e| PatternError::render(format!("write png '{}': {e}", path.display())))?;
    Ok(Artifact {
        pattern: template.name.clone(),
        density: density.to_string(),
        path,
    })
}
