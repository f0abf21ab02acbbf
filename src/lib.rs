//! Deterministic chart-pattern art renderer.
//!
//! Turns a pattern name plus a small JSON template into reproducible
//! PNG artwork: a seeded synthetic price series (line or candlesticks)
//! over a gradient-and-grid background, an annotation overlay of
//! glow-lines, channels and polygons, and a label badge. The same
//! inputs always yield byte-identical pixels, and every density tier
//! is re-rendered at native resolution rather than resampled.

#![forbid(unsafe_code)]

pub mod badge;
pub mod blur;
pub mod error;
pub mod export;
pub mod font;
pub mod glow;
pub mod raster;
pub mod scene;
pub mod seed;
pub mod series;
pub mod template;
pub mod theme;

pub use error::{PatternError, PatternResult};
pub use export::{DensityTable, ExportReport, Provider, export_batch};
pub use raster::Pixmap;
pub use scene::{canvas_size, render_template};
pub use seed::derive_seed;
pub use template::{OverlayItem, PatternTemplate, SeriesStyle, fallback_templates, load_templates};
pub use theme::Theme;
