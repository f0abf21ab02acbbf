//! Named color palettes.
//!
//! A [`Theme`] is a flat, immutable value selected once per batch and
//! passed into every render call. Nothing in the pipeline mutates it,
//! which keeps parallel renders trivially safe.

use crate::error::{PatternError, PatternResult};

pub type Rgb = [u8; 3];
pub type Rgba = [u8; 4];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub bg1: Rgb,
    pub bg2: Rgb,
    pub grid: Rgba,
    pub bull: Rgb,
    pub bear: Rgb,
    pub accent: Rgb,
    pub text: Rgb,
    pub shadow: Rgba,
    pub candle_up: Rgb,
    pub candle_dn: Rgb,
}

impl Theme {
    pub fn neon() -> Self {
        Self {
            bg1: [6, 18, 28],
            bg2: [10, 30, 46],
            grid: [18, 54, 82, 120],
            bull: [0, 200, 255],
            bear: [255, 84, 84],
            accent: [0, 180, 255],
            text: [180, 220, 255],
            shadow: [0, 0, 0, 140],
            candle_up: [0, 220, 170],
            candle_dn: [230, 72, 72],
        }
    }

    pub fn mono() -> Self {
        Self {
            bg1: [15, 15, 18],
            bg2: [25, 25, 28],
            grid: [120, 120, 140, 110],
            bull: [210, 210, 210],
            bear: [180, 180, 180],
            accent: [230, 230, 230],
            text: [235, 235, 240],
            shadow: [0, 0, 0, 150],
            candle_up: [220, 220, 220],
            candle_dn: [160, 160, 160],
        }
    }

    pub fn by_name(name: &str) -> PatternResult<Self> {
        match name {
            "neon" => Ok(Self::neon()),
            "mono" => Ok(Self::mono()),
            other => Err(PatternError::validation(format!(
                "unknown theme '{other}' (expected one of: neon, mono)"
            ))),
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["neon", "mono"]
    }
}
