use std::fmt;

use serde::Deserialize;

use crate::error::{Result, VizError};

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#rrggbb` string.
    ///
    /// # Errors
    /// Returns [`VizError::InvalidColor`] for anything else.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || VizError::InvalidColor(value.to_string());
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Linear blend towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }
}

impl TryFrom<String> for Rgb {
    type Error = VizError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The kind of signal a particle or connection carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Feed-forward activity and bottom-up state.
    Activation,
    /// Gradients and residual prediction errors.
    Error,
    /// Top-down predictions.
    Prediction,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Activation, Signal::Error, Signal::Prediction];

    /// Stable identifier of the glow filter drawn behind particles of this kind.
    pub const fn glow_id(self) -> &'static str {
        match self {
            Signal::Activation => "glow-act",
            Signal::Error => "glow-err",
            Signal::Prediction => "glow-pred",
        }
    }
}

/// The five named theme colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub activation: Rgb,
    pub error: Rgb,
    pub prediction: Rgb,
    pub neutral: Rgb,
    pub background: Rgb,
}

impl Palette {
    // Fixed chrome colors, not part of the theme.
    pub const NODE_STROKE: Rgb = Rgb::new(0x33, 0x41, 0x55);
    pub const LABEL: Rgb = Rgb::new(0x47, 0x55, 0x69);
    pub const PANEL: Rgb = Rgb::new(0x1e, 0x29, 0x3b);
    pub const GRID_DOT: Rgb = Rgb::new(0x94, 0xa3, 0xb8);

    pub fn signal(&self, signal: Signal) -> Rgb {
        match signal {
            Signal::Activation => self.activation,
            Signal::Error => self.error,
            Signal::Prediction => self.prediction,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            activation: Rgb::new(0x05, 0x96, 0x69),
            error: Rgb::new(0xdc, 0x26, 0x26),
            prediction: Rgb::new(0x25, 0x63, 0xeb),
            neutral: Rgb::new(0x64, 0x74, 0x8b),
            background: Rgb::new(0x0f, 0x17, 0x2a),
        }
    }
}
