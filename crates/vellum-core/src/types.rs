//! Core value types for the Vellum engine.

use std::fmt;

use crate::errors::ConfigError;

/// Pixels per `rem`; unit strings are normalized against this once, at construction.
pub const REM_PX: f64 = 16.0;

/// A length value with unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(try_from = "crate::config::RawValue")
)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn px(value: f64) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    pub fn rem(value: f64) -> Self {
        Self { value, unit: LengthUnit::Rem }
    }

    pub fn percent(value: f64) -> Self {
        Self { value, unit: LengthUnit::Percent }
    }

    /// Convert to pixels (assuming 96 DPI for physical units).
    ///
    /// Percentages need the parent extent and yield `None` without one.
    pub fn to_px(&self, parent_px: Option<f64>) -> Option<f64> {
        match self.unit {
            LengthUnit::Px => Some(self.value),
            LengthUnit::Pt => Some(self.value * 96.0 / 72.0),
            LengthUnit::Mm => Some(self.value * 96.0 / 25.4),
            LengthUnit::Cm => Some(self.value * 96.0 / 2.54),
            LengthUnit::In => Some(self.value * 96.0),
            LengthUnit::Rem => Some(self.value * REM_PX),
            LengthUnit::Percent => parent_px.map(|p| p * self.value / 100.0),
        }
    }

    /// Whether this length is relative to its parent.
    pub fn is_relative(&self) -> bool {
        self.unit == LengthUnit::Percent
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::px(0.0)
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Length::px(value)
    }
}

/// Length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Pixels (screen units)
    Px,
    /// Points (1/72 inch)
    Pt,
    /// Millimeters
    Mm,
    /// Centimeters
    Cm,
    /// Inches
    In,
    /// Root font size multiples
    Rem,
    /// Percentage of the parent's content box
    Percent,
}

/// One of the two layout axes, named by the extent it measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    /// The other axis.
    pub fn cross(self) -> Self {
        match self {
            Dimension::Width => Dimension::Height,
            Dimension::Height => Dimension::Width,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => f.write_str("width"),
            Dimension::Height => f.write_str("height"),
        }
    }
}

/// Four independent edge insets, used for margin, border and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub const ZERO: Self = Self { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };

    /// Create insets with explicit values for each side.
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Create uniform insets.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create symmetric insets.
    pub fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Total horizontal inset.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical inset.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Total inset along one axis.
    pub fn along(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.horizontal(),
            Dimension::Height => self.vertical(),
        }
    }

    /// Leading inset along one axis (left or top).
    pub fn leading(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.left,
            Dimension::Height => self.top,
        }
    }

    /// Trailing inset along one axis (right or bottom).
    pub fn trailing(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.right,
            Dimension::Height => self.bottom,
        }
    }

    /// Side-wise sum.
    pub fn plus(&self, other: &Edges) -> Edges {
        Edges {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Reject negative or non-finite insets.
    pub fn validate(&self, node: &str, inset: &'static str) -> Result<(), ConfigError> {
        let sides = [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ];
        for (side, value) in sides {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidInset {
                    node: node.to_string(),
                    inset,
                    side,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A color value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create from hex string (e.g., "#FF5733" or "FF5733").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Self::from_rgb8(r, g, b))
        } else if hex.len() == 8 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
            Some(Self::rgba(
                r as f32 / 255.0,
                g as f32 / 255.0,
                b as f32 / 255.0,
                a as f32 / 255.0,
            ))
        } else {
            None
        }
    }

    /// Convert to 8-bit RGBA tuple.
    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        )
    }

    // Common colors
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
