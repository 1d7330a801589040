//! Configuration surface consumed from callers.
//!
//! Sizes accept `number | "<n>px" | "<n>rem" | "<n>%" | "auto"` and insets
//! accept a uniform value or a four-sided object. Everything is normalized
//! to pixels once, when a node is constructed from the configuration.

use std::str::FromStr;

use crate::errors::ConfigError;
use crate::types::{Edges, Length, LengthUnit};
use crate::units::parse_length;

/// A number or a unit string, as written in configuration.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(untagged)]
pub(crate) enum RawValue {
    Number(f64),
    Text(String),
}

#[cfg(feature = "serde")]
impl TryFrom<RawValue> for Length {
    type Error = ConfigError;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Number(n) => Ok(Length::px(n)),
            RawValue::Text(s) => parse_length(&s),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawValue> for SizeSpec {
    type Error = ConfigError;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Number(n) => Ok(SizeSpec::Length(Length::px(n))),
            RawValue::Text(s) => s.parse(),
        }
    }
}

/// Requested extent of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "RawValue"))]
pub enum SizeSpec {
    /// Computed from the children.
    #[default]
    Auto,
    /// Imposed by the caller.
    Length(Length),
}

impl FromStr for SizeSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(SizeSpec::Auto)
        } else {
            parse_length(s).map(SizeSpec::Length)
        }
    }
}

impl From<f64> for SizeSpec {
    fn from(px: f64) -> Self {
        SizeSpec::Length(Length::px(px))
    }
}

/// Box-model insets: one value for every side, or each side on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum InsetSpec {
    Uniform(Length),
    Sides {
        #[cfg_attr(feature = "serde", serde(default))]
        top: Length,
        #[cfg_attr(feature = "serde", serde(default))]
        right: Length,
        #[cfg_attr(feature = "serde", serde(default))]
        bottom: Length,
        #[cfg_attr(feature = "serde", serde(default))]
        left: Length,
    },
}

impl Default for InsetSpec {
    fn default() -> Self {
        InsetSpec::Uniform(Length::default())
    }
}

impl From<f64> for InsetSpec {
    fn from(px: f64) -> Self {
        InsetSpec::Uniform(Length::px(px))
    }
}

impl InsetSpec {
    /// Normalize to pixel insets, rejecting relative or negative values.
    pub fn to_edges(&self, node: &str, inset: &'static str) -> Result<Edges, ConfigError> {
        let px = |length: &Length| -> Result<f64, ConfigError> {
            if length.unit == LengthUnit::Percent {
                return Err(ConfigError::InvalidLength {
                    input: format!("{}%", length.value),
                    reason: format!("{node}: {inset} cannot be a percentage"),
                });
            }
            Ok(length.to_px(None).unwrap_or(0.0))
        };
        let edges = match self {
            InsetSpec::Uniform(all) => Edges::uniform(px(all)?),
            InsetSpec::Sides { top, right, bottom, left } => {
                Edges::new(px(top)?, px(right)?, px(bottom)?, px(left)?)
            }
        };
        edges.validate(node, inset)?;
        Ok(edges)
    }
}

/// Alignment along one axis. Accepts `left`/`top` and `right`/`bottom` as
/// aliases for `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum AlignmentSpec {
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "left", alias = "top"))]
    Start,
    #[cfg_attr(feature = "serde", serde(alias = "middle"))]
    Center,
    #[cfg_attr(feature = "serde", serde(alias = "right", alias = "bottom"))]
    End,
}

/// Per-container configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase", deny_unknown_fields)
)]
pub struct ContainerConfig {
    /// Debug name, carried into errors and SVG comments
    pub name: Option<String>,
    pub width: SizeSpec,
    pub height: SizeSpec,
    pub padding: InsetSpec,
    pub border: InsetSpec,
    pub margin: InsetSpec,
    /// Space between consecutive stack children
    pub spacing: f64,
    /// Space between grid cells or columns
    pub gutter: f64,
    pub horizontal_alignment: AlignmentSpec,
    pub vertical_alignment: AlignmentSpec,
    /// Distribute stack children evenly along a fixed main axis
    pub spread: bool,
}

/// Configuration of the root drawing surface.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase", deny_unknown_fields)
)]
pub struct ArtboardConfig {
    pub name: Option<String>,
    pub width: SizeSpec,
    pub height: SizeSpec,
    pub padding: InsetSpec,
    /// Background fill as a hex color
    pub background: Option<String>,
}
