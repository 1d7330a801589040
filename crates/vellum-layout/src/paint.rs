//! Paint primitives.
//!
//! Primitives are emitted in scene coordinates, before rotations. The
//! exporter wraps them in the owning node's rotation chain.

use vellum_core::{Color, ConfigError};

use crate::geometry::{BoxKind, Frame, Point};

/// Fill and stroke of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

impl Style {
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn is_painted(&self) -> bool {
        self.fill.is_some() || self.stroke.is_some()
    }

    /// Reject a negative or non-finite stroke width and an opacity outside `0..=1`.
    pub fn validate(&self, node: &str) -> Result<(), ConfigError> {
        if !(self.stroke_width.is_finite() && self.stroke_width >= 0.0) {
            return Err(ConfigError::InvalidNumber {
                node: node.to_string(),
                what: "stroke width",
                value: self.stroke_width,
            });
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::InvalidNumber {
                node: node.to_string(),
                what: "opacity",
                value: self.opacity,
            });
        }
        Ok(())
    }
}

/// A drawable shape in scene coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner_radius: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Polygon {
        points: Vec<Point>,
    },
    Text {
        x: f64,
        /// Baseline
        y: f64,
        content: String,
        font_size: f64,
        font_family: String,
    },
}

/// The rectangle a container paints, if any.
///
/// Containers paint only when they carry a fill, a stroke or a border. A
/// border is drawn as a stroke centred inside the border band; without an
/// explicit stroke color it is black.
pub fn container_paint(frame: &Frame, style: &Style) -> Option<(Primitive, Style)> {
    let border = frame.box_model.border;
    let band = border.top.max(border.right).max(border.bottom).max(border.left);
    if !style.is_painted() && band == 0.0 {
        return None;
    }

    let outer = frame.box_bounds(BoxKind::Border);
    if band == 0.0 {
        let rect = Primitive::Rect {
            x: outer.x,
            y: outer.y,
            width: outer.width,
            height: outer.height,
            corner_radius: 0.0,
        };
        return Some((rect, *style));
    }

    let half = band / 2.0;
    let rect = Primitive::Rect {
        x: outer.x + half,
        y: outer.y + half,
        width: (outer.width - band).max(0.0),
        height: (outer.height - band).max(0.0),
        corner_radius: 0.0,
    };
    let style = Style {
        stroke: Some(style.stroke.unwrap_or(Color::BLACK)),
        stroke_width: band,
        ..*style
    };
    Some((rect, style))
}
