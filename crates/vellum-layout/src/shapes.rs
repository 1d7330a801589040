//! Leaf shapes.
//!
//! Layouts never look at the concrete shape type. Every leaf reports one
//! natural size and one anchor convention through [`Positionable`], and
//! paints itself into the content box of the frame it was given.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;

use glam::DVec2;
use vellum_core::ConfigError;

use crate::geometry::{Anchor, BoxKind, Frame, Size};
use crate::paint::Primitive;
use crate::text::{baselines, break_lines, measure_text, TextStyle};

/// Capability shared by everything a layout can place.
///
/// Shapes defined outside this crate implement it and join a scene through
/// [`NodeSpec::custom`](crate::NodeSpec::custom).
pub trait Positionable: fmt::Debug {
    /// Natural content size, before border and padding.
    fn size(&self) -> Size;

    /// Which point of the border box `position` refers to.
    fn anchor(&self) -> Anchor {
        Anchor::TopLeft
    }

    /// Paint into the content box of `frame`.
    fn render(&self, frame: &Frame) -> Vec<Primitive>;

    /// Short kind name used in node labels.
    fn kind(&self) -> &'static str {
        "shape"
    }

    /// Reject geometry a layout cannot place.
    fn validate(&self, node: &str) -> Result<(), ConfigError> {
        let size = self.size();
        check_extent(node, "width", size.width)?;
        check_extent(node, "height", size.height)
    }
}

fn check_extent(node: &str, what: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidNumber { node: node.to_string(), what, value })
    }
}

/// The built-in leaf shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        radius: f64,
    },
    Ellipse {
        rx: f64,
        ry: f64,
    },
    Rect {
        width: f64,
        height: f64,
        corner_radius: f64,
    },
    /// Regular polygon inscribed in a circle, first vertex at the top
    Polygon {
        sides: u32,
        radius: f64,
    },
    Text {
        content: String,
        style: TextStyle,
        max_width: Option<f64>,
    },
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Shape::Circle { radius }
    }

    pub fn ellipse(rx: f64, ry: f64) -> Self {
        Shape::Ellipse { rx, ry }
    }

    pub fn rect(width: f64, height: f64) -> Self {
        Shape::Rect { width, height, corner_radius: 0.0 }
    }

    pub fn rounded_rect(width: f64, height: f64, corner_radius: f64) -> Self {
        Shape::Rect { width, height, corner_radius }
    }

    pub fn polygon(sides: u32, radius: f64) -> Self {
        Shape::Polygon { sides, radius }
    }

    pub fn text(content: impl Into<String>, font_size: f64) -> Self {
        Shape::Text {
            content: content.into(),
            style: TextStyle::sized(font_size),
            max_width: None,
        }
    }
}

impl Positionable for Shape {
    fn size(&self) -> Size {
        match self {
            Shape::Circle { radius } => Size::new(2.0 * radius, 2.0 * radius),
            Shape::Ellipse { rx, ry } => Size::new(2.0 * rx, 2.0 * ry),
            Shape::Rect { width, height, .. } => Size::new(*width, *height),
            Shape::Polygon { radius, .. } => Size::new(2.0 * radius, 2.0 * radius),
            Shape::Text { content, style, max_width } => {
                let metrics = measure_text(content, style, *max_width);
                Size::new(metrics.width, metrics.height)
            }
        }
    }

    fn anchor(&self) -> Anchor {
        match self {
            Shape::Circle { .. } | Shape::Ellipse { .. } | Shape::Polygon { .. } => Anchor::Center,
            Shape::Rect { .. } | Shape::Text { .. } => Anchor::TopLeft,
        }
    }

    fn render(&self, frame: &Frame) -> Vec<Primitive> {
        let content = frame.box_bounds(BoxKind::Content);
        let center = content.center();
        match self {
            Shape::Circle { .. } => vec![Primitive::Circle {
                cx: center.x,
                cy: center.y,
                r: content.width.min(content.height) / 2.0,
            }],
            Shape::Ellipse { .. } => vec![Primitive::Ellipse {
                cx: center.x,
                cy: center.y,
                rx: content.width / 2.0,
                ry: content.height / 2.0,
            }],
            Shape::Rect { corner_radius, .. } => vec![Primitive::Rect {
                x: content.x,
                y: content.y,
                width: content.width,
                height: content.height,
                corner_radius: *corner_radius,
            }],
            Shape::Polygon { sides, .. } => {
                let radius = content.width.min(content.height) / 2.0;
                let points = (0..*sides)
                    .map(|i| {
                        let angle = -FRAC_PI_2 + TAU * f64::from(i) / f64::from(*sides);
                        center + DVec2::new(angle.cos(), angle.sin()) * radius
                    })
                    .collect();
                vec![Primitive::Polygon { points }]
            }
            Shape::Text { content: text, style, max_width } => {
                let lines = break_lines(text, style, *max_width);
                let count = lines.len();
                lines
                    .into_iter()
                    .zip(baselines(style, count))
                    .filter(|(line, _)| !line.is_empty())
                    .map(|(line, baseline)| Primitive::Text {
                        x: content.x,
                        y: content.y + baseline,
                        content: line,
                        font_size: style.font_size,
                        font_family: style.font_family.clone(),
                    })
                    .collect()
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "circle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Rect { .. } => "rect",
            Shape::Polygon { .. } => "polygon",
            Shape::Text { .. } => "text",
        }
    }

    /// Reject negative or non-finite dimensions.
    fn validate(&self, node: &str) -> Result<(), ConfigError> {
        let check = |what: &'static str, value: f64| check_extent(node, what, value);
        match self {
            Shape::Circle { radius } => check("radius", *radius),
            Shape::Ellipse { rx, ry } => {
                check("rx", *rx)?;
                check("ry", *ry)
            }
            Shape::Rect { width, height, corner_radius } => {
                check("width", *width)?;
                check("height", *height)?;
                check("corner radius", *corner_radius)
            }
            Shape::Polygon { sides, radius } => {
                if *sides < 3 {
                    return Err(ConfigError::InvalidNumber {
                        node: node.to_string(),
                        what: "polygon sides (at least 3)",
                        value: f64::from(*sides),
                    });
                }
                check("radius", *radius)
            }
            Shape::Text { style, max_width, .. } => {
                check("font size", style.font_size)?;
                check("line height", style.line_height)?;
                // negative spacing may shrink glyphs to nothing, never below
                if !style.letter_spacing.is_finite() || style.advance() < 0.0 {
                    return Err(ConfigError::InvalidNumber {
                        node: node.to_string(),
                        what: "letter spacing",
                        value: style.letter_spacing,
                    });
                }
                match max_width {
                    Some(width) => check("max width", *width),
                    None => Ok(()),
                }
            }
        }
    }
}
