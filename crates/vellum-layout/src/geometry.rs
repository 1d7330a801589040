//! Box-model geometry.
//!
//! Every element occupies four nested rectangles: margin, border, padding
//! and content. The border box is the element's nominal size; the other
//! boxes are derived from it through the element's insets.

use glam::DVec2;
use vellum_core::{ConfigError, Dimension, Edges};

/// A point in scene coordinates.
pub type Point = DVec2;

/// Width and height of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along one axis.
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: f64) {
        match dimension {
            Dimension::Width => self.width = value,
            Dimension::Height => self.height = value,
        }
    }

    /// Build a size from main/cross extents.
    pub fn from_axes(main: Dimension, main_extent: f64, cross_extent: f64) -> Self {
        let mut size = Size::ZERO;
        size.set(main, main_extent);
        size.set(main.cross(), cross_extent);
        size
    }

    /// Grow by the given insets.
    pub fn grow(&self, edges: &Edges) -> Size {
        Size::new(self.width + edges.horizontal(), self.height + edges.vertical())
    }

    /// Shrink by the given insets, never below zero.
    pub fn shrink(&self, edges: &Edges) -> Size {
        Size::new(
            (self.width - edges.horizontal()).max(0.0),
            (self.height - edges.vertical()).max(0.0),
        )
    }

    pub fn to_vec(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    /// Top-left corner
    pub x: f64,
    pub y: f64,
    /// Extent of the box
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create bounds from an origin and a size.
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        DVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Leading coordinate along one axis.
    pub fn start(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.x,
            Dimension::Height => self.y,
        }
    }

    /// Extent along one axis.
    pub fn extent(&self, dimension: Dimension) -> f64 {
        self.size().get(dimension)
    }

    /// Coordinate of an alignment line of this box.
    ///
    /// `Left`/`Right` and `Top`/`Bottom` name fixed sides; `Center` is the
    /// midline along `dimension`.
    pub fn line(&self, edge: Edge, dimension: Dimension) -> f64 {
        match edge {
            Edge::Left => self.x,
            Edge::Top => self.y,
            Edge::Right => self.right(),
            Edge::Bottom => self.bottom(),
            Edge::Center => self.start(dimension) + self.extent(dimension) / 2.0,
        }
    }

    /// One of the nine named points of this box.
    pub fn point(&self, name: PointName) -> Point {
        let (fx, fy) = name.fractions();
        DVec2::new(self.x + self.width * fx, self.y + self.height * fy)
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Compute union (bounding box) with another bounds.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Bounds::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Expand outward by the given insets.
    pub fn grow(&self, edges: &Edges) -> Bounds {
        Bounds::new(
            self.x - edges.left,
            self.y - edges.top,
            self.width + edges.horizontal(),
            self.height + edges.vertical(),
        )
    }

    /// Inset by the given edges. Extents are clamped to zero.
    pub fn shrink(&self, edges: &Edges) -> Bounds {
        let size = self.size().shrink(edges);
        Bounds::new(self.x + edges.left, self.y + edges.top, size.width, size.height)
    }

    pub fn translate(&self, delta: DVec2) -> Bounds {
        Bounds::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }
}

/// The four nested boxes of the box model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxKind {
    Margin,
    Border,
    Padding,
    Content,
}

/// Named points of a box: corners, edge midpoints and centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointName {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl PointName {
    pub const ALL: [PointName; 9] = [
        PointName::TopLeft,
        PointName::Top,
        PointName::TopRight,
        PointName::Left,
        PointName::Center,
        PointName::Right,
        PointName::BottomLeft,
        PointName::Bottom,
        PointName::BottomRight,
    ];

    fn fractions(self) -> (f64, f64) {
        match self {
            PointName::TopLeft => (0.0, 0.0),
            PointName::Top => (0.5, 0.0),
            PointName::TopRight => (1.0, 0.0),
            PointName::Left => (0.0, 0.5),
            PointName::Center => (0.5, 0.5),
            PointName::Right => (1.0, 0.5),
            PointName::BottomLeft => (0.0, 1.0),
            PointName::Bottom => (0.5, 1.0),
            PointName::BottomRight => (1.0, 1.0),
        }
    }
}

/// Alignment reference of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
    Center,
}

/// Which point of an element its `position` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Top-left corner of the border box
    #[default]
    TopLeft,
    /// Centre of the border box
    Center,
}

impl Anchor {
    /// Offset from the border-box origin to the anchor point.
    pub fn offset(self, border_box: Size) -> DVec2 {
        match self {
            Anchor::TopLeft => DVec2::ZERO,
            Anchor::Center => border_box.to_vec() / 2.0,
        }
    }
}

/// Margin, border and padding of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxModel {
    pub margin: Edges,
    pub border: Edges,
    pub padding: Edges,
}

impl BoxModel {
    /// Reject negative or non-finite insets.
    pub fn validate(&self, node: &str) -> Result<(), ConfigError> {
        self.margin.validate(node, "margin")?;
        self.border.validate(node, "border")?;
        self.padding.validate(node, "padding")
    }

    /// Border plus padding: the distance from border box to content box.
    pub fn insets(&self) -> Edges {
        self.border.plus(&self.padding)
    }

    /// Border-box size around a content size.
    pub fn border_size(&self, content: Size) -> Size {
        content.grow(&self.insets())
    }

    /// Margin-box size around a border-box size.
    pub fn margin_size(&self, border_box: Size) -> Size {
        border_box.grow(&self.margin)
    }
}

/// The resolved geometry of one element, in unrotated coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    pub border_box: Bounds,
    pub box_model: BoxModel,
}

impl Frame {
    pub fn new(border_box: Bounds, box_model: BoxModel) -> Self {
        Self { border_box, box_model }
    }

    /// A frame whose border box starts at the origin.
    pub fn at_origin(size: Size, box_model: BoxModel) -> Self {
        Self::new(Bounds::new(0.0, 0.0, size.width, size.height), box_model)
    }

    pub fn box_bounds(&self, kind: BoxKind) -> Bounds {
        let model = &self.box_model;
        match kind {
            BoxKind::Margin => self.border_box.grow(&model.margin),
            BoxKind::Border => self.border_box,
            BoxKind::Padding => self.border_box.shrink(&model.border),
            BoxKind::Content => self.border_box.shrink(&model.insets()),
        }
    }

    pub fn point(&self, kind: BoxKind, name: PointName) -> Point {
        self.box_bounds(kind).point(name)
    }

    /// Centre of the content box.
    pub fn center(&self) -> Point {
        self.point(BoxKind::Content, PointName::Center)
    }

    /// The point matched against a layout line.
    ///
    /// Sides use the margin box so margins keep their distance from the
    /// line; `Center` uses the content box.
    pub fn alignment_point(&self, edge: Edge) -> Point {
        match edge {
            Edge::Left => self.point(BoxKind::Margin, PointName::Left),
            Edge::Top => self.point(BoxKind::Margin, PointName::Top),
            Edge::Right => self.point(BoxKind::Margin, PointName::Right),
            Edge::Bottom => self.point(BoxKind::Margin, PointName::Bottom),
            Edge::Center => self.center(),
        }
    }

    pub fn margin_size(&self) -> Size {
        self.box_model.margin_size(self.border_box.size())
    }

    pub fn translate(&self, delta: DVec2) -> Frame {
        Frame::new(self.border_box.translate(delta), self.box_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn card() -> Frame {
        Frame::new(
            Bounds::new(10.0, 20.0, 100.0, 60.0),
            BoxModel {
                margin: Edges::uniform(5.0),
                border: Edges::uniform(2.0),
                padding: Edges::new(3.0, 4.0, 3.0, 4.0),
            },
        )
    }

    #[test]
    fn test_nested_boxes() {
        let frame = card();
        assert_eq!(frame.box_bounds(BoxKind::Margin), Bounds::new(5.0, 15.0, 110.0, 70.0));
        assert_eq!(frame.box_bounds(BoxKind::Border), Bounds::new(10.0, 20.0, 100.0, 60.0));
        assert_eq!(frame.box_bounds(BoxKind::Padding), Bounds::new(12.0, 22.0, 96.0, 56.0));
        assert_eq!(frame.box_bounds(BoxKind::Content), Bounds::new(16.0, 25.0, 88.0, 50.0));
    }

    #[test]
    fn test_named_points() {
        let bounds = Bounds::new(0.0, 0.0, 40.0, 20.0);
        assert_eq!(bounds.point(PointName::TopLeft), DVec2::new(0.0, 0.0));
        assert_eq!(bounds.point(PointName::Bottom), DVec2::new(20.0, 20.0));
        assert_eq!(bounds.point(PointName::Right), DVec2::new(40.0, 10.0));
        assert_eq!(bounds.point(PointName::Center), bounds.center());
        for name in PointName::ALL {
            assert!(bounds.contains(bounds.point(name)));
        }
    }

    #[test]
    fn test_alignment_points() {
        let frame = card();
        assert_eq!(frame.alignment_point(Edge::Left), DVec2::new(5.0, 50.0));
        assert_eq!(frame.alignment_point(Edge::Bottom), DVec2::new(60.0, 85.0));
        assert_eq!(frame.alignment_point(Edge::Center), DVec2::new(60.0, 50.0));
        assert_eq!(
            frame.alignment_point(Edge::Center),
            frame.alignment_point(Edge::Center)
        );
    }

    #[test]
    fn test_zero_area_content_is_degenerate() {
        let frame = Frame::at_origin(
            Size::new(4.0, 4.0),
            BoxModel {
                padding: Edges::uniform(5.0),
                ..Default::default()
            },
        );
        let content = frame.box_bounds(BoxKind::Content);
        assert_eq!(content.width, 0.0);
        assert_eq!(content.height, 0.0);
        assert_eq!(
            frame.point(BoxKind::Content, PointName::TopLeft),
            frame.point(BoxKind::Content, PointName::BottomRight)
        );
    }

    #[test]
    fn test_bounds_line() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bounds.line(Edge::Right, Dimension::Width), 110.0);
        assert_eq!(bounds.line(Edge::Center, Dimension::Width), 60.0);
        assert_eq!(bounds.line(Edge::Center, Dimension::Height), 45.0);
        assert_eq!(bounds.line(Edge::Top, Dimension::Height), 20.0);
    }

    #[test]
    fn test_anchor_offset() {
        let size = Size::new(70.0, 30.0);
        assert_eq!(Anchor::TopLeft.offset(size), DVec2::ZERO);
        assert_eq!(Anchor::Center.offset(size), DVec2::new(35.0, 15.0));
    }

    #[test]
    fn test_box_model_validate() {
        let model = BoxModel {
            border: Edges::new(0.0, 0.0, -1.0, 0.0),
            ..Default::default()
        };
        assert!(matches!(
            model.validate("frame"),
            Err(ConfigError::InvalidInset { inset: "border", side: "bottom", .. })
        ));
    }

    proptest! {
        #[test]
        fn content_box_is_border_box_minus_insets(
            b in 0.0f64..20.0,
            p in 0.0f64..20.0,
            extra_w in 0.0f64..400.0,
            extra_h in 0.0f64..400.0,
        ) {
            let w = 2.0 * b + 2.0 * p + extra_w;
            let h = 2.0 * b + 2.0 * p + extra_h;
            let frame = Frame::at_origin(
                Size::new(w, h),
                BoxModel {
                    margin: Edges::ZERO,
                    border: Edges::uniform(b),
                    padding: Edges::uniform(p),
                },
            );
            let content = frame.box_bounds(BoxKind::Content);
            prop_assert!((content.width - (w - 2.0 * b - 2.0 * p)).abs() < 1e-9);
            prop_assert!((content.height - (h - 2.0 * b - 2.0 * p)).abs() < 1e-9);
        }

        #[test]
        fn content_box_never_negative(
            w in 0.0f64..50.0,
            h in 0.0f64..50.0,
            inset in 0.0f64..100.0,
        ) {
            let frame = Frame::at_origin(
                Size::new(w, h),
                BoxModel {
                    padding: Edges::uniform(inset),
                    ..Default::default()
                },
            );
            let content = frame.box_bounds(BoxKind::Content);
            prop_assert!(content.width >= 0.0);
            prop_assert!(content.height >= 0.0);
        }
    }
}
