//! One-axis stacking.
//!
//! Children are laid out along the main axis in insertion order, each
//! child's leading margin edge at a running cursor. On the cross axis a
//! child's alignment point is matched to the start, centre or end line of
//! the container's content box.

use glam::DVec2;
use vellum_core::{AlignmentSpec, Dimension};

use crate::geometry::{Bounds, Edge, Frame, Size};

/// Direction for stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Left to right
    #[default]
    Horizontal,
    /// Top to bottom
    Vertical,
}

impl Direction {
    pub fn main(self) -> Dimension {
        match self {
            Direction::Horizontal => Dimension::Width,
            Direction::Vertical => Dimension::Height,
        }
    }

    pub fn cross(self) -> Dimension {
        self.main().cross()
    }
}

/// Alignment along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Left or top
    #[default]
    Start,
    Center,
    /// Right or bottom
    End,
}

impl Alignment {
    /// The alignment edge on the given axis.
    pub fn edge(self, dimension: Dimension) -> Edge {
        match (self, dimension) {
            (Alignment::Start, Dimension::Width) => Edge::Left,
            (Alignment::Start, Dimension::Height) => Edge::Top,
            (Alignment::Center, _) => Edge::Center,
            (Alignment::End, Dimension::Width) => Edge::Right,
            (Alignment::End, Dimension::Height) => Edge::Bottom,
        }
    }
}

impl From<AlignmentSpec> for Alignment {
    fn from(spec: AlignmentSpec) -> Self {
        match spec {
            AlignmentSpec::Start => Alignment::Start,
            AlignmentSpec::Center => Alignment::Center,
            AlignmentSpec::End => Alignment::End,
        }
    }
}

fn component(point: DVec2, dimension: Dimension) -> f64 {
    match dimension {
        Dimension::Width => point.x,
        Dimension::Height => point.y,
    }
}

/// Border-box start along `dimension` that puts the frame's alignment
/// point on the matching line of `area`.
///
/// `frame` must sit at the origin.
pub fn align_along(dimension: Dimension, alignment: Alignment, area: &Bounds, frame: &Frame) -> f64 {
    let edge = alignment.edge(dimension);
    area.line(edge, dimension) - component(frame.alignment_point(edge), dimension)
}

/// Stack layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stack {
    pub direction: Direction,
    /// Gap between consecutive children
    pub spacing: f64,
    /// Cross-axis alignment
    pub alignment: Alignment,
    /// Distribute children over a fixed main axis
    pub spread: bool,
}

impl Stack {
    /// Create a horizontal stack layout.
    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
            ..Default::default()
        }
    }

    /// Create a vertical stack layout.
    pub fn vertical() -> Self {
        Self {
            direction: Direction::Vertical,
            ..Default::default()
        }
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_spread(mut self, spread: bool) -> Self {
        self.spread = spread;
        self
    }

    /// Natural content size from the children's margin-box sizes.
    pub fn content_size(&self, children: &[Size]) -> Size {
        let main = self.direction.main();
        let cross = self.direction.cross();
        let gaps = self.spacing * children.len().saturating_sub(1) as f64;
        let main_extent = children.iter().map(|s| s.get(main)).sum::<f64>() + gaps;
        let cross_extent = children.iter().map(|s| s.get(cross)).fold(0.0_f64, f64::max);
        Size::from_axes(main, main_extent, cross_extent)
    }

    /// Border-box origins for `frames` inside the content box `area`.
    ///
    /// Frames must sit at the origin; results are in the same coordinates
    /// as `area`.
    pub fn place(&self, area: &Bounds, frames: &[Frame]) -> Vec<DVec2> {
        let main = self.direction.main();
        let cross = self.direction.cross();
        let extents: Vec<f64> = frames.iter().map(|f| f.margin_size().get(main)).collect();
        let gap = self.gap(area.extent(main), &extents);

        let mut cursor = area.start(main);
        let origins = frames
            .iter()
            .zip(&extents)
            .map(|(frame, extent)| {
                let main_start = cursor + frame.box_model.margin.leading(main);
                cursor += extent + gap;
                let cross_start = align_along(cross, self.alignment, area, frame);
                match main {
                    Dimension::Width => DVec2::new(main_start, cross_start),
                    Dimension::Height => DVec2::new(cross_start, main_start),
                }
            })
            .collect();

        let used = cursor - gap - area.start(main);
        if !frames.is_empty() && used > area.extent(main) + f64::EPSILON {
            tracing::debug!(
                axis = %main,
                used,
                available = area.extent(main),
                "stack content overflows its container"
            );
        }

        origins
    }

    fn gap(&self, available: f64, extents: &[f64]) -> f64 {
        if !self.spread || extents.len() < 2 {
            return self.spacing;
        }
        let total: f64 = extents.iter().sum();
        if available < total {
            tracing::warn!(
                available,
                needed = total,
                "spread children do not fit, falling back to plain stacking"
            );
            return self.spacing;
        }
        (available - total) / (extents.len() - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxModel;
    use proptest::prelude::*;
    use vellum_core::Edges;

    fn plain(width: f64, height: f64) -> Frame {
        Frame::at_origin(Size::new(width, height), BoxModel::default())
    }

    #[test]
    fn test_content_size() {
        let stack = Stack::horizontal().with_spacing(10.0);
        let size = stack.content_size(&[
            Size::new(20.0, 5.0),
            Size::new(30.0, 15.0),
            Size::new(40.0, 10.0),
        ]);
        assert_eq!(size, Size::new(110.0, 15.0));
        assert_eq!(Stack::vertical().content_size(&[]), Size::ZERO);
    }

    #[test]
    fn test_horizontal_place_start() {
        let stack = Stack::horizontal().with_spacing(10.0);
        let area = Bounds::new(20.0, 20.0, 200.0, 100.0);
        let origins = stack.place(&area, &[plain(30.0, 10.0), plain(40.0, 20.0)]);
        assert_eq!(origins, vec![DVec2::new(20.0, 20.0), DVec2::new(60.0, 20.0)]);
    }

    #[test]
    fn test_margins_push_neighbours() {
        let stack = Stack::vertical();
        let area = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let spaced = Frame::at_origin(
            Size::new(10.0, 10.0),
            BoxModel { margin: Edges::uniform(5.0), ..Default::default() },
        );
        let origins = stack.place(&area, &[spaced, plain(10.0, 10.0)]);
        assert_eq!(origins[0], DVec2::new(5.0, 5.0));
        assert_eq!(origins[1], DVec2::new(0.0, 20.0));
    }

    #[test]
    fn test_cross_alignment() {
        let area = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let frames = [plain(10.0, 40.0)];
        let center = Stack::horizontal().with_alignment(Alignment::Center).place(&area, &frames);
        assert_eq!(center[0], DVec2::new(0.0, 30.0));
        let end = Stack::horizontal().with_alignment(Alignment::End).place(&area, &frames);
        assert_eq!(end[0], DVec2::new(0.0, 60.0));
        let vertical_end = Stack::vertical().with_alignment(Alignment::End).place(&area, &frames);
        assert_eq!(vertical_end[0], DVec2::new(90.0, 0.0));
    }

    #[test]
    fn test_center_alignment_uses_content_box() {
        let area = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let lopsided = Frame::at_origin(
            Size::new(20.0, 20.0),
            BoxModel { padding: Edges::new(0.0, 0.0, 0.0, 10.0), ..Default::default() },
        );
        let origins = Stack::vertical()
            .with_alignment(Alignment::Center)
            .place(&area, &[lopsided]);
        // Content box spans x in [10, 20]; its centre lands on x = 50.
        assert_eq!(origins[0], DVec2::new(35.0, 0.0));
    }

    #[test]
    fn test_spread_single_child_sits_at_start() {
        let area = Bounds::new(10.0, 0.0, 300.0, 50.0);
        let origins = Stack::horizontal().with_spread(true).place(&area, &[plain(20.0, 20.0)]);
        assert_eq!(origins[0], DVec2::new(10.0, 0.0));
    }

    #[test]
    fn test_spread_fallback_when_too_small() {
        let area = Bounds::new(0.0, 0.0, 50.0, 50.0);
        let stack = Stack::horizontal().with_spacing(4.0).with_spread(true);
        let origins = stack.place(&area, &[plain(30.0, 10.0), plain(30.0, 10.0)]);
        assert_eq!(origins[1], DVec2::new(34.0, 0.0));
    }

    #[test]
    fn test_alignment_edges() {
        assert_eq!(Alignment::Start.edge(Dimension::Width), Edge::Left);
        assert_eq!(Alignment::End.edge(Dimension::Height), Edge::Bottom);
        assert_eq!(Alignment::Center.edge(Dimension::Height), Edge::Center);
        assert_eq!(Alignment::from(AlignmentSpec::End), Alignment::End);
    }

    proptest! {
        #[test]
        fn spread_gaps_are_equal(
            widths in proptest::collection::vec(1.0f64..50.0, 2..8),
            slack in 0.0f64..500.0,
        ) {
            let total: f64 = widths.iter().sum();
            let available = total + slack;
            let area = Bounds::new(0.0, 0.0, available, 10.0);
            let frames: Vec<Frame> = widths.iter().map(|w| plain(*w, 10.0)).collect();
            let origins = Stack::horizontal().with_spread(true).place(&area, &frames);

            let expected = slack / (widths.len() - 1) as f64;
            for i in 1..origins.len() {
                let gap = origins[i].x - (origins[i - 1].x + widths[i - 1]);
                prop_assert!((gap - expected).abs() < 1e-6);
            }
            let last = origins.len() - 1;
            prop_assert!((origins[last].x + widths[last] - available).abs() < 1e-6);
        }
    }
}
