//! Two-phase resolution: measure bottom-up, then place top-down.
//!
//! Measure derives every border-box size from fixed sizes, relative sizes
//! and the natural content size of each layout. Place assigns scene
//! coordinates from the sizes alone, so measuring never depends on
//! anything Place produces.

use glam::DVec2;
use vellum_core::{Dimension, Edges, LayoutError};

use crate::container::{Container, Layout, SizeMode};
use crate::element::Rotation;
use crate::geometry::{Bounds, BoxKind, Frame, Size};
use crate::grid::{track_extent, track_offset, tracks_extent, Columns, Grid};
use crate::tree::{NodeId, NodeKind, Resolved, Scene};

/// An axis extent as seen by a child during measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Extent {
    Known(f64),
    /// Decided by the auto-sized container that owns it
    Pending(NodeId),
}

impl Extent {
    fn known(self) -> Option<f64> {
        match self {
            Extent::Known(value) => Some(value),
            Extent::Pending(_) => None,
        }
    }
}

/// Content-box extents a container offers its children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Available {
    width: Extent,
    height: Extent,
}

impl Available {
    fn pending(owner: NodeId) -> Self {
        Self {
            width: Extent::Pending(owner),
            height: Extent::Pending(owner),
        }
    }

    fn new(owner: NodeId, width: Option<f64>, height: Option<f64>) -> Self {
        let extent = |value: Option<f64>| value.map_or(Extent::Pending(owner), Extent::Known);
        Self {
            width: extent(width),
            height: extent(height),
        }
    }

    fn get(&self, dimension: Dimension) -> Extent {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }
}

impl Scene {
    /// Measure and place every attached node.
    ///
    /// Idempotent: without intervening mutation, repeated calls produce
    /// identical geometry.
    pub fn resolve(&mut self) -> Result<(), LayoutError> {
        let span = tracing::debug_span!("resolve", nodes = self.nodes.len());
        let _enter = span.enter();

        for node in self.nodes.values_mut() {
            node.resolved = Resolved::default();
        }

        let root = self.root;
        self.measure(root, Available::pending(root))?;
        self.place(root, DVec2::ZERO, &[]);
        self.fit_root();
        Ok(())
    }

    fn measure(&mut self, id: NodeId, available: Available) -> Result<Size, LayoutError> {
        let Some(node) = self.nodes.get(&id) else {
            return Ok(Size::ZERO);
        };
        let box_model = node.box_model;
        let container = match &node.kind {
            NodeKind::Container(container) => *container,
            kind => {
                let natural = kind.leaf().map_or(Size::ZERO, |leaf| leaf.size());
                let size = box_model.border_size(natural);
                self.store_size(id, size);
                return Ok(size);
            }
        };

        let width = self.own_extent(id, container.width, available, Dimension::Width)?;
        let height = self.own_extent(id, container.height, available, Dimension::Height)?;
        let insets = box_model.insets();
        let inner = Available::new(
            id,
            width.map(|w| (w - insets.horizontal()).max(0.0)),
            height.map(|h| (h - insets.vertical()).max(0.0)),
        );

        let content = self.measure_content(id, &container, inner, &insets)?;
        let size = Size::new(
            width.unwrap_or(content.width + insets.horizontal()),
            height.unwrap_or(content.height + insets.vertical()),
        );
        tracing::debug!(
            node = %self.label(id),
            width = size.width,
            height = size.height,
            "measured"
        );
        self.store_size(id, size);
        Ok(size)
    }

    fn own_extent(
        &self,
        id: NodeId,
        mode: SizeMode,
        available: Available,
        axis: Dimension,
    ) -> Result<Option<f64>, LayoutError> {
        match mode {
            SizeMode::Fixed(px) => Ok(Some(px)),
            SizeMode::Auto => Ok(None),
            SizeMode::Relative(fraction) => match available.get(axis) {
                Extent::Known(extent) => Ok(Some(extent * fraction)),
                Extent::Pending(owner) => Err(LayoutError::CyclicAutoSize {
                    node: self.label(id),
                    ancestor: self.label(owner),
                    axis,
                }),
            },
        }
    }

    /// Natural content size of a container's layout, measuring its children.
    fn measure_content(
        &mut self,
        id: NodeId,
        container: &Container,
        inner: Available,
        insets: &Edges,
    ) -> Result<Size, LayoutError> {
        let children = self.children(id).to_vec();
        match container.layout {
            Layout::Free => {
                let mut far = DVec2::ZERO;
                for child in children {
                    let size = self.measure(child, inner)?;
                    let Some(node) = self.nodes.get(&child) else {
                        continue;
                    };
                    let start = node.element.position - node.anchor().offset(size)
                        + node.element.translation();
                    let margin_box = Bounds::from_origin(start, size).grow(&node.box_model.margin);
                    far = far.max(DVec2::new(margin_box.right(), margin_box.bottom()));
                }
                Ok(Size::new(
                    (far.x - insets.left).max(0.0),
                    (far.y - insets.top).max(0.0),
                ))
            }
            Layout::Stack(stack) => {
                let sizes = self.measure_managed(&children, inner)?;
                Ok(stack.content_size(&sizes))
            }
            Layout::Cell(cell) => {
                let sizes = self.measure_managed(&children, inner)?;
                Ok(cell.content_size(&sizes))
            }
            Layout::Grid(grid) => self.measure_grid(id, &grid, &children, inner),
            Layout::Columns(columns) => self.measure_columns(id, &columns, &children, inner),
        }
    }

    /// Measure every child; return the margin-box sizes of the managed ones.
    fn measure_managed(&mut self, children: &[NodeId], inner: Available) -> Result<Vec<Size>, LayoutError> {
        let mut sizes = Vec::with_capacity(children.len());
        for &child in children {
            let size = self.measure(child, inner)?;
            if self.is_managed(child) {
                if let Some(node) = self.nodes.get(&child) {
                    sizes.push(node.box_model.margin_size(size));
                }
            }
        }
        Ok(sizes)
    }

    /// Natural border-box size of a slot offered `width` and `height`.
    fn measure_slot(
        &mut self,
        owner: NodeId,
        slot: NodeId,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<Size, LayoutError> {
        let Some(node) = self.nodes.get(&slot) else {
            return Ok(Size::ZERO);
        };
        let insets = node.box_model.insets();
        let Some(container) = node.container().copied() else {
            return Ok(Size::ZERO);
        };
        let inner = Available::new(
            owner,
            width.map(|w| (w - insets.horizontal()).max(0.0)),
            height.map(|h| (h - insets.vertical()).max(0.0)),
        );
        let content = self.measure_content(slot, &container, inner, &insets)?;
        Ok(content.grow(&insets))
    }

    fn measure_grid(
        &mut self,
        id: NodeId,
        grid: &Grid,
        slots: &[NodeId],
        inner: Available,
    ) -> Result<Size, LayoutError> {
        let known = |axis: Dimension| {
            grid.cell_size(axis).or_else(|| {
                inner
                    .get(axis)
                    .known()
                    .map(|extent| track_extent(grid.count(axis), grid.gutter, None, Some(extent), 0.0))
            })
        };
        let (known_width, known_height) = (known(Dimension::Width), known(Dimension::Height));

        let mut natural = Size::ZERO;
        for &slot in slots {
            let size = self.measure_slot(id, slot, known_width, known_height)?;
            natural = Size::new(natural.width.max(size.width), natural.height.max(size.height));
        }

        let cell = Size::new(
            known_width.unwrap_or(natural.width),
            known_height.unwrap_or(natural.height),
        );
        for &slot in slots {
            self.store_size(slot, cell);
        }
        tracing::debug!(
            node = %self.label(id),
            cell_width = cell.width,
            cell_height = cell.height,
            "grid cells"
        );

        Ok(Size::new(
            tracks_extent(grid.columns, cell.width, grid.gutter),
            tracks_extent(grid.rows, cell.height, grid.gutter),
        ))
    }

    fn measure_columns(
        &mut self,
        id: NodeId,
        columns: &Columns,
        slots: &[NodeId],
        inner: Available,
    ) -> Result<Size, LayoutError> {
        let known_width = columns.column_width.or_else(|| {
            inner
                .width
                .known()
                .map(|extent| track_extent(columns.count, columns.gutter, None, Some(extent), 0.0))
        });
        let known_height = inner.height.known();

        let mut natural = Size::ZERO;
        for &slot in slots {
            let size = self.measure_slot(id, slot, known_width, known_height)?;
            natural = Size::new(natural.width.max(size.width), natural.height.max(size.height));
        }

        let column = Size::new(
            known_width.unwrap_or(natural.width),
            known_height.unwrap_or(natural.height),
        );
        for &slot in slots {
            self.store_size(slot, column);
        }

        Ok(Size::new(
            tracks_extent(columns.count, column.width, columns.gutter),
            column.height,
        ))
    }

    fn store_size(&mut self, id: NodeId, size: Size) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.resolved.size = Some(size);
        }
    }

    /// Place a node whose border box starts at `origin` before its own
    /// transforms, then its children.
    fn place(&mut self, id: NodeId, origin: DVec2, parent_rotations: &[Rotation]) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let size = node.resolved.size.unwrap_or(Size::ZERO);
        let placed = Frame::new(Bounds::from_origin(origin, size), node.box_model);
        let world = node.element.compose(&placed, parent_rotations);
        node.resolved.frame = Some(placed.translate(world.origin - origin));
        node.resolved.world = world.clone();

        let NodeKind::Container(container) = node.kind.clone() else {
            return;
        };
        let area = Frame::at_origin(size, node.box_model).box_bounds(BoxKind::Content);
        let children = node.children.clone();

        let managed: Vec<NodeId> = children.iter().copied().filter(|c| self.is_managed(*c)).collect();
        let frames: Vec<Frame> = managed.iter().map(|c| self.local_frame(*c)).collect();
        let origins: Vec<DVec2> = match container.layout {
            Layout::Free => Vec::new(),
            Layout::Stack(stack) => stack.place(&area, &frames),
            Layout::Cell(cell) => cell.place(&area, &frames),
            Layout::Grid(grid) => managed
                .iter()
                .zip(&frames)
                .map(|(slot, frame)| {
                    let (row, column) = self.slot_coordinates(*slot);
                    area.origin() + grid.cell_offset(row, column, frame.border_box.size())
                })
                .collect(),
            Layout::Columns(columns) => managed
                .iter()
                .zip(&frames)
                .map(|(slot, frame)| {
                    let (_, column) = self.slot_coordinates(*slot);
                    let offset = track_offset(column, frame.border_box.width, columns.gutter);
                    area.origin() + DVec2::new(offset, 0.0)
                })
                .collect(),
        };

        let mut managed_origins = managed.iter().copied().zip(origins).peekable();
        for child in children {
            let assigned = managed_origins.next_if(|(managed_id, _)| *managed_id == child);
            let local = if let Some((_, local)) = assigned {
                if let Some(node) = self.nodes.get_mut(&child) {
                    let size = node.resolved.size.unwrap_or(Size::ZERO);
                    node.element.position = local + node.anchor().offset(size);
                }
                local
            } else {
                let Some(node) = self.nodes.get(&child) else {
                    continue;
                };
                let size = node.resolved.size.unwrap_or(Size::ZERO);
                node.element.position - node.anchor().offset(size)
            };
            self.place(child, world.origin + local, &world.rotations);
        }
    }

    fn local_frame(&self, id: NodeId) -> Frame {
        self.nodes.get(&id).map_or_else(Frame::default, |node| {
            Frame::at_origin(node.resolved.size.unwrap_or(Size::ZERO), node.box_model)
        })
    }

    fn slot_coordinates(&self, id: NodeId) -> (usize, usize) {
        self.nodes
            .get(&id)
            .and_then(|node| node.slot())
            .map_or((0, 0), |slot| (slot.row, slot.column))
    }

    /// Grow auto axes of the root to cover every placed descendant.
    fn fit_root(&mut self) {
        let root = self.root;
        let Some(node) = self.nodes.get(&root) else {
            return;
        };
        let Some(container) = node.container().copied() else {
            return;
        };
        if !container.width.is_auto() && !container.height.is_auto() {
            return;
        }
        let insets = node.box_model.insets();
        let mut size = node.resolved.size.unwrap_or(Size::ZERO);

        let mut min = DVec2::ZERO;
        let mut max = DVec2::ZERO;
        for (id, node) in &self.nodes {
            if *id == root {
                continue;
            }
            let Some(frame) = node.resolved.frame else {
                continue;
            };
            let margin_box = frame.box_bounds(BoxKind::Margin);
            for corner in [
                margin_box.origin(),
                DVec2::new(margin_box.right(), margin_box.y),
                DVec2::new(margin_box.x, margin_box.bottom()),
                DVec2::new(margin_box.right(), margin_box.bottom()),
            ] {
                let point = node.resolved.world.apply(corner);
                min = min.min(point);
                max = max.max(point);
            }
        }

        if container.width.is_auto() {
            size.width = size.width.max(max.x + insets.right);
        }
        if container.height.is_auto() {
            size.height = size.height.max(max.y + insets.bottom);
        }
        if min.x < 0.0 || min.y < 0.0 {
            tracing::warn!(
                min_x = min.x,
                min_y = min.y,
                "content extends past the top-left corner of the canvas"
            );
        }

        if let Some(node) = self.nodes.get_mut(&root) {
            node.resolved.size = Some(size);
            if let Some(frame) = node.resolved.frame.as_mut() {
                frame.border_box.width = size.width;
                frame.border_box.height = size.height;
            }
        }
    }
}
