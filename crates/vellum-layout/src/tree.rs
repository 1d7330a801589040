//! The scene tree.
//!
//! A [`Scene`] owns every node of one drawing and is the only way to build,
//! re-parent or remove them. Callers hold [`NodeId`]s; geometry is filled
//! in by [`Scene::resolve`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use glam::DVec2;
use indexmap::IndexMap;
use vellum_core::{Color, ConfigError, ContainerConfig, Dimension, Edges};

use crate::container::{Container, Layout, SizeMode};
use crate::element::{check_finite, Element, Pivot, Positioning, Transform, WorldTransform};
use crate::geometry::{Anchor, Bounds, BoxKind, BoxModel, Edge, Frame, Point, PointName, Size};
use crate::grid::Cell;
use crate::paint::Style;
use crate::shapes::{Positionable, Shape};
use crate::stack::Alignment;

/// Unique identifier for a node within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Shape(Shape),
    /// A leaf shape defined outside this crate
    Custom(Rc<dyn Positionable>),
    Container(Container),
}

impl NodeKind {
    /// The leaf shape, for anything that is not a container.
    pub fn leaf(&self) -> Option<&dyn Positionable> {
        match self {
            NodeKind::Shape(shape) => Some(shape as &dyn Positionable),
            NodeKind::Custom(custom) => Some(custom.as_ref()),
            NodeKind::Container(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Shape(shape) => shape.kind(),
            NodeKind::Custom(custom) => custom.kind(),
            NodeKind::Container(container) => container.layout.kind(),
        }
    }

    fn validate(&self, node: &str) -> Result<(), ConfigError> {
        match self {
            NodeKind::Shape(shape) => shape.validate(node),
            NodeKind::Custom(custom) => custom.validate(node),
            NodeKind::Container(container) => container.validate(node),
        }
    }
}

impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeKind::Shape(a), NodeKind::Shape(b)) => a == b,
            (NodeKind::Custom(a), NodeKind::Custom(b)) => Rc::ptr_eq(a, b),
            (NodeKind::Container(a), NodeKind::Container(b)) => a == b,
            _ => false,
        }
    }
}

/// Position of a generated grid or column slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub row: usize,
    pub column: usize,
}

/// Geometry produced by the last resolution.
#[derive(Debug, Clone, Default)]
pub(crate) struct Resolved {
    /// Border-box size, set by measure
    pub(crate) size: Option<Size>,
    /// Unrotated frame in scene coordinates, set by place
    pub(crate) frame: Option<Frame>,
    pub(crate) world: WorldTransform,
}

/// A node in the scene tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// Optional unique name for debugging
    pub name: Option<String>,
    pub kind: NodeKind,
    pub box_model: BoxModel,
    pub element: Element,
    pub style: Style,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) slot: Option<Slot>,
    pub(crate) resolved: Resolved,
}

impl Node {
    /// Debug name, or `kind#id` for unnamed nodes.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}{}", self.kind_name(), self.id),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }

    pub fn anchor(&self) -> Anchor {
        self.kind.leaf().map_or(Anchor::TopLeft, |leaf| leaf.anchor())
    }

    pub fn container(&self) -> Option<&Container> {
        match &self.kind {
            NodeKind::Container(container) => Some(container),
            NodeKind::Shape(_) | NodeKind::Custom(_) => None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Grid or column slot coordinates, for generated slots.
    pub fn slot(&self) -> Option<Slot> {
        self.slot
    }
}

/// Everything needed to create a node.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub box_model: BoxModel,
    pub style: Style,
    pub z_order: i32,
    /// Initial position, in the node's anchor convention
    pub position: Point,
}

impl NodeSpec {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            box_model: BoxModel::default(),
            style: Style::default(),
            z_order: 0,
            position: DVec2::ZERO,
        }
    }

    /// A leaf shape implemented outside this crate, stroked like the
    /// built-in shapes.
    pub fn custom(shape: impl Positionable + 'static) -> Self {
        Self::from(Rc::new(shape) as Rc<dyn Positionable>)
    }

    /// Build a container from configuration.
    pub fn from_config(config: &ContainerConfig, layout: Layout) -> Result<Self, ConfigError> {
        let label = config.name.clone().unwrap_or_else(|| layout.kind().to_string());
        let container = Container::from_config(config, layout)?;
        Ok(Self {
            name: config.name.clone(),
            box_model: BoxModel {
                margin: config.margin.to_edges(&label, "margin")?,
                border: config.border.to_edges(&label, "border")?,
                padding: config.padding.to_edges(&label, "padding")?,
            },
            ..Self::new(NodeKind::Container(container))
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_margin(mut self, margin: Edges) -> Self {
        self.box_model.margin = margin;
        self
    }

    pub fn with_border(mut self, border: Edges) -> Self {
        self.box_model.border = border;
        self
    }

    pub fn with_padding(mut self, padding: Edges) -> Self {
        self.box_model.padding = padding;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.style.fill = Some(color);
        self
    }

    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.style = self.style.with_stroke(color, width);
        self
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    /// Initial position; only kept by free containers and detached nodes.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = DVec2::new(x, y);
        self
    }

    fn label(&self, id: NodeId) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}{}", self.kind.kind_name(), id),
        }
    }
}

impl From<Shape> for NodeSpec {
    fn from(shape: Shape) -> Self {
        let style = match shape {
            Shape::Text { .. } => Style::default().with_fill(Color::BLACK),
            _ => Style::default().with_stroke(Color::BLACK, 1.0),
        };
        Self {
            style,
            ..Self::new(NodeKind::Shape(shape))
        }
    }
}

impl From<Rc<dyn Positionable>> for NodeSpec {
    fn from(shape: Rc<dyn Positionable>) -> Self {
        Self {
            style: Style::default().with_stroke(Color::BLACK, 1.0),
            ..Self::new(NodeKind::Custom(shape))
        }
    }
}

impl From<Container> for NodeSpec {
    fn from(container: Container) -> Self {
        Self::new(NodeKind::Container(container))
    }
}

/// One drawing: an arena of nodes under a single root container.
#[derive(Debug, Clone)]
pub struct Scene {
    pub(crate) nodes: HashMap<NodeId, Node>,
    names: IndexMap<String, NodeId>,
    pub(crate) root: NodeId,
    next_id: u64,
}

impl Scene {
    /// Create a scene whose root is the given container.
    pub fn new(root: impl Into<NodeSpec>) -> Result<Self, ConfigError> {
        let spec = root.into();
        let label = spec.label(NodeId(0));
        let NodeKind::Container(container) = &spec.kind else {
            return Err(ConfigError::NotAContainer { node: label });
        };
        for dimension in [Dimension::Width, Dimension::Height] {
            if matches!(container.size(dimension), SizeMode::Relative(_)) {
                return Err(ConfigError::MissingDimension { node: label, dimension });
            }
        }

        let mut scene = Self {
            nodes: HashMap::new(),
            names: IndexMap::new(),
            root: NodeId(0),
            next_id: 0,
        };
        scene.root = scene.insert(spec)?;
        Ok(scene)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a node without attaching it anywhere.
    pub fn create(&mut self, spec: impl Into<NodeSpec>) -> Result<NodeId, ConfigError> {
        self.insert(spec.into())
    }

    /// Create a node as the last child of the root.
    pub fn add(&mut self, spec: impl Into<NodeSpec>) -> Result<NodeId, ConfigError> {
        self.add_to(self.root, spec)
    }

    /// Create a node inside `parent`.
    ///
    /// Grids place it in their first empty cell and column layouts in their
    /// least filled column.
    pub fn add_to(&mut self, parent: NodeId, spec: impl Into<NodeSpec>) -> Result<NodeId, ConfigError> {
        let target = self.target_for(parent)?;
        let id = self.insert(spec.into())?;
        self.link(target, id);
        Ok(id)
    }

    /// Move a node, with its subtree, under a new parent.
    pub fn reparent(&mut self, child: NodeId, parent: NodeId) -> Result<(), ConfigError> {
        self.check_movable(child, "re-parented")?;
        let target = self.target_for(parent)?;
        if target == child || self.is_descendant(target, child) {
            return Err(ConfigError::CyclicParent {
                child: self.label(child),
                parent: self.label(target),
            });
        }
        self.unlink(child);
        self.link(target, child);
        Ok(())
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), ConfigError> {
        self.check_movable(id, "removed")?;
        self.unlink(id);

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                if let Some(name) = &node.name {
                    self.names.shift_remove(name);
                }
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    /// Set a node's position and detach it from its parent's layout.
    pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) -> Result<(), ConfigError> {
        let node = self.movable_mut(id, "positioned")?;
        let label = node.label();
        check_finite(&label, "x position", x)?;
        check_finite(&label, "y position", y)?;
        node.element.position = DVec2::new(x, y);
        node.element.detach();
        Ok(())
    }

    /// Append a transform and detach the node from its parent's layout.
    pub fn apply_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), ConfigError> {
        let node = self.movable_mut(id, "transformed")?;
        transform.validate(&node.label())?;
        node.element.transforms.push(transform);
        node.element.detach();
        Ok(())
    }

    pub fn translate(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<(), ConfigError> {
        self.apply_transform(id, Transform::Translate { dx, dy })
    }

    /// Rotate about the content-box centre.
    pub fn rotate(&mut self, id: NodeId, degrees: f64) -> Result<(), ConfigError> {
        self.rotate_about(id, degrees, Pivot::Center)
    }

    pub fn rotate_about(&mut self, id: NodeId, degrees: f64, pivot: Pivot) -> Result<(), ConfigError> {
        self.apply_transform(id, Transform::Rotate { degrees, pivot })
    }

    pub fn set_z_order(&mut self, id: NodeId, z_order: i32) -> Result<(), ConfigError> {
        self.node_mut(id)?.element.z_order = z_order;
        Ok(())
    }

    pub fn set_style(&mut self, id: NodeId, style: Style) -> Result<(), ConfigError> {
        let node = self.node_mut(id)?;
        style.validate(&node.label())?;
        node.style = style;
        Ok(())
    }

    /// The slot at (`row`, `column`) of a grid.
    pub fn cell(&self, grid: NodeId, row: usize, column: usize) -> Result<NodeId, ConfigError> {
        let node = self.node(grid)?;
        let Some(Layout::Grid(layout)) = node.container().map(|c| c.layout) else {
            return Err(ConfigError::InvalidGrid {
                node: node.label(),
                reason: "not a grid".to_string(),
            });
        };
        if row >= layout.rows || column >= layout.columns {
            return Err(ConfigError::CellOutOfRange {
                node: node.label(),
                row,
                column,
                rows: layout.rows,
                columns: layout.columns,
            });
        }
        Ok(node.children[row * layout.columns + column])
    }

    /// The slot of column `index` of a column layout.
    pub fn column(&self, columns: NodeId, index: usize) -> Result<NodeId, ConfigError> {
        let node = self.node(columns)?;
        let Some(Layout::Columns(layout)) = node.container().map(|c| c.layout) else {
            return Err(ConfigError::InvalidGrid {
                node: node.label(),
                reason: "not a column layout".to_string(),
            });
        };
        if index >= layout.count {
            return Err(ConfigError::CellOutOfRange {
                node: node.label(),
                row: 0,
                column: index,
                rows: 1,
                columns: layout.count,
            });
        }
        Ok(node.children[index])
    }

    /// Override the alignment of one grid cell.
    pub fn set_cell_alignment(
        &mut self,
        grid: NodeId,
        row: usize,
        column: usize,
        horizontal: Alignment,
        vertical: Alignment,
    ) -> Result<(), ConfigError> {
        let slot = self.cell(grid, row, column)?;
        if let NodeKind::Container(container) = &mut self.node_mut(slot)?.kind {
            container.layout = Layout::Cell(Cell::new(horizontal, vertical));
        }
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look a node up by its debug name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Named nodes in creation order.
    pub fn named(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.names.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Effective positioning: children of free containers are always absolute.
    pub fn positioning(&self, id: NodeId) -> Option<Positioning> {
        let node = self.nodes.get(&id)?;
        if self.is_managed(id) {
            Some(Positioning::Managed)
        } else if node.parent.is_none() && id != self.root {
            Some(node.element.positioning)
        } else {
            Some(Positioning::Absolute)
        }
    }

    /// Border-box size; `None` until the node has been measured.
    pub fn size(&self, id: NodeId) -> Option<Size> {
        self.nodes.get(&id).and_then(|node| node.resolved.size)
    }

    /// Unrotated frame in scene coordinates; `None` until placed.
    pub fn frame(&self, id: NodeId) -> Option<Frame> {
        self.nodes.get(&id).and_then(|node| node.resolved.frame)
    }

    /// Composed world placement; `None` until placed.
    pub fn world_transform(&self, id: NodeId) -> Option<WorldTransform> {
        let node = self.nodes.get(&id)?;
        node.resolved.frame.map(|_| node.resolved.world.clone())
    }

    /// A named point of one of the node's boxes, rotations applied.
    pub fn point(&self, id: NodeId, kind: BoxKind, name: PointName) -> Result<Point, ConfigError> {
        let (frame, world) = self.geometry(id)?;
        Ok(world.apply(frame.point(kind, name)))
    }

    /// Centre of the content box.
    pub fn center(&self, id: NodeId) -> Result<Point, ConfigError> {
        self.point(id, BoxKind::Content, PointName::Center)
    }

    pub fn alignment_point(&self, id: NodeId, edge: Edge) -> Result<Point, ConfigError> {
        let (frame, world) = self.geometry(id)?;
        Ok(world.apply(frame.alignment_point(edge)))
    }

    /// Nodes in paint order: parents before children, siblings by z-order
    /// with ties kept in insertion order.
    pub fn paint_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            order.push(id);
            let mut children = self.children(id).to_vec();
            children.sort_by_key(|child| self.nodes.get(child).map_or(0, |n| n.element.z_order));
            pending.extend(children.into_iter().rev());
        }
        order
    }

    pub(crate) fn label(&self, id: NodeId) -> String {
        self.nodes
            .get(&id)
            .map_or_else(|| format!("node{id}"), Node::label)
    }

    /// Whether `id` is placed by its parent's layout.
    pub(crate) fn is_managed(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        let parent_manages = node
            .parent
            .and_then(|parent| self.nodes.get(&parent))
            .and_then(Node::container)
            .map_or(false, |container| container.layout.manages_children());
        parent_manages && node.element.is_managed()
    }

    fn geometry(&self, id: NodeId) -> Result<(Frame, WorldTransform), ConfigError> {
        let node = self.node(id)?;
        if let Some(frame) = node.resolved.frame {
            return Ok((frame, node.resolved.world.clone()));
        }

        tracing::warn!(node = %node.label(), "missing geometry: node has not been resolved yet");
        let size = node.resolved.size.unwrap_or(Size::ZERO);
        let origin = node.element.position - node.anchor().offset(size);
        let frame = Frame::new(Bounds::from_origin(origin, size), node.box_model);
        Ok((frame, WorldTransform::default()))
    }

    fn node(&self, id: NodeId) -> Result<&Node, ConfigError> {
        self.nodes.get(&id).ok_or(ConfigError::UnknownNode { id: id.0 })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, ConfigError> {
        self.nodes.get_mut(&id).ok_or(ConfigError::UnknownNode { id: id.0 })
    }

    fn check_movable(&self, id: NodeId, action: &'static str) -> Result<(), ConfigError> {
        let node = self.node(id)?;
        if id == self.root {
            return Err(ConfigError::RootLocked { node: node.label(), action });
        }
        if node.slot.is_some() {
            return Err(ConfigError::SlotLocked { node: node.label(), action });
        }
        Ok(())
    }

    fn movable_mut(&mut self, id: NodeId, action: &'static str) -> Result<&mut Node, ConfigError> {
        self.check_movable(id, action)?;
        self.node_mut(id)
    }

    /// The node that actually receives a child added to `parent`.
    fn target_for(&self, parent: NodeId) -> Result<NodeId, ConfigError> {
        let node = self.node(parent)?;
        let Some(container) = node.container() else {
            return Err(ConfigError::NotAContainer { node: node.label() });
        };
        match container.layout {
            Layout::Grid(_) => node
                .children
                .iter()
                .copied()
                .find(|slot| self.children(*slot).is_empty())
                .ok_or_else(|| ConfigError::GridFull { node: node.label() }),
            Layout::Columns(_) => node
                .children
                .iter()
                .copied()
                .min_by_key(|slot| self.children(*slot).len())
                .ok_or_else(|| ConfigError::InvalidGrid {
                    node: node.label(),
                    reason: "no columns".to_string(),
                }),
            _ => Ok(parent),
        }
    }

    fn is_descendant(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get_mut(&child).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|id| *id != child);
        }
    }

    fn insert(&mut self, spec: NodeSpec) -> Result<NodeId, ConfigError> {
        let id = NodeId(self.next_id);
        let label = spec.label(id);
        spec.box_model.validate(&label)?;
        spec.kind.validate(&label)?;
        spec.style.validate(&label)?;
        check_finite(&label, "x position", spec.position.x)?;
        check_finite(&label, "y position", spec.position.y)?;
        if let Some(name) = &spec.name {
            if self.names.contains_key(name) {
                return Err(ConfigError::DuplicateName { name: name.clone() });
            }
            self.names.insert(name.clone(), id);
        }
        self.next_id += 1;

        let layout = match &spec.kind {
            NodeKind::Container(container) => Some(container.layout),
            NodeKind::Shape(_) | NodeKind::Custom(_) => None,
        };
        self.nodes.insert(
            id,
            Node {
                id,
                name: spec.name,
                kind: spec.kind,
                box_model: spec.box_model,
                element: Element {
                    position: spec.position,
                    z_order: spec.z_order,
                    ..Default::default()
                },
                style: spec.style,
                parent: None,
                children: Vec::new(),
                slot: None,
                resolved: Resolved::default(),
            },
        );

        match layout {
            Some(Layout::Grid(grid)) => {
                for row in 0..grid.rows {
                    for column in 0..grid.columns {
                        let cell = Container::new(Layout::Cell(Cell::new(grid.horizontal, grid.vertical)));
                        self.insert_slot(id, cell, Slot { row, column });
                    }
                }
            }
            Some(Layout::Columns(columns)) => {
                for column in 0..columns.count {
                    self.insert_slot(id, Container::stack(columns.slot_stack()), Slot { row: 0, column });
                }
            }
            _ => {}
        }

        tracing::debug!(node = %label, "created");
        Ok(id)
    }

    fn insert_slot(&mut self, parent: NodeId, container: Container, slot: Slot) {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let node = Node {
            id,
            name: None,
            kind: NodeKind::Container(container),
            box_model: BoxModel::default(),
            element: Element::default(),
            style: Style::default(),
            parent: None,
            children: Vec::new(),
            slot: Some(slot),
            resolved: Resolved::default(),
        };
        self.nodes.insert(id, node);
        self.link(parent, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Columns, Grid};
    use crate::stack::Stack;

    fn scene() -> Scene {
        Scene::new(Container::free().with_size(800.0, 600.0)).unwrap()
    }

    #[test]
    fn test_add_and_find() {
        let mut scene = scene();
        let dot = scene
            .add(NodeSpec::from(Shape::circle(5.0)).with_name("dot"))
            .unwrap();
        assert_eq!(scene.find("dot"), Some(dot));
        assert_eq!(scene.parent(dot), Some(scene.root()));
        assert_eq!(scene.children(scene.root()), &[dot]);
        assert_eq!(scene.get(dot).unwrap().label(), "dot");
    }

    #[test]
    fn test_unnamed_label() {
        let mut scene = scene();
        let id = scene.add(Shape::rect(1.0, 1.0)).unwrap();
        assert_eq!(scene.get(id).unwrap().label(), format!("rect#{}", id.0));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut scene = scene();
        scene.add(NodeSpec::from(Shape::circle(1.0)).with_name("a")).unwrap();
        let err = scene
            .add(NodeSpec::from(Shape::circle(1.0)).with_name("a"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateName { .. }));
        assert_eq!(scene.children(scene.root()).len(), 1);
    }

    #[test]
    fn test_negative_inset_names_node() {
        let mut scene = scene();
        let err = scene
            .add(
                NodeSpec::from(Shape::rect(10.0, 10.0))
                    .with_name("card")
                    .with_padding(Edges::new(0.0, -2.0, 0.0, 0.0)),
            )
            .unwrap_err();
        match err {
            ConfigError::InvalidInset { node, inset, side, .. } => {
                assert_eq!(node, "card");
                assert_eq!(inset, "padding");
                assert_eq!(side, "right");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_root_must_be_fixed_or_auto_container() {
        assert!(matches!(
            Scene::new(Shape::circle(3.0)),
            Err(ConfigError::NotAContainer { .. })
        ));
        assert!(matches!(
            Scene::new(Container::free().with_height(SizeMode::Relative(0.5))),
            Err(ConfigError::MissingDimension { dimension: Dimension::Height, .. })
        ));
    }

    #[test]
    fn test_reparent_is_exclusive() {
        let mut scene = scene();
        let left = scene.add(Container::stack(Stack::vertical())).unwrap();
        let right = scene.add(Container::stack(Stack::vertical())).unwrap();
        let item = scene.add_to(left, Shape::rect(5.0, 5.0)).unwrap();

        scene.reparent(item, right).unwrap();
        assert!(scene.children(left).is_empty());
        assert_eq!(scene.children(right), &[item]);
        assert_eq!(scene.parent(item), Some(right));
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let mut scene = scene();
        let outer = scene.add(Container::stack(Stack::vertical())).unwrap();
        let inner = scene.add_to(outer, Container::stack(Stack::horizontal())).unwrap();
        assert!(matches!(
            scene.reparent(outer, inner),
            Err(ConfigError::CyclicParent { .. })
        ));
        assert!(matches!(
            scene.reparent(outer, outer),
            Err(ConfigError::CyclicParent { .. })
        ));
    }

    #[test]
    fn test_leaf_cannot_host_children() {
        let mut scene = scene();
        let leaf = scene.add(Shape::circle(2.0)).unwrap();
        assert!(matches!(
            scene.add_to(leaf, Shape::circle(1.0)),
            Err(ConfigError::NotAContainer { .. })
        ));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut scene = scene();
        let group = scene
            .add(NodeSpec::from(Container::stack(Stack::vertical())).with_name("group"))
            .unwrap();
        let leaf = scene
            .add_to(group, NodeSpec::from(Shape::circle(1.0)).with_name("leaf"))
            .unwrap();
        scene.remove(group).unwrap();
        assert!(scene.get(leaf).is_none());
        assert_eq!(scene.find("leaf"), None);
        assert!(scene.children(scene.root()).is_empty());
        assert!(matches!(
            scene.remove(scene.root()),
            Err(ConfigError::RootLocked { .. })
        ));
    }

    #[test]
    fn test_create_is_detached() {
        let mut scene = scene();
        let loose = scene.create(Shape::circle(4.0)).unwrap();
        assert_eq!(scene.parent(loose), None);
        assert!(scene.children(scene.root()).is_empty());
        scene.reparent(loose, scene.root()).unwrap();
        assert_eq!(scene.parent(loose), Some(scene.root()));
    }

    #[test]
    fn test_grid_slots_and_auto_flow() {
        let mut scene = scene();
        let grid = scene.add(Container::grid(Grid::new(2, 2))).unwrap();
        assert_eq!(scene.children(grid).len(), 4);

        let mut placed = Vec::new();
        for _ in 0..4 {
            placed.push(scene.add_to(grid, Shape::circle(1.0)).unwrap());
        }
        assert_eq!(scene.parent(placed[2]), Some(scene.cell(grid, 1, 0).unwrap()));
        assert!(matches!(
            scene.add_to(grid, Shape::circle(1.0)),
            Err(ConfigError::GridFull { .. })
        ));
        assert!(matches!(
            scene.cell(grid, 2, 0),
            Err(ConfigError::CellOutOfRange { .. })
        ));

        let slot = scene.cell(grid, 0, 1).unwrap();
        assert_eq!(scene.get(slot).unwrap().slot(), Some(Slot { row: 0, column: 1 }));
        assert!(matches!(scene.remove(slot), Err(ConfigError::SlotLocked { .. })));
        assert!(matches!(
            scene.translate(slot, 1.0, 1.0),
            Err(ConfigError::SlotLocked { .. })
        ));
    }

    #[test]
    fn test_columns_balance_children() {
        let mut scene = scene();
        let columns = scene.add(Container::columns(Columns::new(3))).unwrap();
        let first = scene.add_to(columns, Shape::rect(1.0, 1.0)).unwrap();
        let second = scene.add_to(columns, Shape::rect(1.0, 1.0)).unwrap();
        let column_one = scene.column(columns, 1).unwrap();
        scene.add_to(column_one, Shape::rect(1.0, 1.0)).unwrap();
        let fourth = scene.add_to(columns, Shape::rect(1.0, 1.0)).unwrap();

        assert_eq!(scene.parent(first), Some(scene.column(columns, 0).unwrap()));
        assert_eq!(scene.parent(second), Some(column_one));
        assert_eq!(scene.parent(fourth), Some(scene.column(columns, 2).unwrap()));
    }

    #[test]
    fn test_detaching_operations() {
        let mut scene = scene();
        let stack = scene.add(Container::stack(Stack::vertical())).unwrap();
        let item = scene.add_to(stack, Shape::rect(5.0, 5.0)).unwrap();
        assert_eq!(scene.positioning(item), Some(Positioning::Managed));

        scene.rotate(item, 45.0).unwrap();
        assert_eq!(scene.positioning(item), Some(Positioning::Absolute));
        assert_eq!(scene.get(item).unwrap().element.transforms.len(), 1);

        let free = scene.add(Shape::circle(3.0)).unwrap();
        assert_eq!(scene.positioning(free), Some(Positioning::Absolute));
    }

    #[test]
    fn test_non_finite_placement_rejected() {
        let mut scene = scene();
        let dot = scene
            .add(NodeSpec::from(Shape::circle(5.0)).with_name("dot").at(20.0, 10.0))
            .unwrap();

        assert!(matches!(
            scene.set_position(dot, f64::NAN, 10.0),
            Err(ConfigError::InvalidNumber { node, what: "x position", .. }) if node == "dot"
        ));
        assert!(scene.translate(dot, 0.0, f64::INFINITY).is_err());
        assert!(scene.rotate(dot, f64::NAN).is_err());
        assert!(scene
            .rotate_about(dot, 45.0, Pivot::At(DVec2::new(f64::NEG_INFINITY, 0.0)))
            .is_err());

        let element = &scene.get(dot).unwrap().element;
        assert_eq!(element.position, DVec2::new(20.0, 10.0));
        assert!(element.transforms.is_empty());

        assert!(matches!(
            scene.add(NodeSpec::from(Shape::circle(1.0)).at(0.0, f64::NAN)),
            Err(ConfigError::InvalidNumber { what: "y position", .. })
        ));
    }

    #[test]
    fn test_invalid_style_rejected() {
        let mut scene = scene();
        let card = scene
            .add(NodeSpec::from(Shape::rect(10.0, 10.0)).with_name("card"))
            .unwrap();
        let thick = Style::default().with_stroke(Color::BLACK, 3.0);
        scene.set_style(card, thick).unwrap();

        let negative = Style::default().with_stroke(Color::BLACK, -3.0);
        assert!(matches!(
            scene.set_style(card, negative),
            Err(ConfigError::InvalidNumber { what: "stroke width", .. })
        ));
        assert_eq!(scene.get(card).unwrap().style, thick);
        assert!(scene
            .add(NodeSpec::from(Shape::circle(2.0)).with_stroke(Color::BLACK, f64::NAN))
            .is_err());
    }

    #[derive(Debug)]
    struct Tag;

    impl Positionable for Tag {
        fn size(&self) -> Size {
            Size::new(24.0, 8.0)
        }

        fn render(&self, _frame: &Frame) -> Vec<crate::paint::Primitive> {
            Vec::new()
        }

        fn kind(&self) -> &'static str {
            "tag"
        }
    }

    #[test]
    fn test_custom_leaf_nodes() {
        let mut scene = scene();
        let tag = scene.add(NodeSpec::custom(Tag)).unwrap();
        let node = scene.get(tag).unwrap();
        assert_eq!(node.label(), format!("tag#{}", tag.0));
        assert_eq!(node.anchor(), Anchor::TopLeft);
        assert!(node.container().is_none());
        assert_eq!(node.style.stroke, Some(Color::BLACK));
        assert!(matches!(
            scene.add_to(tag, Shape::circle(1.0)),
            Err(ConfigError::NotAContainer { .. })
        ));
        assert!(matches!(Scene::new(NodeSpec::custom(Tag)), Err(ConfigError::NotAContainer { .. })));
    }

    #[test]
    fn test_paint_order_is_stable_by_z() {
        let mut scene = scene();
        let a = scene.add(Shape::circle(1.0)).unwrap();
        let b = scene.add(NodeSpec::from(Shape::circle(1.0)).with_z_order(-1)).unwrap();
        let c = scene.add(Shape::circle(1.0)).unwrap();
        let d = scene.add(NodeSpec::from(Shape::circle(1.0)).with_z_order(2)).unwrap();
        scene.set_z_order(a, 2).unwrap();
        assert_eq!(scene.paint_order(), vec![scene.root(), b, c, a, d]);
    }

    #[test]
    fn test_query_before_resolve_falls_back() {
        let mut scene = scene();
        let dot = scene.add(NodeSpec::from(Shape::circle(5.0)).at(30.0, 40.0)).unwrap();
        assert_eq!(scene.size(dot), None);
        assert_eq!(scene.center(dot).unwrap(), DVec2::new(30.0, 40.0));
        assert!(matches!(
            scene.center(NodeId(999)),
            Err(ConfigError::UnknownNode { id: 999 })
        ));
    }

    #[test]
    fn test_container_from_json_config() {
        let config: ContainerConfig = serde_json::from_str(
            r#"{ "name": "toolbar", "height": "40px", "padding": { "left": 8, "right": 8 }, "spacing": 4 }"#,
        )
        .unwrap();
        let mut scene = scene();
        let toolbar = scene
            .add(NodeSpec::from_config(&config, Layout::Stack(Stack::horizontal())).unwrap())
            .unwrap();
        let node = scene.get(toolbar).unwrap();
        assert_eq!(scene.find("toolbar"), Some(toolbar));
        assert_eq!(node.box_model.padding, Edges::new(0.0, 8.0, 0.0, 8.0));
        assert_eq!(node.container().unwrap().height, SizeMode::Fixed(40.0));
    }
}
