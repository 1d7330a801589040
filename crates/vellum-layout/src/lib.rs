//! Layout computation for Vellum diagrams.
//!
//! This crate owns the scene tree and turns it into resolved geometry:
//! every node gets a border-box frame in scene coordinates plus the
//! rotations it inherits.
//!
//! # Architecture
//!
//! 1. **Box model**: margin, border, padding and content boxes per element
//! 2. **Measure**: sizes are derived bottom-up from shapes, fixed sizes and layouts
//! 3. **Place**: stacks, grids and column layouts position their managed children
//! 4. **Transforms**: translations and rotations replayed on top of placement
//!
//! # Example
//!
//! ```
//! use vellum_layout::{Container, NodeSpec, Scene, Shape, Stack};
//!
//! let mut scene = Scene::new(Container::free().with_size(400.0, 300.0))?;
//! let row = scene.add(Container::stack(Stack::horizontal().with_spacing(8.0)))?;
//! let dot = scene.add_to(row, NodeSpec::from(Shape::circle(10.0)).with_name("dot"))?;
//! scene.resolve()?;
//!
//! assert_eq!(scene.center(dot)?.x, 10.0);
//! # Ok::<(), vellum_core::VellumError>(())
//! ```

mod container;
mod element;
mod geometry;
mod grid;
mod paint;
mod resolve;
mod shapes;
mod stack;
mod text;
mod tree;

pub use container::{Container, Layout, SizeMode};
pub use element::{Element, Pivot, Positioning, Rotation, Transform, WorldTransform};
pub use geometry::{Anchor, Bounds, BoxKind, BoxModel, Edge, Frame, Point, PointName, Size};
pub use grid::{track_extent, track_offset, tracks_extent, Cell, Columns, Grid};
pub use paint::{container_paint, Primitive, Style};
pub use shapes::{Positionable, Shape};
pub use stack::{align_along, Alignment, Direction, Stack};
pub use text::{baselines, break_lines, measure_text, TextMetrics, TextStyle};
pub use tree::{Node, NodeId, NodeKind, NodeSpec, Scene, Slot};
