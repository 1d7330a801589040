//! Transformable elements.
//!
//! An element carries one position, an ordered list of transforms and a
//! z-order. Transforms are replayed at resolution time on top of the
//! position a layout assigned; no matrix is baked into the element.

use glam::{DAffine2, DVec2};
use smallvec::SmallVec;
use vellum_core::ConfigError;

use crate::geometry::{BoxKind, Frame, Point, PointName};

/// Whether a layout may move the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Positioning {
    /// Placed by the parent's layout on every resolution
    #[default]
    Managed,
    /// Keeps its own position; the parent's layout ignores it
    Absolute,
}

/// Centre of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Pivot {
    /// Centre of the element's content box
    #[default]
    Center,
    /// A named point of one of the element's boxes
    Named(BoxKind, PointName),
    /// A fixed point in scene coordinates
    At(Point),
}

/// A single transform step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate { dx: f64, dy: f64 },
    Rotate { degrees: f64, pivot: Pivot },
}

impl Transform {
    /// Reject non-finite offsets, angles and pivots.
    pub fn validate(&self, node: &str) -> Result<(), ConfigError> {
        match *self {
            Transform::Translate { dx, dy } => {
                check_finite(node, "translation dx", dx)?;
                check_finite(node, "translation dy", dy)
            }
            Transform::Rotate { degrees, pivot } => {
                check_finite(node, "rotation angle", degrees)?;
                if let Pivot::At(point) = pivot {
                    check_finite(node, "pivot x", point.x)?;
                    check_finite(node, "pivot y", point.y)?;
                }
                Ok(())
            }
        }
    }
}

pub(crate) fn check_finite(node: &str, what: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidNumber { node: node.to_string(), what, value })
    }
}

/// A rotation with its pivot resolved to scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f64,
    pub pivot: Point,
}

impl Rotation {
    pub fn affine(&self) -> DAffine2 {
        DAffine2::from_translation(self.pivot)
            * DAffine2::from_angle(self.degrees.to_radians())
            * DAffine2::from_translation(-self.pivot)
    }
}

/// Composed world placement of an element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldTransform {
    /// Unrotated border-box origin after every translation
    pub origin: Point,
    /// Rotations in application order, the element's own first and the
    /// outermost ancestor's last
    pub rotations: SmallVec<[Rotation; 2]>,
}

impl WorldTransform {
    pub fn affine(&self) -> DAffine2 {
        self.rotations
            .iter()
            .fold(DAffine2::IDENTITY, |acc, rotation| rotation.affine() * acc)
    }

    /// Map an unrotated scene point to its final position.
    pub fn apply(&self, point: Point) -> Point {
        if self.rotations.is_empty() {
            return point;
        }
        self.affine().transform_point2(point)
    }

    pub fn is_rotated(&self) -> bool {
        !self.rotations.is_empty()
    }
}

/// Identity, position and transforms shared by every node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Parent-local anchor point, relative to the parent's border-box origin
    pub position: Point,
    pub transforms: SmallVec<[Transform; 2]>,
    /// Paint order; equal values paint in insertion order
    pub z_order: i32,
    pub positioning: Positioning,
}

impl Element {
    pub fn is_managed(&self) -> bool {
        self.positioning == Positioning::Managed
    }

    /// Stop participating in the parent's layout. One-way.
    pub fn detach(&mut self) {
        self.positioning = Positioning::Absolute;
    }

    /// Sum of every translation in the transform list.
    pub fn translation(&self) -> DVec2 {
        self.transforms.iter().fold(DVec2::ZERO, |sum, transform| match *transform {
            Transform::Translate { dx, dy } => sum + DVec2::new(dx, dy),
            Transform::Rotate { .. } => sum,
        })
    }

    /// Replay the transform list over a placed frame.
    ///
    /// `placed` is the border box the layout assigned, in scene coordinates;
    /// `parent` holds the rotations inherited from the ancestors.
    pub fn compose(&self, placed: &Frame, parent: &[Rotation]) -> WorldTransform {
        let mut offset = DVec2::ZERO;
        let mut own: SmallVec<[Rotation; 2]> = SmallVec::new();

        for transform in &self.transforms {
            match *transform {
                Transform::Translate { dx, dy } => {
                    let delta = DVec2::new(dx, dy);
                    offset += delta;
                    for rotation in own.iter_mut() {
                        rotation.pivot += delta;
                    }
                }
                Transform::Rotate { degrees, pivot } => {
                    let moved = placed.translate(offset);
                    let pivot = match pivot {
                        Pivot::Center => apply_all(&own, moved.center()),
                        Pivot::Named(kind, name) => apply_all(&own, moved.point(kind, name)),
                        Pivot::At(point) => point,
                    };
                    own.push(Rotation { degrees, pivot });
                }
            }
        }

        own.extend(parent.iter().copied());
        WorldTransform {
            origin: placed.border_box.origin() + offset,
            rotations: own,
        }
    }
}

fn apply_all(rotations: &[Rotation], point: Point) -> Point {
    rotations
        .iter()
        .fold(point, |p, rotation| rotation.affine().transform_point2(p))
}
