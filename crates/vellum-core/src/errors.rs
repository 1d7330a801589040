//! Error types for the Vellum engine.

use crate::types::Dimension;
use thiserror::Error;

/// Top-level error type for the Vellum engine.
#[derive(Debug, Error)]
pub enum VellumError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors detected while building a scene.
///
/// These are raised synchronously by the constructing call and never deferred
/// to render time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{node}: {inset} on the {side} side must be a non-negative number, found {value}")]
    InvalidInset {
        node: String,
        inset: &'static str,
        side: &'static str,
        value: f64,
    },

    #[error("Invalid length '{input}': {reason}")]
    InvalidLength { input: String, reason: String },

    #[error("{node}: invalid {what}: {value}")]
    InvalidNumber {
        node: String,
        what: &'static str,
        value: f64,
    },

    #[error("{node}: {axis} is fixed by both the container size and the cell size")]
    ConflictingSize { node: String, axis: Dimension },

    #[error("{node}: '{value}' is not a hex color")]
    InvalidColor { node: String, value: String },

    #[error("{node}: missing required dimension '{dimension}'")]
    MissingDimension { node: String, dimension: Dimension },

    #[error("{node}: spread needs a fixed {axis}, but the {axis} is auto")]
    SpreadRequiresFixed { node: String, axis: Dimension },

    #[error("{node}: invalid grid: {reason}")]
    InvalidGrid { node: String, reason: String },

    #[error("{node}: every cell is already occupied")]
    GridFull { node: String },

    #[error("{node}: cell ({row}, {column}) is outside the {rows}x{columns} grid")]
    CellOutOfRange {
        node: String,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("Unknown node #{id}")]
    UnknownNode { id: u64 },

    #[error("{node} cannot host children")]
    NotAContainer { node: String },

    #[error("Cannot move {child} into its own descendant {parent}")]
    CyclicParent { child: String, parent: String },

    #[error("Duplicate node name: {name}")]
    DuplicateName { name: String },

    #[error("{node}: the root surface cannot be {action}")]
    RootLocked { node: String, action: &'static str },

    #[error("{node}: grid and column slots cannot be {action}")]
    SlotLocked { node: String, action: &'static str },
}

/// Errors during layout resolution.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("{node}: relative {axis} depends on the auto-sized {axis} of {ancestor}")]
    CyclicAutoSize {
        node: String,
        ancestor: String,
        axis: Dimension,
    },
}

/// Errors during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Failed to format SVG output: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),
}
