//! Grid and column layouts.
//!
//! Both partition their content box into equal tracks separated by a
//! gutter. Each track is a slot container: grid slots align their children
//! on both axes, column slots stack their children vertically.

use glam::DVec2;
use vellum_core::{ConfigError, Dimension};

use crate::geometry::{Bounds, Frame, Size};
use crate::stack::{align_along, Alignment, Stack};

fn check_number(node: &str, what: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidNumber { node: node.to_string(), what, value })
    }
}

/// Total extent of `count` tracks of `track` px separated by `gutter`.
pub fn tracks_extent(count: usize, track: f64, gutter: f64) -> f64 {
    count as f64 * track + gutter * count.saturating_sub(1) as f64
}

/// Offset of track `index` from the start of the content box.
pub fn track_offset(index: usize, track: f64, gutter: f64) -> f64 {
    index as f64 * (track + gutter)
}

/// Extent of one track.
///
/// A configured size wins; otherwise a known content extent is divided
/// evenly after removing gutters; otherwise the largest natural slot.
pub fn track_extent(
    count: usize,
    gutter: f64,
    configured: Option<f64>,
    known: Option<f64>,
    natural: f64,
) -> f64 {
    if let Some(size) = configured {
        return size;
    }
    match known {
        Some(extent) if count > 0 => {
            ((extent - gutter * count.saturating_sub(1) as f64) / count as f64).max(0.0)
        }
        _ => natural,
    }
}

/// Fixed two-dimensional partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    pub cell_width: Option<f64>,
    pub cell_height: Option<f64>,
    /// Space between neighbouring cells, on both axes
    pub gutter: f64,
    /// Default alignment of every cell
    pub horizontal: Alignment,
    pub vertical: Alignment,
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cell_width: None,
            cell_height: None,
            gutter: 0.0,
            horizontal: Alignment::Start,
            vertical: Alignment::Start,
        }
    }

    pub fn with_cell_size(mut self, width: f64, height: f64) -> Self {
        self.cell_width = Some(width);
        self.cell_height = Some(height);
        self
    }

    pub fn with_gutter(mut self, gutter: f64) -> Self {
        self.gutter = gutter;
        self
    }

    pub fn with_alignment(mut self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    /// Number of tracks along an axis: columns across, rows down.
    pub fn count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Width => self.columns,
            Dimension::Height => self.rows,
        }
    }

    pub fn cell_size(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::Width => self.cell_width,
            Dimension::Height => self.cell_height,
        }
    }

    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }

    pub fn validate(&self, node: &str) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::InvalidGrid {
                node: node.to_string(),
                reason: format!("{} rows by {} columns has no cells", self.rows, self.columns),
            });
        }
        check_number(node, "gutter", self.gutter)?;
        if let Some(width) = self.cell_width {
            check_number(node, "cell width", width)?;
        }
        if let Some(height) = self.cell_height {
            check_number(node, "cell height", height)?;
        }
        Ok(())
    }

    /// Cell origin relative to the content box start.
    pub fn cell_offset(&self, row: usize, column: usize, cell: Size) -> DVec2 {
        DVec2::new(
            track_offset(column, cell.width, self.gutter),
            track_offset(row, cell.height, self.gutter),
        )
    }
}

/// Alignment settings of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub horizontal: Alignment,
    pub vertical: Alignment,
}

impl Cell {
    pub fn new(horizontal: Alignment, vertical: Alignment) -> Self {
        Self { horizontal, vertical }
    }

    /// Natural content size: the largest child on each axis.
    pub fn content_size(&self, children: &[Size]) -> Size {
        children.iter().fold(Size::ZERO, |acc, s| {
            Size::new(acc.width.max(s.width), acc.height.max(s.height))
        })
    }

    /// Border-box origins aligning every frame within `area`.
    pub fn place(&self, area: &Bounds, frames: &[Frame]) -> Vec<DVec2> {
        frames
            .iter()
            .map(|frame| {
                DVec2::new(
                    align_along(Dimension::Width, self.horizontal, area, frame),
                    align_along(Dimension::Height, self.vertical, area, frame),
                )
            })
            .collect()
    }
}

/// Side-by-side vertical stacks of equal width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    pub count: usize,
    pub column_width: Option<f64>,
    /// Space between neighbouring columns
    pub gutter: f64,
    /// Space between children within a column
    pub spacing: f64,
    /// Horizontal alignment of children within their column
    pub alignment: Alignment,
}

impl Columns {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            column_width: None,
            gutter: 0.0,
            spacing: 0.0,
            alignment: Alignment::Start,
        }
    }

    pub fn with_column_width(mut self, width: f64) -> Self {
        self.column_width = Some(width);
        self
    }

    pub fn with_gutter(mut self, gutter: f64) -> Self {
        self.gutter = gutter;
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// The stack each column slot runs.
    pub fn slot_stack(&self) -> Stack {
        Stack::vertical()
            .with_spacing(self.spacing)
            .with_alignment(self.alignment)
    }

    pub fn validate(&self, node: &str) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::InvalidGrid {
                node: node.to_string(),
                reason: "a column layout needs at least one column".to_string(),
            });
        }
        check_number(node, "gutter", self.gutter)?;
        check_number(node, "spacing", self.spacing)?;
        if let Some(width) = self.column_width {
            check_number(node, "column width", width)?;
        }
        Ok(())
    }
}
