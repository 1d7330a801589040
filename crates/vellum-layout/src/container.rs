//! Containers: sizing modes and the layout each container runs.

use vellum_core::{ConfigError, ContainerConfig, Dimension, LengthUnit, SizeSpec};

use crate::grid::{Cell, Columns, Grid};
use crate::stack::{Alignment, Stack};

/// How a container's extent along one axis is decided.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SizeMode {
    /// Border-box extent imposed by the caller
    Fixed(f64),
    /// Fraction of the parent's content-box extent
    Relative(f64),
    /// Derived from the children
    #[default]
    Auto,
}

impl SizeMode {
    /// Normalize a configured size.
    pub fn from_spec(node: &str, spec: &SizeSpec) -> Result<Self, ConfigError> {
        let SizeSpec::Length(length) = spec else {
            return Ok(SizeMode::Auto);
        };
        let what = if length.unit == LengthUnit::Percent { "relative size" } else { "size" };
        if !length.value.is_finite() || length.value < 0.0 {
            return Err(ConfigError::InvalidNumber {
                node: node.to_string(),
                what,
                value: length.value,
            });
        }
        match length.to_px(None) {
            Some(px) => Ok(SizeMode::Fixed(px)),
            None => Ok(SizeMode::Relative(length.value / 100.0)),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, SizeMode::Auto)
    }

    fn validate(&self, node: &str) -> Result<(), ConfigError> {
        match *self {
            SizeMode::Fixed(value) if !value.is_finite() || value < 0.0 => {
                Err(ConfigError::InvalidNumber { node: node.to_string(), what: "size", value })
            }
            SizeMode::Relative(value) if !value.is_finite() || value < 0.0 => {
                Err(ConfigError::InvalidNumber { node: node.to_string(), what: "relative size", value })
            }
            _ => Ok(()),
        }
    }
}

/// The arrangement a container applies to its managed children.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Layout {
    /// Every child keeps its own position
    #[default]
    Free,
    Stack(Stack),
    Grid(Grid),
    Columns(Columns),
    /// A single grid slot
    Cell(Cell),
}

impl Layout {
    pub fn kind(&self) -> &'static str {
        match self {
            Layout::Free => "group",
            Layout::Stack(_) => "stack",
            Layout::Grid(_) => "grid",
            Layout::Columns(_) => "columns",
            Layout::Cell(_) => "cell",
        }
    }

    /// Whether children are positioned by this layout.
    pub fn manages_children(&self) -> bool {
        !matches!(self, Layout::Free)
    }

    /// Whether children live in generated slots rather than directly here.
    pub fn has_slots(&self) -> bool {
        matches!(self, Layout::Grid(_) | Layout::Columns(_))
    }

    /// Apply the layout-related fields of a configuration.
    pub fn configure(&mut self, config: &ContainerConfig) {
        let horizontal = Alignment::from(config.horizontal_alignment);
        let vertical = Alignment::from(config.vertical_alignment);
        match self {
            Layout::Free => {}
            Layout::Stack(stack) => {
                stack.spacing = config.spacing;
                stack.spread = config.spread;
                stack.alignment = match stack.direction.cross() {
                    Dimension::Width => horizontal,
                    Dimension::Height => vertical,
                };
            }
            Layout::Grid(grid) => {
                grid.gutter = config.gutter;
                grid.horizontal = horizontal;
                grid.vertical = vertical;
            }
            Layout::Columns(columns) => {
                columns.gutter = config.gutter;
                columns.spacing = config.spacing;
                columns.alignment = horizontal;
            }
            Layout::Cell(cell) => {
                cell.horizontal = horizontal;
                cell.vertical = vertical;
            }
        }
    }
}

/// A node that owns children.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Container {
    pub width: SizeMode,
    pub height: SizeMode,
    pub layout: Layout,
}

impl Container {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    /// A container that leaves every child where it was put.
    pub fn free() -> Self {
        Self::new(Layout::Free)
    }

    pub fn stack(stack: Stack) -> Self {
        Self::new(Layout::Stack(stack))
    }

    pub fn grid(grid: Grid) -> Self {
        Self::new(Layout::Grid(grid))
    }

    pub fn columns(columns: Columns) -> Self {
        Self::new(Layout::Columns(columns))
    }

    pub fn with_width(mut self, width: SizeMode) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: SizeMode) -> Self {
        self.height = height;
        self
    }

    /// Fix both axes.
    pub fn with_size(self, width: f64, height: f64) -> Self {
        self.with_width(SizeMode::Fixed(width))
            .with_height(SizeMode::Fixed(height))
    }

    /// Build from configuration, with `layout` supplying the arrangement.
    pub fn from_config(config: &ContainerConfig, mut layout: Layout) -> Result<Self, ConfigError> {
        let node = config.name.as_deref().unwrap_or_else(|| layout.kind());
        layout.configure(config);
        Ok(Self {
            width: SizeMode::from_spec(node, &config.width)?,
            height: SizeMode::from_spec(node, &config.height)?,
            layout,
        })
    }

    pub fn size(&self, dimension: Dimension) -> SizeMode {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }

    /// Reject contradictory or malformed settings.
    pub fn validate(&self, node: &str) -> Result<(), ConfigError> {
        self.width.validate(node)?;
        self.height.validate(node)?;

        match &self.layout {
            Layout::Free | Layout::Cell(_) => Ok(()),
            Layout::Stack(stack) => {
                if !stack.spacing.is_finite() || stack.spacing < 0.0 {
                    return Err(ConfigError::InvalidNumber {
                        node: node.to_string(),
                        what: "spacing",
                        value: stack.spacing,
                    });
                }
                let main = stack.direction.main();
                if stack.spread && self.size(main).is_auto() {
                    return Err(ConfigError::SpreadRequiresFixed { node: node.to_string(), axis: main });
                }
                Ok(())
            }
            Layout::Grid(grid) => {
                grid.validate(node)?;
                for axis in [Dimension::Width, Dimension::Height] {
                    if grid.cell_size(axis).is_some() && !self.size(axis).is_auto() {
                        return Err(ConfigError::ConflictingSize { node: node.to_string(), axis });
                    }
                }
                Ok(())
            }
            Layout::Columns(columns) => {
                columns.validate(node)?;
                if columns.column_width.is_some() && !self.width.is_auto() {
                    return Err(ConfigError::ConflictingSize {
                        node: node.to_string(),
                        axis: Dimension::Width,
                    });
                }
                Ok(())
            }
        }
    }
}
