//! Export for Vellum diagrams.
//!
//! [`Artboard`] is the usual entry point: it owns the root container and
//! a single [`Artboard::render`] call resolves the scene and serializes it
//! to SVG. The [`svg`] module exposes the serializer for bare scenes.
//!
//! ```
//! use vellum_export::Artboard;
//! use vellum_layout::{Alignment, Container, Grid, NodeSpec, Shape};
//!
//! let mut board = Artboard::new(400.0, 400.0)?;
//! let grid = board.add(Container::grid(
//!     Grid::new(3, 3)
//!         .with_cell_size(110.0, 110.0)
//!         .with_gutter(12.0)
//!         .with_alignment(Alignment::Center, Alignment::Center),
//! ))?;
//! let cell = board.cell(grid, 1, 1)?;
//! board.add_to(cell, NodeSpec::from(Shape::circle(35.0)).with_name("dot"))?;
//!
//! let svg = board.render()?;
//! assert!(svg.contains(r#"<circle cx="177" cy="177" r="35""#));
//! # Ok::<(), vellum_core::VellumError>(())
//! ```

pub mod artboard;
pub mod svg;

use vellum_core::ExportError;
use vellum_layout::Scene;

pub use artboard::Artboard;
pub use svg::SvgOptions;

/// Resolve a scene and export it to SVG.
pub fn export_svg(scene: &mut Scene) -> Result<String, ExportError> {
    svg::export(scene)
}

/// Resolve a scene and export it to SVG with custom options.
pub fn export_svg_with_options(scene: &mut Scene, options: &SvgOptions) -> Result<String, ExportError> {
    svg::export_with_options(scene, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_core::{Color, Edges};
    use vellum_layout::{Container, NodeSpec, Shape, SizeMode, Stack};

    #[test]
    fn test_export_svg() {
        let mut scene = Scene::new(Container::free().with_size(10.0, 10.0)).unwrap();
        assert!(export_svg(&mut scene).is_ok());
    }

    #[test]
    fn test_export_svg_with_background() {
        let mut scene = Scene::new(Container::free().with_size(10.0, 10.0)).unwrap();
        let options = SvgOptions {
            background: Some(Color::WHITE),
        };
        let svg = export_svg_with_options(&mut scene, &options).unwrap();
        assert!(svg.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn test_padded_stack_scenario() {
        let mut board = Artboard::new(800.0, 600.0).unwrap();
        let row = board
            .add(
                NodeSpec::from(
                    Container::stack(Stack::horizontal().with_spacing(10.0))
                        .with_height(SizeMode::Fixed(400.0)),
                )
                .with_padding(Edges::uniform(20.0))
                .with_border(Edges::uniform(2.0)),
            )
            .unwrap();
        for width in [40.0, 60.0, 80.0] {
            board.add_to(row, Shape::rect(width, 30.0)).unwrap();
        }
        let svg = board.render().unwrap();

        // width: children 180, spacing 20, padding 40, border 4
        assert!(svg.contains(r#"<rect x="1" y="1" width="242" height="398""#));
        assert!(svg.contains(r#"<rect x="22" y="22" width="40" height="30""#));
        assert!(svg.contains(r#"<rect x="142" y="22" width="80" height="30""#));
    }
}
