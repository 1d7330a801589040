//! The root drawing surface.

use std::ops::{Deref, DerefMut};
use std::path::Path;

use vellum_core::{ArtboardConfig, Color, ConfigError, ExportError, VellumError};
use vellum_layout::{BoxModel, Container, NodeSpec, Scene, SizeMode};

use crate::svg::{self, SvgOptions};

/// A canvas and the scene drawn on it.
///
/// The artboard is the scene's root container. Children added with
/// [`Scene::add`] keep their own positions; an `auto` axis grows to
/// contain everything placed on the canvas.
#[derive(Debug, Clone)]
pub struct Artboard {
    scene: Scene,
    background: Option<Color>,
}

impl Artboard {
    /// A fixed-size canvas.
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        Self::with_root(NodeSpec::from(Container::free().with_size(width, height)))
    }

    /// A canvas sized to its content.
    pub fn auto() -> Result<Self, ConfigError> {
        Self::with_root(NodeSpec::from(Container::free()))
    }

    pub fn from_config(config: &ArtboardConfig) -> Result<Self, ConfigError> {
        let label = config.name.as_deref().unwrap_or("artboard");
        let container = Container::free()
            .with_width(SizeMode::from_spec(label, &config.width)?)
            .with_height(SizeMode::from_spec(label, &config.height)?);
        let background = config
            .background
            .as_deref()
            .map(|hex| {
                Color::from_hex(hex).ok_or_else(|| ConfigError::InvalidColor {
                    node: label.to_string(),
                    value: hex.to_string(),
                })
            })
            .transpose()?;

        let mut root = NodeSpec::from(container);
        root.name = config.name.clone();
        root.box_model = BoxModel {
            padding: config.padding.to_edges(label, "padding")?,
            ..Default::default()
        };
        Ok(Self {
            background,
            ..Self::with_root(root)?
        })
    }

    fn with_root(root: NodeSpec) -> Result<Self, ConfigError> {
        Ok(Self {
            scene: Scene::new(root)?,
            background: None,
        })
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Measure, place and serialize the whole tree.
    ///
    /// Idempotent: rendering twice without mutation yields the same document.
    pub fn render(&mut self) -> Result<String, VellumError> {
        let span = tracing::debug_span!("render", nodes = self.scene.len());
        let _enter = span.enter();

        self.scene.resolve()?;
        let options = SvgOptions {
            background: self.background,
        };
        let document = svg::serialize(&self.scene, &options).map_err(ExportError::from)?;
        Ok(document)
    }

    /// Render and write the document to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), VellumError> {
        let document = self.render()?;
        std::fs::write(path.as_ref(), document).map_err(ExportError::from)?;
        tracing::debug!(path = %path.as_ref().display(), "saved svg");
        Ok(())
    }
}

impl Deref for Artboard {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        &self.scene
    }
}

impl DerefMut for Artboard {
    fn deref_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}
