//! SVG export for resolved scenes.

use std::fmt::{self, Write};

use vellum_core::{Color, ExportError};
use vellum_layout::{container_paint, NodeId, Primitive, Scene, Size, Style, WorldTransform};

/// Options for SVG export.
#[derive(Debug, Clone, Default)]
pub struct SvgOptions {
    /// Canvas fill painted behind every node
    pub background: Option<Color>,
}

/// Resolve a scene and serialize it to SVG.
pub fn export(scene: &mut Scene) -> Result<String, ExportError> {
    export_with_options(scene, &SvgOptions::default())
}

/// Resolve a scene and serialize it to SVG with custom options.
pub fn export_with_options(scene: &mut Scene, options: &SvgOptions) -> Result<String, ExportError> {
    scene.resolve()?;
    Ok(serialize(scene, options)?)
}

/// Serialize a scene that has already been resolved.
pub fn serialize(scene: &Scene, options: &SvgOptions) -> Result<String, fmt::Error> {
    let canvas = scene.size(scene.root()).unwrap_or(Size::ZERO);
    let (width, height) = (Num(canvas.width), Num(canvas.height));

    let mut builder = SvgBuilder {
        svg: String::new(),
        indent: 0,
    };
    builder.svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    writeln!(
        builder.svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;
    builder.indent += 1;

    if let Some(color) = options.background {
        let background = Primitive::Rect {
            x: 0.0,
            y: 0.0,
            width: canvas.width,
            height: canvas.height,
            corner_radius: 0.0,
        };
        builder.primitive(&background, &Style::default().with_fill(color), None)?;
    }

    let order = scene.paint_order();
    for id in &order {
        builder.node(scene, *id)?;
    }

    builder.indent -= 1;
    builder.svg.push_str("</svg>\n");
    tracing::debug!(nodes = order.len(), bytes = builder.svg.len(), "serialized svg");
    Ok(builder.svg)
}

struct SvgBuilder {
    svg: String,
    indent: usize,
}

impl SvgBuilder {
    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.svg.push_str("  ");
        }
    }

    fn node(&mut self, scene: &Scene, id: NodeId) -> fmt::Result {
        let (Some(node), Some(frame)) = (scene.get(id), scene.frame(id)) else {
            return Ok(());
        };
        let primitives: Vec<(Primitive, Style)> = match node.kind.leaf() {
            Some(leaf) => leaf
                .render(&frame)
                .into_iter()
                .map(|primitive| (primitive, node.style))
                .collect(),
            None => container_paint(&frame, &node.style).into_iter().collect(),
        };

        if let Some(name) = &node.name {
            self.write_indent();
            writeln!(self.svg, "<!-- {} -->", escape_comment(name))?;
        }
        if primitives.is_empty() {
            return Ok(());
        }

        let transform = scene.world_transform(id).and_then(|world| rotation_attr(&world));
        for (primitive, style) in &primitives {
            self.primitive(primitive, style, transform.as_deref())?;
        }
        Ok(())
    }

    fn primitive(&mut self, primitive: &Primitive, style: &Style, transform: Option<&str>) -> fmt::Result {
        self.write_indent();
        match primitive {
            Primitive::Rect { x, y, width, height, corner_radius } => {
                write!(
                    self.svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                    Num(*x),
                    Num(*y),
                    Num(*width),
                    Num(*height)
                )?;
                if *corner_radius > 0.0 {
                    let r = Num(*corner_radius);
                    write!(self.svg, r#" rx="{r}" ry="{r}""#)?;
                }
            }
            Primitive::Circle { cx, cy, r } => {
                write!(
                    self.svg,
                    r#"<circle cx="{}" cy="{}" r="{}""#,
                    Num(*cx),
                    Num(*cy),
                    Num(*r)
                )?;
            }
            Primitive::Ellipse { cx, cy, rx, ry } => {
                write!(
                    self.svg,
                    r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                    Num(*cx),
                    Num(*cy),
                    Num(*rx),
                    Num(*ry)
                )?;
            }
            Primitive::Polygon { points } => {
                self.svg.push_str("<polygon points=\"");
                for (i, point) in points.iter().enumerate() {
                    if i > 0 {
                        self.svg.push(' ');
                    }
                    write!(self.svg, "{},{}", Num(point.x), Num(point.y))?;
                }
                self.svg.push('"');
            }
            Primitive::Text { x, y, content, font_size, font_family } => {
                write!(
                    self.svg,
                    r#"<text x="{}" y="{}" font-size="{}" font-family="{}""#,
                    Num(*x),
                    Num(*y),
                    Num(*font_size),
                    escape_xml(font_family)
                )?;
                self.paint(style)?;
                if let Some(transform) = transform {
                    write!(self.svg, r#" transform="{transform}""#)?;
                }
                return writeln!(self.svg, ">{}</text>", escape_xml(content));
            }
        }
        self.paint(style)?;
        if let Some(transform) = transform {
            write!(self.svg, r#" transform="{transform}""#)?;
        }
        self.svg.push_str(" />\n");
        Ok(())
    }

    fn paint(&mut self, style: &Style) -> fmt::Result {
        match style.fill {
            Some(color) => {
                write!(self.svg, r#" fill="{}""#, color_to_svg(&color))?;
                if color.a < 1.0 {
                    write!(self.svg, r#" fill-opacity="{}""#, Num(f64::from(color.a)))?;
                }
            }
            None => self.svg.push_str(r#" fill="none""#),
        }
        if let Some(color) = style.stroke {
            write!(
                self.svg,
                r#" stroke="{}" stroke-width="{}""#,
                color_to_svg(&color),
                Num(style.stroke_width)
            )?;
            if color.a < 1.0 {
                write!(self.svg, r#" stroke-opacity="{}""#, Num(f64::from(color.a)))?;
            }
        }
        if style.opacity < 1.0 {
            write!(self.svg, r#" opacity="{}""#, Num(style.opacity))?;
        }
        Ok(())
    }
}

/// Shortest round-trip decimal form, with negative zero printed as `0`.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            fmt::Display::fmt(&self.0, f)
        }
    }
}

/// `rotate(...)` list for a rotated node, outermost rotation first.
fn rotation_attr(world: &WorldTransform) -> Option<String> {
    if !world.is_rotated() {
        return None;
    }
    let parts: Vec<String> = world
        .rotations
        .iter()
        .rev()
        .map(|rotation| {
            format!(
                "rotate({} {} {})",
                Num(rotation.degrees),
                Num(rotation.pivot.x),
                Num(rotation.pivot.y)
            )
        })
        .collect();
    Some(parts.join(" "))
}

fn color_to_svg(color: &Color) -> String {
    let (r, g, b, _) = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Keep a debug name from closing its comment early.
fn escape_comment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous = None;
    for c in s.chars() {
        if c == '-' && previous == Some('-') {
            out.push(' ');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_layout::{BoxKind, Container, Frame, NodeSpec, Point, Positionable, Shape, Stack};

    fn attribute<'a>(svg: &'a str, element: &str, name: &str) -> &'a str {
        let start = svg.find(&format!("<{element} ")).unwrap();
        let rest = &svg[start..];
        let key = format!(" {name}=\"");
        let value = &rest[rest.find(&key).unwrap() + key.len()..];
        &value[..value.find('"').unwrap()]
    }

    #[test]
    fn test_color_to_svg() {
        assert_eq!(color_to_svg(&Color::from_rgb8(255, 128, 0)), "#ff8000");
        assert_eq!(color_to_svg(&Color::BLACK), "#000000");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
    }

    #[test]
    fn test_escape_comment() {
        assert_eq!(escape_comment("a--b"), "a- -b");
        assert_eq!(escape_comment("x---"), "x- - -");
        assert_eq!(escape_comment("plain-name"), "plain-name");
    }

    #[test]
    fn test_number_format() {
        assert_eq!(Num(-0.0).to_string(), "0");
        assert_eq!(Num(2.0).to_string(), "2");
        assert_eq!(Num(0.1 + 0.2).to_string(), "0.30000000000000004");
    }

    #[test]
    fn test_export_empty_scene() {
        let mut scene = Scene::new(Container::free().with_size(800.0, 600.0)).unwrap();
        let svg = export(&mut scene).unwrap();
        assert!(svg.contains(r#"width="800" height="600" viewBox="0 0 800 600""#));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_coordinates_round_trip() {
        let mut scene = Scene::new(Container::free().with_size(100.0, 100.0)).unwrap();
        let dot = scene
            .add(NodeSpec::from(Shape::circle(1.0 / 7.0)).at(100.0 / 3.0, 0.1 + 0.2))
            .unwrap();
        let svg = export(&mut scene).unwrap();

        let center = scene.frame(dot).unwrap().box_bounds(BoxKind::Content).center();
        assert_eq!(attribute(&svg, "circle", "cx").parse::<f64>().unwrap(), center.x);
        assert_eq!(attribute(&svg, "circle", "cy").parse::<f64>().unwrap(), center.y);
        assert_eq!(attribute(&svg, "circle", "r").parse::<f64>().unwrap(), 1.0 / 7.0);
    }

    #[test]
    fn test_named_nodes_are_commented() {
        let mut scene = Scene::new(Container::free().with_size(50.0, 50.0)).unwrap();
        scene
            .add(NodeSpec::from(Shape::rect(10.0, 10.0)).with_name("hero--box"))
            .unwrap();
        let svg = export(&mut scene).unwrap();
        let comment = svg.find("<!-- hero- -box -->").unwrap();
        assert!(comment < svg.find("<rect").unwrap());
    }

    #[test]
    fn test_rotation_attribute_outermost_first() {
        let mut scene = Scene::new(Container::free().with_size(200.0, 200.0)).unwrap();
        let group = scene
            .add(NodeSpec::from(Container::free().with_size(20.0, 20.0)).at(100.0, 100.0))
            .unwrap();
        let leaf = scene
            .add_to(group, NodeSpec::from(Shape::rect(4.0, 4.0)).at(2.0, 2.0))
            .unwrap();
        scene.rotate(group, 90.0).unwrap();
        scene.rotate(leaf, 45.0).unwrap();
        let svg = export(&mut scene).unwrap();
        assert!(svg.contains(r#"transform="rotate(90 110 110) rotate(45 104 104)""#));
    }

    #[test]
    fn test_text_and_paint_attributes() {
        let mut scene = Scene::new(Container::free().with_size(200.0, 50.0)).unwrap();
        scene
            .add(NodeSpec::from(Shape::text("a < b", 10.0)).with_style(
                Style::default()
                    .with_fill(Color::from_rgb8(255, 0, 0))
                    .with_opacity(0.5),
            ))
            .unwrap();
        let stack = scene
            .add(
                NodeSpec::from(Container::stack(Stack::vertical()).with_size(10.0, 10.0))
                    .with_fill(Color::WHITE),
            )
            .unwrap();
        let svg = export(&mut scene).unwrap();
        assert!(svg.contains(r##"fill="#ff0000" opacity="0.5">a &lt; b</text>"##));
        assert!(svg.contains(r##"<rect x="0" y="0" width="10" height="10" fill="#ffffff" />"##));
        assert!(scene.frame(stack).is_some());
    }

    #[test]
    fn test_translucent_paint_attributes() {
        let mut scene = Scene::new(Container::free().with_size(40.0, 40.0)).unwrap();
        scene
            .add(NodeSpec::from(Shape::rect(10.0, 10.0)).with_style(
                Style::default()
                    .with_fill(Color::rgba(1.0, 0.0, 0.0, 0.5))
                    .with_stroke(Color::rgba(0.0, 0.0, 0.0, 0.25), 2.0),
            ))
            .unwrap();
        let svg = export(&mut scene).unwrap();
        assert!(svg.contains(
            r##"fill="#ff0000" fill-opacity="0.5" stroke="#000000" stroke-width="2" stroke-opacity="0.25""##
        ));
    }

    /// An upward-pointing triangle filling its content box.
    #[derive(Debug)]
    struct Marker;

    impl Positionable for Marker {
        fn size(&self) -> Size {
            Size::new(10.0, 8.0)
        }

        fn render(&self, frame: &Frame) -> Vec<Primitive> {
            let content = frame.box_bounds(BoxKind::Content);
            let points = vec![
                Point::new(content.x + content.width / 2.0, content.y),
                Point::new(content.right(), content.bottom()),
                Point::new(content.x, content.bottom()),
            ];
            vec![Primitive::Polygon { points }]
        }
    }

    #[test]
    fn test_custom_shape_is_serialized() {
        let mut scene = Scene::new(Container::free().with_size(50.0, 50.0)).unwrap();
        scene
            .add(NodeSpec::custom(Marker).with_name("marker").at(20.0, 30.0))
            .unwrap();
        let svg = export(&mut scene).unwrap();
        assert!(svg.contains("<!-- marker -->"));
        assert!(svg.contains(r##"<polygon points="25,30 30,38 20,38" fill="none" stroke="#000000""##));
    }
}
