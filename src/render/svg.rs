//! SVG markup writer.
//!
//! Serializes a [`Scene`] into standalone SVG text. The browser surface
//! reuses [`inner_markup`] to fill an `<svg>` element it created itself.

use super::Surface;
use crate::geo::fmt_coord;
use crate::scene::{LinearGradient, Paint, Scene, Shape, Style};
use eframe::egui::Color32;
use std::fmt::Write;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// A surface that renders to an SVG string.
#[derive(Debug, Default)]
pub struct SvgDocument {
    markup: String,
}

impl SvgDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the last presented scene (empty before the first present).
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl Surface for SvgDocument {
    fn present(&mut self, scene: &Scene) {
        self.markup = to_markup(scene);
    }
}

/// Serializes a scene as a complete `<svg>` document.
pub fn to_markup(scene: &Scene) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="{}" id="{}" width="{}" height="{}""#,
        SVG_NAMESPACE,
        escape(&scene.id),
        fmt_coord(scene.width),
        fmt_coord(scene.height)
    );
    if scene.view_box {
        let _ = write!(out, r#" viewBox="{}""#, view_box(scene));
    }
    out.push('>');
    out.push_str(&inner_markup(scene));
    out.push_str("</svg>");
    out
}

/// The `viewBox` attribute value matching the scene size.
pub(crate) fn view_box(scene: &Scene) -> String {
    format!("0 0 {} {}", fmt_coord(scene.width), fmt_coord(scene.height))
}

/// Serializes gradient definitions and layer groups, without the root
/// element.
pub(crate) fn inner_markup(scene: &Scene) -> String {
    let mut out = String::new();

    if !scene.gradients.is_empty() {
        out.push_str("<defs>");
        for gradient in &scene.gradients {
            write_gradient(&mut out, gradient);
        }
        out.push_str("</defs>");
    }

    for layer in scene.layers() {
        let _ = write!(out, r#"<g class="{}">"#, layer.kind.class_name());
        for shape in &layer.shapes {
            write_shape(&mut out, shape);
        }
        out.push_str("</g>");
    }
    out
}

fn write_gradient(out: &mut String, gradient: &LinearGradient) {
    let _ = write!(
        out,
        r#"<linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="100%">"#,
        escape(&gradient.id)
    );
    for stop in &gradient.stops {
        let _ = write!(
            out,
            r#"<stop offset="{}%" stop-color="{}" stop-opacity="{}"/>"#,
            fmt_coord(f64::from(stop.offset) * 100.0),
            hex(stop.color),
            stop.opacity
        );
    }
    out.push_str("</linearGradient>");
}

fn write_shape(out: &mut String, shape: &Shape) {
    match shape {
        Shape::Circle {
            class,
            center,
            radius,
            style,
            title,
        } => {
            let _ = write!(
                out,
                r#"<circle class="{}" cx="{}" cy="{}" r="{}" style="{}""#,
                class,
                fmt_coord(center.x),
                fmt_coord(center.y),
                fmt_coord(*radius),
                style_attribute(style)
            );
            match title {
                Some(title) => {
                    let _ = write!(out, "><title>{}</title></circle>", escape(title));
                }
                None => out.push_str("/>"),
            }
        }
        Shape::Rect {
            class,
            min,
            size,
            style,
        } => {
            let _ = write!(
                out,
                r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" style="{}"/>"#,
                class,
                fmt_coord(min.x),
                fmt_coord(min.y),
                fmt_coord(size.x),
                fmt_coord(size.y),
                style_attribute(style)
            );
        }
        Shape::Path { class, data, style } => {
            let _ = write!(
                out,
                r#"<path class="{}" d="{}" style="{}"/>"#,
                class,
                data.to_svg(),
                style_attribute(style)
            );
        }
    }
}

fn style_attribute(style: &Style) -> String {
    let mut declarations = Vec::new();

    declarations.push(match &style.fill {
        Paint::None => "fill:none".to_string(),
        Paint::Solid(color) => format!("fill:{}", hex(*color)),
        Paint::Gradient(id) => format!("fill:url(#{})", escape(id)),
    });
    if let Some(opacity) = style.fill_opacity {
        declarations.push(format!("fill-opacity:{}", opacity));
    }
    if let Some(stroke) = style.stroke {
        declarations.push(format!("stroke:{}", hex(stroke)));
        declarations.push(format!("stroke-width:{}", fmt_coord(style.stroke_width)));
    }
    if let Some(opacity) = style.stroke_opacity {
        declarations.push(format!("stroke-opacity:{}", opacity));
    }
    if !style.interactive {
        declarations.push("pointer-events:none".to_string());
    }
    declarations.join(";")
}

fn hex(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

/// Escapes text for use in attribute values and element content.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
