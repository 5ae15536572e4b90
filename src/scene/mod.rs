//! Declarative scene description.
//!
//! Renderers describe what to draw as a [`Scene`]: an ordered list of typed
//! layers, each holding styled shapes in pixel space. Draw backends (SVG
//! markup, the browser DOM, the egui painter) consume scenes without
//! knowing anything about projections.

pub mod colors;

use crate::geo::PathData;
use eframe::egui::Color32;
use glam::DVec2;

/// Logical layers, listed back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Water,
    Land,
    Boundaries,
    Coastlines,
    Graticule,
    Shading,
    Marker,
    Occurrences,
}

impl LayerKind {
    /// Drawing order; lower values are painted first.
    pub fn z_order(self) -> u8 {
        self as u8
    }

    /// CSS class of the layer group.
    pub fn class_name(self) -> &'static str {
        match self {
            LayerKind::Water => "water-group",
            LayerKind::Land => "land-group",
            LayerKind::Boundaries => "boundaries-group",
            LayerKind::Coastlines => "coastline-group",
            LayerKind::Graticule => "graticule-group",
            LayerKind::Shading => "shadow-group",
            LayerKind::Marker => "marker-group",
            LayerKind::Occurrences => "occurrence-group",
        }
    }
}

/// How a shape's interior or outline is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    None,
    Solid(Color32),
    /// Reference to a gradient defined on the scene.
    Gradient(String),
}

/// Presentation attributes of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Paint,
    pub fill_opacity: Option<f32>,
    pub stroke: Option<Color32>,
    pub stroke_width: f64,
    pub stroke_opacity: Option<f32>,
    /// Whether the shape receives pointer events.
    pub interactive: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Paint::None,
            fill_opacity: None,
            stroke: None,
            stroke_width: 0.0,
            stroke_opacity: None,
            interactive: true,
        }
    }
}

impl Style {
    pub fn filled(color: Color32) -> Self {
        Self {
            fill: Paint::Solid(color),
            ..Default::default()
        }
    }

    pub fn stroked(color: Color32, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Default::default()
        }
    }

    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.fill = paint;
        self
    }

    pub fn with_stroke(mut self, color: Color32, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f32) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    pub fn with_stroke_opacity(mut self, opacity: f32) -> Self {
        self.stroke_opacity = Some(opacity);
        self
    }

    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }
}

/// A drawable primitive in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        class: &'static str,
        center: DVec2,
        radius: f64,
        style: Style,
        /// Hover tooltip.
        title: Option<String>,
    },
    Rect {
        class: &'static str,
        min: DVec2,
        size: DVec2,
        style: Style,
    },
    Path {
        class: &'static str,
        data: PathData,
        style: Style,
    },
}

impl Shape {
    pub fn title(&self) -> Option<&str> {
        match self {
            Shape::Circle { title, .. } => title.as_deref(),
            _ => None,
        }
    }
}

/// One color stop of a gradient; `offset` runs from 0 to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color32,
    pub opacity: f32,
}

/// A linear gradient running diagonally from the top-left corner to the
/// bottom-right corner of the shape it fills.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub id: String,
    pub stops: Vec<GradientStop>,
}

/// A group of shapes drawn together.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    pub shapes: Vec<Shape>,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            shapes: Vec::new(),
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }
}

/// A complete picture: canvas size, definitions and ordered layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Emit a `viewBox` matching the canvas size.
    pub view_box: bool,
    pub gradients: Vec<LinearGradient>,
    layers: Vec<Layer>,
}

impl Scene {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            view_box: false,
            gradients: Vec::new(),
            layers: Vec::new(),
        }
    }

    pub fn with_view_box(mut self) -> Self {
        self.view_box = true;
        self
    }

    pub fn add_gradient(&mut self, gradient: LinearGradient) {
        self.gradients.push(gradient);
    }

    /// Adds a layer, keeping layers sorted back to front.
    ///
    /// Layers of equal z-order keep their insertion order.
    pub fn push_layer(&mut self, layer: Layer) {
        let position = self
            .layers
            .iter()
            .position(|l| l.kind.z_order() > layer.kind.z_order())
            .unwrap_or(self.layers.len());
        self.layers.insert(position, layer);
    }

    /// Layers in drawing order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    /// Number of shapes in the given layer (0 if absent).
    pub fn shape_count(&self, kind: LayerKind) -> usize {
        self.layer(kind).map(|l| l.shapes.len()).unwrap_or(0)
    }

    /// Tooltip of the topmost interactive circle under `point`.
    pub fn title_at(&self, point: DVec2) -> Option<&str> {
        self.layers
            .iter()
            .rev()
            .flat_map(|l| l.shapes.iter().rev())
            .filter(|shape| match shape {
                Shape::Circle {
                    center,
                    radius,
                    style,
                    ..
                } => style.interactive && center.distance(point) <= *radius,
                _ => false,
            })
            .find_map(Shape::title)
    }
}

/// Turns a display title into an element id fragment by replacing each
/// run of whitespace with a single underscore.
pub fn dom_id(title: &str) -> String {
    let mut id = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                id.push('_');
            }
            in_space = true;
        } else {
            id.push(c);
            in_space = false;
        }
    }
    id
}
