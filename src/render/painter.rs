//! egui painter backend.
//!
//! Draws a [`Scene`] with the egui painter at a given screen origin.

use crate::scene::{Paint, Scene, Shape, Style};
use eframe::egui::{self, Color32, Painter, Pos2, Rect, Stroke, Vec2};
use glam::DVec2;

/// Paints every layer of `scene`, back to front, with the scene's top-left
/// corner at `origin`.
pub fn paint_scene(painter: &Painter, origin: Pos2, scene: &Scene) {
    for layer in scene.layers() {
        for shape in &layer.shapes {
            paint_shape(painter, origin, shape);
        }
    }
}

fn paint_shape(painter: &Painter, origin: Pos2, shape: &Shape) {
    match shape {
        Shape::Circle {
            center,
            radius,
            style,
            ..
        } => {
            painter.circle(
                to_pos(origin, *center),
                *radius as f32,
                fill_color(style).unwrap_or(Color32::TRANSPARENT),
                stroke(style),
            );
        }
        Shape::Rect {
            min, size, style, ..
        } => {
            let rect = Rect::from_min_size(
                to_pos(origin, *min),
                Vec2::new(size.x as f32, size.y as f32),
            );
            if let Some(fill) = fill_color(style) {
                painter.rect_filled(rect, 0.0, fill);
            }
        }
        Shape::Path { data, style, .. } => {
            // Filling arbitrary polygons needs tessellation; closed rings
            // are drawn as outlines in their fill color instead.
            let outline = fill_color(style).map(|c| Stroke::new(1.0, c));
            for subpath in &data.subpaths {
                let points: Vec<Pos2> = subpath.points.iter().map(|p| to_pos(origin, *p)).collect();
                if subpath.closed {
                    if let Some(outline) = outline {
                        painter.add(egui::Shape::closed_line(points.clone(), outline));
                    }
                    if style.stroke.is_some() {
                        painter.add(egui::Shape::closed_line(points, stroke(style)));
                    }
                } else {
                    painter.add(egui::Shape::line(points, stroke(style)));
                }
            }
        }
    }
}

fn to_pos(origin: Pos2, point: DVec2) -> Pos2 {
    Pos2::new(origin.x + point.x as f32, origin.y + point.y as f32)
}

/// Solid fill with opacity applied. Gradients are decorative and skipped.
fn fill_color(style: &Style) -> Option<Color32> {
    match style.fill {
        Paint::Solid(color) => Some(with_opacity(color, style.fill_opacity)),
        Paint::None | Paint::Gradient(_) => None,
    }
}

fn stroke(style: &Style) -> Stroke {
    match style.stroke {
        Some(color) => Stroke::new(
            style.stroke_width as f32,
            with_opacity(color, style.stroke_opacity),
        ),
        None => Stroke::NONE,
    }
}

fn with_opacity(color: Color32, opacity: Option<f32>) -> Color32 {
    match opacity {
        Some(opacity) => color.gamma_multiply(opacity),
        None => color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_scales_alpha() {
        let style = Style::filled(Color32::from_rgb(200, 0, 0)).with_fill_opacity(0.5);
        let color = fill_color(&style).unwrap();
        assert!(color.a() < 255);
        assert!(fill_color(&Style::default()).is_none());
    }

    #[test]
    fn test_positions_are_offset_by_origin() {
        let pos = to_pos(Pos2::new(10.0, 20.0), DVec2::new(1.5, 2.5));
        assert_eq!(pos, Pos2::new(11.5, 22.5));
    }
}
