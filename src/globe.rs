//! Interactive orthographic globe.
//!
//! The globe shows the hemisphere centered on a coordinate, with a single
//! marker at that coordinate. Dragging rotates it; a double click snaps
//! back to the initial view.

use crate::geo::{
    graticule, lines_path, polygons_path, GeoCoordinate, Orthographic, Projection, Rotation,
    WorldBoundaries,
};
use crate::interaction::DragState;
use crate::render::Surface;
use crate::scene::{
    colors, dom_id, GradientStop, Layer, LayerKind, LinearGradient, Paint, Scene, Shape, Style,
};
use geo_types::MultiLineString;
use glam::DVec2;
use std::sync::Arc;

/// Outline width of the water disc. The projected sphere shrinks by half of
/// it so the outline stays on the canvas.
const WATER_STROKE_WIDTH: f64 = 1.0;
/// Spacing of the globe graticule in degrees.
const GRATICULE_STEP: f64 = 20.0;
const LINE_WIDTH: f64 = 0.3;
const GRATICULE_OPACITY: f32 = 0.5;
const MARKER_RADIUS: f64 = 3.0;

/// Renders a rotatable globe onto a surface it owns.
pub struct GlobeRenderer<S: Surface> {
    surface: S,
    projection: Orthographic,
    boundaries: Arc<WorldBoundaries>,
    graticule: MultiLineString<f64>,
    diameter: f64,
    id: String,
    initial_rotation: Rotation,
    marker: GeoCoordinate,
    drag: DragState,
    scene: Scene,
}

impl<S: Surface> GlobeRenderer<S> {
    /// Builds the globe, centers it on the given coordinate and draws it.
    pub fn create(
        surface: S,
        diameter: f64,
        title: &str,
        center_lat: f64,
        center_lon: f64,
        boundaries: Arc<WorldBoundaries>,
    ) -> Self {
        let marker = GeoCoordinate::new(center_lon, center_lat);
        let initial_rotation = Rotation::centered_on(marker);
        let projection = Orthographic::new(
            diameter / 2.0 - WATER_STROKE_WIDTH / 2.0,
            DVec2::new(diameter / 2.0, diameter / 2.0),
        )
        .with_rotation(initial_rotation);

        let id = dom_id(title);
        log::debug!("Creating globe {id} centered on ({center_lon}, {center_lat})");

        let mut globe = Self {
            surface,
            projection,
            boundaries,
            graticule: graticule(GRATICULE_STEP),
            diameter,
            scene: Scene::new(format!("{id}-orthographic-globe"), diameter, diameter),
            id,
            initial_rotation,
            marker,
            drag: DragState::Idle,
        };
        globe.redraw();
        globe
    }

    /// Starts a drag at `position` (pixels relative to the canvas).
    pub fn pointer_down(&mut self, position: DVec2) {
        self.drag.begin(self.projection.rotation(), position);
        log::debug!("Globe {} drag started at {position}", self.id);
    }

    /// Rotates the globe to follow the pointer. Returns true if the globe
    /// was redrawn.
    pub fn pointer_move(&mut self, position: DVec2) -> bool {
        match self.drag.update(position) {
            Some(rotation) => {
                self.projection.set_rotation(rotation);
                self.redraw();
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        if self.drag.is_dragging() {
            log::debug!("Globe {} drag ended", self.id);
        }
        self.drag.end();
    }

    /// Restores the initial orientation.
    pub fn double_click(&mut self) {
        self.projection.set_rotation(self.initial_rotation);
        self.redraw();
    }

    /// Re-projects every layer from the current rotation and presents it.
    pub fn redraw(&mut self) {
        self.scene = self.build_scene();
        self.surface.present(&self.scene);
    }

    pub fn rotation(&self) -> Rotation {
        self.projection.rotation()
    }

    pub fn initial_rotation(&self) -> Rotation {
        self.initial_rotation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Whether the location marker is on the visible hemisphere.
    pub fn marker_visible(&self) -> bool {
        self.projection.is_visible(self.marker)
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn build_scene(&self) -> Scene {
        let center = self.projection.translate();
        let radius = self.projection.scale();
        let gradient_id = format!("gradient-{}", self.id);

        let mut scene = Scene::new(
            format!("{}-orthographic-globe", self.id),
            self.diameter,
            self.diameter,
        );
        scene.add_gradient(LinearGradient {
            id: gradient_id.clone(),
            stops: vec![
                GradientStop {
                    offset: 0.5,
                    color: colors::shading::HIGHLIGHT,
                    opacity: colors::shading::OPACITY,
                },
                GradientStop {
                    offset: 1.0,
                    color: colors::shading::SHADOW,
                    opacity: colors::shading::OPACITY,
                },
            ],
        });

        scene.push_layer(Layer::new(LayerKind::Water).with_shape(Shape::Circle {
            class: "water",
            center,
            radius,
            style: Style::filled(colors::map::WATER)
                .with_stroke(colors::map::WATER_OUTLINE, WATER_STROKE_WIDTH),
            title: None,
        }));

        let mut land = Layer::new(LayerKind::Land);
        for country in &self.boundaries.countries {
            let data = polygons_path(&self.projection, &country.shape);
            if !data.is_empty() {
                land.shapes.push(Shape::Path {
                    class: "country",
                    data,
                    style: Style::filled(colors::map::LAND),
                });
            }
        }
        scene.push_layer(land);

        scene.push_layer(Layer::new(LayerKind::Boundaries).with_shape(Shape::Path {
            class: "boundary",
            data: lines_path(&self.projection, &self.boundaries.borders),
            style: Style::stroked(colors::map::BORDER, LINE_WIDTH),
        }));
        scene.push_layer(Layer::new(LayerKind::Coastlines).with_shape(Shape::Path {
            class: "coast",
            data: lines_path(&self.projection, &self.boundaries.coastlines),
            style: Style::stroked(colors::map::COAST, LINE_WIDTH),
        }));
        scene.push_layer(Layer::new(LayerKind::Graticule).with_shape(Shape::Path {
            class: "graticule",
            data: lines_path(&self.projection, &self.graticule),
            style: Style::stroked(colors::map::GRATICULE, LINE_WIDTH)
                .with_stroke_opacity(GRATICULE_OPACITY),
        }));

        scene.push_layer(Layer::new(LayerKind::Shading).with_shape(Shape::Circle {
            class: "gradient-shadow",
            center,
            radius: self.diameter / 2.0,
            style: Style::default()
                .with_fill(Paint::Gradient(gradient_id))
                .non_interactive(),
            title: None,
        }));

        let mut marker = Layer::new(LayerKind::Marker);
        if self.marker_visible() {
            if let Some(position) = self.projection.project(self.marker) {
                marker.shapes.push(Shape::Circle {
                    class: "location-marker",
                    center: position,
                    radius: MARKER_RADIUS,
                    style: Style::filled(colors::overlay::MARKER).non_interactive(),
                    title: None,
                });
            }
        }
        scene.push_layer(marker);

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Country;
    use crate::render::RetainedScene;
    use geo_types::{coord, LineString, MultiPolygon, Polygon};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn square(lon: f64, lat: f64) -> Country {
        let ring = LineString::new(vec![
            coord! { x: lon - 5.0, y: lat - 5.0 },
            coord! { x: lon + 5.0, y: lat - 5.0 },
            coord! { x: lon + 5.0, y: lat + 5.0 },
            coord! { x: lon - 5.0, y: lat + 5.0 },
            coord! { x: lon - 5.0, y: lat - 5.0 },
        ]);
        Country {
            id: None,
            name: None,
            shape: MultiPolygon::new(vec![Polygon::new(ring, vec![])]),
        }
    }

    fn world() -> Arc<WorldBoundaries> {
        Arc::new(WorldBoundaries {
            countries: vec![square(0.0, 0.0), square(180.0, 0.0)],
            ..Default::default()
        })
    }

    fn globe(lat: f64, lon: f64) -> GlobeRenderer<RetainedScene> {
        GlobeRenderer::create(RetainedScene::new(), 200.0, "Pica pica", lat, lon, world())
    }

    #[test]
    fn test_initial_rotation_faces_center() {
        let globe = globe(48.0, 2.0);
        assert_eq!(globe.rotation(), Rotation::new(-2.0, -48.0, 0.0));
        assert!(globe.marker_visible());
        assert_eq!(globe.surface().present_count(), 1);
    }

    #[test]
    fn test_scene_ids_and_dimensions() {
        let globe = globe(0.0, 0.0);
        let scene = globe.scene();
        assert_eq!(scene.id, "Pica_pica-orthographic-globe");
        assert_eq!(scene.width, 200.0);
        assert_eq!(scene.height, 200.0);
        assert_eq!(scene.gradients[0].id, "gradient-Pica_pica");

        match &scene.layer(LayerKind::Water).unwrap().shapes[0] {
            Shape::Circle { radius, center, .. } => {
                assert_close(*radius, 99.5);
                assert_eq!(*center, DVec2::new(100.0, 100.0));
            }
            other => panic!("unexpected water shape {other:?}"),
        }
    }

    #[test]
    fn test_layer_order() {
        let globe = globe(0.0, 0.0);
        let kinds: Vec<_> = globe.scene().layers().iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LayerKind::Water,
                LayerKind::Land,
                LayerKind::Boundaries,
                LayerKind::Coastlines,
                LayerKind::Graticule,
                LayerKind::Shading,
                LayerKind::Marker,
            ]
        );
    }

    #[test]
    fn test_far_side_land_is_removed() {
        let mut globe = globe(0.0, 0.0);
        assert_eq!(globe.scene().shape_count(LayerKind::Land), 1);

        // Half a turn brings the antimeridian square into view instead.
        globe.pointer_down(DVec2::new(0.0, 0.0));
        globe.pointer_move(DVec2::new(360.0, 0.0));
        globe.pointer_up();
        assert_eq!(globe.scene().shape_count(LayerKind::Land), 1);
        assert!(!globe.marker_visible());
        assert_eq!(globe.scene().shape_count(LayerKind::Marker), 0);
    }

    #[test]
    fn test_drag_is_absolute_from_start() {
        let mut a = globe(10.0, 20.0);
        a.pointer_down(DVec2::new(50.0, 50.0));
        for p in [(80.0, 10.0), (-30.0, 140.0), (55.0, 42.0)] {
            a.pointer_move(DVec2::new(p.0, p.1));
        }
        a.pointer_move(DVec2::new(70.0, 30.0));

        let mut b = globe(10.0, 20.0);
        b.pointer_down(DVec2::new(50.0, 50.0));
        b.pointer_move(DVec2::new(70.0, 30.0));

        assert_eq!(a.rotation(), b.rotation());
        assert_close(a.rotation().lambda, -20.0 + 10.0);
        assert_close(a.rotation().phi, -10.0 + 10.0);
        assert_eq!(a.scene(), b.scene());
    }

    #[test]
    fn test_moves_without_drag_are_ignored() {
        let mut globe = globe(0.0, 0.0);
        assert!(!globe.pointer_move(DVec2::new(30.0, 30.0)));
        assert_eq!(globe.rotation(), globe.initial_rotation());

        globe.pointer_down(DVec2::ZERO);
        assert!(globe.pointer_move(DVec2::new(30.0, 30.0)));
        globe.pointer_up();
        assert!(!globe.pointer_move(DVec2::new(60.0, 60.0)));
        assert_eq!(globe.surface().present_count(), 2);
    }

    #[test]
    fn test_double_click_resets_rotation() {
        let mut globe = globe(-33.0, 151.0);
        globe.pointer_down(DVec2::new(10.0, 10.0));
        globe.pointer_move(DVec2::new(90.0, -40.0));
        globe.pointer_up();
        globe.pointer_down(DVec2::new(0.0, 0.0));
        globe.pointer_move(DVec2::new(-200.0, 75.0));
        globe.pointer_up();
        assert_ne!(globe.rotation(), globe.initial_rotation());

        globe.double_click();
        assert_eq!(globe.rotation(), Rotation::new(-151.0, 33.0, 0.0));
        assert_eq!(globe.scene().shape_count(LayerKind::Marker), 1);
    }

    #[test]
    fn test_marker_visibility_at_horizon() {
        let rotated = |dx: f64| {
            let mut globe = globe(0.0, 0.0);
            globe.pointer_down(DVec2::ZERO);
            globe.pointer_move(DVec2::new(dx, 0.0));
            globe
        };

        // 178 px is 89°, 180 px exactly 90°, 182 px is 91°.
        assert_eq!(rotated(178.0).scene().shape_count(LayerKind::Marker), 1);
        assert_eq!(rotated(180.0).scene().shape_count(LayerKind::Marker), 1);
        assert_eq!(rotated(182.0).scene().shape_count(LayerKind::Marker), 0);
        assert!(rotated(180.0).marker_visible());
        assert!(!rotated(182.0).marker_visible());
    }

    #[test]
    fn test_shading_is_not_interactive() {
        let globe = globe(0.0, 0.0);
        match &globe.scene().layer(LayerKind::Shading).unwrap().shapes[0] {
            Shape::Circle { style, radius, .. } => {
                assert!(!style.interactive);
                assert_close(*radius, 100.0);
                assert_eq!(style.fill, Paint::Gradient("gradient-Pica_pica".to_string()));
            }
            other => panic!("unexpected shading shape {other:?}"),
        }
    }
}
