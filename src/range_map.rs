//! Flat world map with species occurrence points.

use crate::geo::{
    graticule, lines_path, polygons_path, Equirectangular, GeoCoordinate, Projection,
    WorldBoundaries,
};
use crate::render::Surface;
use crate::scene::{colors, dom_id, Layer, LayerKind, Scene, Shape, Style};
use geo_types::MultiLineString;
use geojson::{FeatureCollection, GeoJson, JsonValue};
use glam::DVec2;
use std::sync::Arc;

/// Pixel position given to points that cannot be projected, keeping one
/// element per occurrence.
pub const OFFSCREEN_POSITION: DVec2 = DVec2::new(-9999.0, -9999.0);

const GRATICULE_STEP: f64 = 30.0;
const LINE_WIDTH: f64 = 0.5;
const GRATICULE_OPACITY: f32 = 0.3;
const POINT_RADIUS: f64 = 2.0;
const POINT_FILL_OPACITY: f32 = 0.6;
const POINT_HALO_WIDTH: f64 = 0.5;
const POINT_HALO_OPACITY: f32 = 0.8;

/// A single geotagged observation.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceFeature {
    pub coordinate: GeoCoordinate,
    pub country: Option<String>,
    pub year: Option<i32>,
    pub basis_of_record: Option<String>,
}

impl OccurrenceFeature {
    pub fn new(coordinate: GeoCoordinate) -> Self {
        Self {
            coordinate,
            country: None,
            year: None,
            basis_of_record: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Hover text in the form `"{country}, {year}"`.
    pub fn tooltip(&self) -> String {
        let country = self
            .country
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("Unknown");
        match self.year {
            Some(year) => format!("{country}, {year}"),
            None => format!("{country}, Unknown year"),
        }
    }

    /// Reads an occurrence from a GeoJSON point feature.
    ///
    /// Returns `None` for features without point geometry.
    pub fn from_feature(feature: &geojson::Feature) -> Option<Self> {
        let geometry = feature.geometry.as_ref()?;
        let position = match &geometry.value {
            geojson::Value::Point(position) => position,
            _ => return None,
        };
        let (lon, lat) = match position.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            _ => return None,
        };

        let text = |key: &str| match feature.property(key) {
            Some(JsonValue::String(s)) => Some(s.clone()),
            _ => None,
        };
        let year = feature
            .property("year")
            .and_then(JsonValue::as_i64)
            .and_then(|y| i32::try_from(y).ok());

        Some(Self {
            coordinate: GeoCoordinate::new(lon, lat),
            country: text("country"),
            year,
            basis_of_record: text("basisOfRecord"),
        })
    }
}

/// Parses a GeoJSON feature collection into occurrences, skipping features
/// that are not points.
pub fn occurrences_from_geojson(json: &str) -> Result<Vec<OccurrenceFeature>, geojson::Error> {
    let geojson: GeoJson = json.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;
    Ok(collection
        .features
        .iter()
        .filter_map(OccurrenceFeature::from_feature)
        .collect())
}

/// Renders an equirectangular world map with an occurrence overlay.
pub struct RangeMapRenderer<S: Surface> {
    surface: S,
    projection: Equirectangular,
    boundaries: Arc<WorldBoundaries>,
    graticule: MultiLineString<f64>,
    width: f64,
    height: f64,
    id: String,
    occurrences: Vec<OccurrenceFeature>,
    scene: Scene,
}

impl<S: Surface> RangeMapRenderer<S> {
    /// Builds the map at the given width (height is half of it) and draws
    /// the initial occurrences.
    pub fn create(
        surface: S,
        width: f64,
        title: &str,
        occurrences: Vec<OccurrenceFeature>,
        boundaries: Arc<WorldBoundaries>,
    ) -> Self {
        let id = dom_id(title);
        let height = width / 2.0;
        log::debug!(
            "Creating range map {id} with {} occurrences",
            occurrences.len()
        );

        let mut map = Self {
            surface,
            projection: Equirectangular::for_width(width),
            boundaries,
            graticule: graticule(GRATICULE_STEP),
            width,
            height,
            scene: Scene::new(format!("{id}-range-map"), width, height),
            id,
            occurrences,
        };
        map.redraw();
        map
    }

    /// Replaces the occurrence overlay. Nothing of the previous list is
    /// kept.
    pub fn update_occurrences(&mut self, occurrences: Vec<OccurrenceFeature>) {
        log::debug!(
            "Range map {} updated with {} occurrences",
            self.id,
            occurrences.len()
        );
        self.occurrences = occurrences;
        self.redraw();
    }

    /// Re-projects every layer and redraws the current occurrences.
    pub fn redraw(&mut self) {
        self.scene = self.build_scene();
        self.surface.present(&self.scene);
    }

    pub fn occurrences(&self) -> &[OccurrenceFeature] {
        &self.occurrences
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Pixel position of an occurrence, or [`OFFSCREEN_POSITION`] when it
    /// cannot be projected.
    pub fn point_position(&self, occurrence: &OccurrenceFeature) -> DVec2 {
        self.projection
            .project(occurrence.coordinate)
            .unwrap_or(OFFSCREEN_POSITION)
    }

    fn build_scene(&self) -> Scene {
        let mut scene = Scene::new(format!("{}-range-map", self.id), self.width, self.height)
            .with_view_box();

        scene.push_layer(Layer::new(LayerKind::Water).with_shape(Shape::Rect {
            class: "water",
            min: DVec2::ZERO,
            size: DVec2::new(self.width, self.height),
            style: Style::filled(colors::map::WATER),
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

        let point_style = Style::filled(colors::overlay::MARKER)
            .with_fill_opacity(POINT_FILL_OPACITY)
            .with_stroke(colors::overlay::HALO, POINT_HALO_WIDTH)
            .with_stroke_opacity(POINT_HALO_OPACITY);
        let mut points = Layer::new(LayerKind::Occurrences);
        for occurrence in &self.occurrences {
            points.shapes.push(Shape::Circle {
                class: "occurrence-point",
                center: self.point_position(occurrence),
                radius: POINT_RADIUS,
                style: point_style.clone(),
                title: Some(occurrence.tooltip()),
            });
        }
        scene.push_layer(points);

        scene
    }
}
