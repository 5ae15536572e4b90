#![warn(clippy::all)]

//! Species Atlas - species cards with an interactive globe and range map.
//!
//! The geographic core projects country boundaries and occurrence points
//! onto two kinds of vector map: an orthographic globe that can be dragged
//! around, and a flat equirectangular range map. Maps are described as
//! [`scene::Scene`]s and drawn by interchangeable [`render::Surface`]s: SVG
//! markup, the browser DOM, or the egui painter.
//!
//! Around that core sit the GBIF client, persisted settings, translations,
//! and the eframe viewer application.

pub mod app;
pub mod card;
pub mod catalog;
pub mod conservation;
pub mod gbif;
pub mod geo;
pub mod globe;
pub mod i18n;
pub mod interaction;
pub mod loader;
pub mod range_map;
pub mod render;
pub mod scene;
pub mod settings;
pub mod state;
mod ui;

pub use app::SpeciesAtlasApp;
pub use globe::GlobeRenderer;
pub use range_map::{OccurrenceFeature, RangeMapRenderer};
