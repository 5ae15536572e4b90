//! Centralized color constants for map rendering.
//!
//! Both renderers and every draw backend pull their palette from here.

use eframe::egui::Color32;

/// Colors for the physical map.
pub mod map {
    use super::Color32;

    /// Ocean fill.
    pub const WATER: Color32 = Color32::from_rgb(0xC6, 0xEC, 0xFF);
    /// Outline around the globe's water disc.
    pub const WATER_OUTLINE: Color32 = Color32::from_rgb(0x65, 0x65, 0x65);
    /// Country fill.
    pub const LAND: Color32 = Color32::from_rgb(0xFD, 0xFB, 0xEA);
    /// Interior country borders.
    pub const BORDER: Color32 = Color32::from_rgb(0x65, 0x65, 0x65);
    /// Coastlines.
    pub const COAST: Color32 = Color32::from_rgb(0x09, 0x78, 0xAB);
    /// Graticule lines.
    pub const GRATICULE: Color32 = Color32::from_rgb(0x77, 0x77, 0x77);
}

/// Colors for overlays drawn on top of the map.
pub mod overlay {
    use super::Color32;

    /// Location marker and occurrence dots.
    pub const MARKER: Color32 = Color32::from_rgb(0xB1, 0x00, 0x00);
    /// Halo around occurrence dots.
    pub const HALO: Color32 = Color32::WHITE;
}

/// Gradient stops for the globe shading.
pub mod shading {
    use super::Color32;

    pub const HIGHLIGHT: Color32 = Color32::WHITE;
    pub const SHADOW: Color32 = Color32::from_rgb(0x00, 0x00, 0x99);
    /// Opacity applied to both stops.
    pub const OPACITY: f32 = 0.3;
}
