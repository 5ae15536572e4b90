//! Centralized color constants for the UI.
//!
//! Map colors live in [`crate::scene::colors`]; these cover the panels
//! around the maps.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for secondary labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Emphasized color for headings.
    pub const TITLE: Color32 = Color32::WHITE;
    /// Success/positive indicator.
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
}

/// Colors for species cards.
pub mod card {
    use super::Color32;

    /// Card background.
    pub const BACKGROUND: Color32 = Color32::from_rgb(30, 30, 40);
    /// Card border.
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 80);
    /// Binomial name.
    pub const BINOMIAL: Color32 = Color32::from_rgb(220, 220, 230);
}
