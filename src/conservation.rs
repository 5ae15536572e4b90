//! IUCN Red List categories.

use eframe::egui::Color32;
use std::fmt;

/// Red List category, from extinct to not evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IucnCategory {
    Extinct,
    ExtinctInTheWild,
    CriticallyEndangered,
    Endangered,
    Vulnerable,
    NearThreatened,
    LeastConcern,
    DataDeficient,
    NotEvaluated,
}

impl IucnCategory {
    pub const ALL: [IucnCategory; 9] = [
        IucnCategory::Extinct,
        IucnCategory::ExtinctInTheWild,
        IucnCategory::CriticallyEndangered,
        IucnCategory::Endangered,
        IucnCategory::Vulnerable,
        IucnCategory::NearThreatened,
        IucnCategory::LeastConcern,
        IucnCategory::DataDeficient,
        IucnCategory::NotEvaluated,
    ];

    /// Parses a two-letter code such as `LC`. Case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(code))
    }

    pub fn code(self) -> &'static str {
        match self {
            IucnCategory::Extinct => "EX",
            IucnCategory::ExtinctInTheWild => "EW",
            IucnCategory::CriticallyEndangered => "CR",
            IucnCategory::Endangered => "EN",
            IucnCategory::Vulnerable => "VU",
            IucnCategory::NearThreatened => "NT",
            IucnCategory::LeastConcern => "LC",
            IucnCategory::DataDeficient => "DD",
            IucnCategory::NotEvaluated => "NE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IucnCategory::Extinct => "Extinct",
            IucnCategory::ExtinctInTheWild => "Extinct in the Wild",
            IucnCategory::CriticallyEndangered => "Critically Endangered",
            IucnCategory::Endangered => "Endangered",
            IucnCategory::Vulnerable => "Vulnerable",
            IucnCategory::NearThreatened => "Near Threatened",
            IucnCategory::LeastConcern => "Least Concern",
            IucnCategory::DataDeficient => "Data Deficient",
            IucnCategory::NotEvaluated => "Not Evaluated",
        }
    }

    /// Badge color from the Red List palette.
    pub fn color(self) -> Color32 {
        match self {
            IucnCategory::Extinct => Color32::from_rgb(0x00, 0x00, 0x00),
            IucnCategory::ExtinctInTheWild => Color32::from_rgb(0x54, 0x23, 0x44),
            IucnCategory::CriticallyEndangered => Color32::from_rgb(0xD8, 0x1E, 0x05),
            IucnCategory::Endangered => Color32::from_rgb(0xFC, 0x7F, 0x3F),
            IucnCategory::Vulnerable => Color32::from_rgb(0xF9, 0xE8, 0x14),
            IucnCategory::NearThreatened => Color32::from_rgb(0xCC, 0xE2, 0x26),
            IucnCategory::LeastConcern => Color32::from_rgb(0x60, 0xC6, 0x59),
            IucnCategory::DataDeficient => Color32::from_rgb(0xD1, 0xD1, 0xC6),
            IucnCategory::NotEvaluated => Color32::from_rgb(0xFF, 0xFF, 0xFF),
        }
    }

    /// Text color readable on top of [`IucnCategory::color`].
    pub fn text_color(self) -> Color32 {
        match self {
            IucnCategory::Extinct
            | IucnCategory::ExtinctInTheWild
            | IucnCategory::CriticallyEndangered => Color32::WHITE,
            _ => Color32::BLACK,
        }
    }
}

impl fmt::Display for IucnCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}
