//! Per-species gallery card state.
//!
//! A card owns one globe and one range map. Both are created once the
//! species profile and the world boundaries are available.

use crate::conservation::IucnCategory;
use crate::gbif::SpeciesProfile;
use crate::geo::{GeoCoordinate, WorldBoundaries};
use crate::globe::GlobeRenderer;
use crate::range_map::RangeMapRenderer;
use crate::render::RetainedScene;
use std::sync::Arc;

/// Diameter of the globe on a card, in pixels.
pub const GLOBE_DIAMETER: f64 = 220.0;
/// Width of the range map on a card, in pixels.
pub const RANGE_MAP_WIDTH: f64 = 440.0;

pub struct SpeciesCard {
    binomial: String,
    profile: Option<SpeciesProfile>,
    globe: Option<GlobeRenderer<RetainedScene>>,
    range_map: Option<RangeMapRenderer<RetainedScene>>,
}

impl SpeciesCard {
    pub fn new(binomial: impl Into<String>) -> Self {
        Self {
            binomial: binomial.into(),
            profile: None,
            globe: None,
            range_map: None,
        }
    }

    pub fn binomial(&self) -> &str {
        &self.binomial
    }

    pub fn profile(&self) -> Option<&SpeciesProfile> {
        self.profile.as_ref()
    }

    /// True until the profile lookup has finished.
    pub fn is_loading(&self) -> bool {
        self.profile.is_none()
    }

    pub fn iucn(&self) -> Option<IucnCategory> {
        self.profile.as_ref().and_then(|p| p.iucn)
    }

    /// Where the globe is centered: the mean occurrence position, or the
    /// null island when nothing is known.
    pub fn globe_center(&self) -> GeoCoordinate {
        self.profile
            .as_ref()
            .and_then(SpeciesProfile::mean_position)
            .unwrap_or_else(|| GeoCoordinate::new(0.0, 0.0))
    }

    /// Stores a fetched profile and refreshes the renderers.
    ///
    /// An existing range map keeps its surface and only swaps its
    /// occurrences; the globe is rebuilt around the new center.
    pub fn set_profile(
        &mut self,
        profile: SpeciesProfile,
        boundaries: Option<&Arc<WorldBoundaries>>,
    ) {
        let occurrences = profile.occurrences.clone();
        self.profile = Some(profile);
        self.globe = None;
        if let Some(range_map) = &mut self.range_map {
            range_map.update_occurrences(occurrences);
        }
        if let Some(boundaries) = boundaries {
            self.ensure_renderers(boundaries);
        }
    }

    /// Creates whichever renderers are still missing, if the profile is
    /// known.
    pub fn ensure_renderers(&mut self, boundaries: &Arc<WorldBoundaries>) {
        let Some(profile) = &self.profile else {
            return;
        };

        if self.globe.is_none() {
            let center = self.globe_center();
            self.globe = Some(GlobeRenderer::create(
                RetainedScene::new(),
                GLOBE_DIAMETER,
                &self.binomial,
                center.lat(),
                center.lon(),
                Arc::clone(boundaries),
            ));
        }
        if self.range_map.is_none() {
            self.range_map = Some(RangeMapRenderer::create(
                RetainedScene::new(),
                RANGE_MAP_WIDTH,
                &self.binomial,
                profile.occurrences.clone(),
                Arc::clone(boundaries),
            ));
        }
    }

    pub fn globe(&self) -> Option<&GlobeRenderer<RetainedScene>> {
        self.globe.as_ref()
    }

    pub fn globe_mut(&mut self) -> Option<&mut GlobeRenderer<RetainedScene>> {
        self.globe.as_mut()
    }

    pub fn range_map(&self) -> Option<&RangeMapRenderer<RetainedScene>> {
        self.range_map.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range_map::OccurrenceFeature;
    use crate::scene::LayerKind;

    fn profile(points: &[(f64, f64)]) -> SpeciesProfile {
        SpeciesProfile {
            occurrences: points
                .iter()
                .map(|&(lon, lat)| OccurrenceFeature::new(GeoCoordinate::new(lon, lat)))
                .collect(),
            ..SpeciesProfile::new("Pica pica")
        }
    }

    #[test]
    fn test_renderers_wait_for_profile_and_boundaries() {
        let boundaries = Arc::new(WorldBoundaries::default());
        let mut card = SpeciesCard::new("Pica pica");
        card.ensure_renderers(&boundaries);
        assert!(card.globe().is_none());
        assert!(card.is_loading());

        card.set_profile(profile(&[(10.0, 50.0)]), None);
        assert!(card.globe().is_none());

        card.ensure_renderers(&boundaries);
        assert!(card.globe().is_some());
        let range_map = card.range_map().unwrap();
        assert_eq!(range_map.scene().shape_count(LayerKind::Occurrences), 1);
    }

    #[test]
    fn test_globe_centers_on_occurrences() {
        let boundaries = Arc::new(WorldBoundaries::default());
        let mut card = SpeciesCard::new("Pica pica");
        card.set_profile(profile(&[(20.0, 0.0), (20.0, 0.0)]), Some(&boundaries));

        let rotation = card.globe().unwrap().rotation();
        assert!((rotation.lambda + 20.0).abs() < 1e-9);
        assert!(rotation.phi.abs() < 1e-9);
    }

    #[test]
    fn test_new_profile_replaces_occurrences() {
        let boundaries = Arc::new(WorldBoundaries::default());
        let mut card = SpeciesCard::new("Pica pica");
        card.set_profile(profile(&[(1.0, 1.0), (2.0, 2.0)]), Some(&boundaries));
        card.set_profile(profile(&[]), Some(&boundaries));

        let range_map = card.range_map().unwrap();
        assert_eq!(range_map.scene().shape_count(LayerKind::Occurrences), 0);
        assert_eq!(card.globe_center(), GeoCoordinate::new(0.0, 0.0));
    }
}
