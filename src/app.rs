//! The species atlas viewer application.

use crate::card::SpeciesCard;
use crate::catalog::DEFAULT_SPECIES;
use crate::geo::WorldBoundaries;
use crate::loader::{BoundaryChannel, ProfileChannel, BOUNDARIES_URL};
use crate::state::{AppState, View};
use crate::ui;
use eframe::egui;
use std::sync::Arc;

/// Main application state and logic.
pub struct SpeciesAtlasApp {
    /// Application state shared with the UI panels
    state: AppState,

    /// One card per species in the gallery
    cards: Vec<SpeciesCard>,

    /// Country boundaries, once downloaded
    boundaries: Option<Arc<WorldBoundaries>>,

    /// Channel for the boundary download
    boundary_channel: BoundaryChannel,

    /// Channel for species profile lookups
    profile_channel: ProfileChannel,

    /// Why the boundary download failed, if it did
    boundary_error: Option<String>,
}

impl SpeciesAtlasApp {
    /// Creates the app and starts loading boundaries and profiles.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let mut app = Self {
            state: AppState::new(),
            cards: DEFAULT_SPECIES.iter().map(|&b| SpeciesCard::new(b)).collect(),
            boundaries: None,
            boundary_channel: BoundaryChannel::new(),
            profile_channel: ProfileChannel::new(),
            boundary_error: None,
        };

        app.boundary_channel.load(cc.egui_ctx.clone(), BOUNDARIES_URL);
        for card in &app.cards {
            app.profile_channel.request(cc.egui_ctx.clone(), card.binomial());
        }
        log::info!("Species atlas started with {} species", app.cards.len());
        app
    }

    /// Applies finished background loads.
    fn poll_channels(&mut self) {
        if let Some(result) = self.boundary_channel.try_recv() {
            match result {
                Ok(boundaries) => {
                    log::info!(
                        "World boundaries ready: {} countries, {} vertices",
                        boundaries.countries.len(),
                        boundaries.vertex_count()
                    );
                    for card in &mut self.cards {
                        card.ensure_renderers(&boundaries);
                    }
                    self.boundaries = Some(boundaries);
                }
                Err(e) => {
                    log::error!("Failed to load world boundaries: {}", e);
                    self.boundary_error = Some(e.to_string());
                    // Maps still draw water, graticule and occurrences.
                    let empty = Arc::new(WorldBoundaries::default());
                    for card in &mut self.cards {
                        card.ensure_renderers(&empty);
                    }
                    self.boundaries = Some(empty);
                }
            }
        }

        while let Some(profile) = self.profile_channel.try_recv() {
            let boundaries = self.boundaries.as_ref();
            match self
                .cards
                .iter_mut()
                .find(|card| card.binomial() == profile.binomial)
            {
                Some(card) => card.set_profile(profile, boundaries),
                None => log::warn!("Received profile for unknown species {:?}", profile.binomial),
            }
        }

        let loading = self.boundary_channel.is_loading() || self.profile_channel.pending() > 0;
        self.state.status_message = if loading {
            format!("Loading… ({} species pending)", self.profile_channel.pending())
        } else if let Some(error) = &self.boundary_error {
            format!("Boundary data unavailable: {}", error)
        } else {
            "Ready".to_string()
        };
    }
}

impl eframe::App for SpeciesAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_channels();

        ui::render_top_bar(ctx, &mut self.state);

        match self.state.view {
            View::Gallery => ui::render_gallery(ctx, &self.state, &mut self.cards),
            View::Settings => ui::render_settings(ctx, &mut self.state),
        }
    }
}
