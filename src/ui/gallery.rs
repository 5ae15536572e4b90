//! Gallery view: one card per species.
//!
//! The globe on each card is driven by egui pointer responses: drag to
//! rotate, double click to reset. The range map shows occurrence tooltips
//! on hover.

use super::colors;
use crate::card::SpeciesCard;
use crate::conservation::IucnCategory;
use crate::render::paint_scene;
use crate::scene::Scene;
use crate::state::AppState;
use eframe::egui::{self, Pos2, RichText, ScrollArea, Sense, Vec2};
use glam::DVec2;

pub fn render_gallery(ctx: &egui::Context, state: &AppState, cards: &mut [SpeciesCard]) {
    let settings = state.settings.settings().clone();

    egui::CentralPanel::default().show(ctx, |ui| {
        ScrollArea::vertical().show(ui, |ui| {
            for card in cards.iter_mut() {
                egui::Frame::group(ui.style())
                    .fill(colors::card::BACKGROUND)
                    .stroke(egui::Stroke::new(1.0, colors::card::BORDER))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        render_card_header(ui, card, settings.show_conservation_status);

                        if card.is_loading() {
                            ui.spinner();
                            return;
                        }

                        ui.horizontal_top(|ui| {
                            if settings.show_taxon_image {
                                render_globe(ui, card);
                            }
                            if settings.show_taxon_range {
                                render_range_map(ui, card);
                            }
                        });
                    });
                ui.add_space(8.0);
            }
        });
    });
}

fn render_card_header(ui: &mut egui::Ui, card: &SpeciesCard, show_status: bool) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(card.binomial())
                .italics()
                .size(16.0)
                .color(colors::card::BINOMIAL),
        );

        if show_status {
            if let Some(category) = card.iucn() {
                render_status_badge(ui, category);
            }
        }

        if let Some(profile) = card.profile() {
            ui.label(
                RichText::new(format!("{} occurrences", profile.occurrences.len()))
                    .small()
                    .color(colors::ui::LABEL),
            );
        }
    });
}

fn render_status_badge(ui: &mut egui::Ui, category: IucnCategory) {
    egui::Frame::new()
        .fill(category.color())
        .corner_radius(4.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(
                RichText::new(category.code())
                    .strong()
                    .color(category.text_color()),
            );
        })
        .response
        .on_hover_text(category.label());
}

fn render_globe(ui: &mut egui::Ui, card: &mut SpeciesCard) {
    let Some(globe) = card.globe_mut() else {
        return;
    };

    let size = globe.diameter() as f32;
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), Sense::click_and_drag());

    if response.drag_started() {
        let press = ui.input(|i| i.pointer.press_origin());
        if let Some(pos) = drag_anchor(press, response.interact_pointer_pos()) {
            globe.pointer_down(local_pos(rect.min, pos));
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            globe.pointer_move(local_pos(rect.min, pos));
        }
    }
    if response.drag_stopped() {
        globe.pointer_up();
    }
    if response.double_clicked() {
        globe.double_click();
    }

    paint_scene(ui.painter(), rect.min, globe.scene());
}

fn render_range_map(ui: &mut egui::Ui, card: &SpeciesCard) {
    let Some(range_map) = card.range_map() else {
        return;
    };

    let size = Vec2::new(range_map.width() as f32, range_map.height() as f32);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let scene: &Scene = range_map.scene();
    paint_scene(ui.painter(), rect.min, scene);

    if let Some(pos) = response.hover_pos() {
        if let Some(title) = scene.title_at(local_pos(rect.min, pos)) {
            response.on_hover_text(title);
        }
    }
}

/// Where a globe drag starts.
///
/// egui reports a drag only once the pointer has moved past its threshold,
/// so the press position is used when known and the rotation keeps the
/// movement made before the drag registered.
fn drag_anchor(press_origin: Option<Pos2>, current: Option<Pos2>) -> Option<Pos2> {
    press_origin.or(current)
}

fn local_pos(origin: Pos2, pos: Pos2) -> DVec2 {
    DVec2::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}
