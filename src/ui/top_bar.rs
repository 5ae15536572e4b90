//! Top bar UI: app title, navigation, and status.

use super::colors;
use crate::i18n::Message;
use crate::state::{AppState, View};
use eframe::egui::{self, Color32, RichText};
use egui_phosphor::regular as icons;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new(format!("{} {}", icons::PLANT, state.t(Message::GardenSpecies)))
                        .strong()
                        .size(16.0)
                        .color(colors::ui::TITLE),
                );

                ui.separator();

                match state.view {
                    View::Gallery => {
                        let label = format!("{} {}", icons::GEAR, state.t(Message::Settings));
                        if ui.button(label).clicked() {
                            state.view = View::Settings;
                        }
                    }
                    View::Settings => {
                        let label =
                            format!("{} {}", icons::ARROW_LEFT, state.t(Message::BackToGallery));
                        if ui.button(label).clicked() {
                            state.view = View::Gallery;
                        }
                    }
                }

                ui.separator();

                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );
            });
        });
}
