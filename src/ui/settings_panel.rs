//! Settings view: display toggles, Wikimedia account, and language.

use super::colors;
use crate::i18n::{Locale, Message};
use crate::state::AppState;
use eframe::egui::{self, RichText, ScrollArea};

pub fn render_settings(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ScrollArea::vertical().show(ui, |ui| {
            ui.heading(state.t(Message::Settings));
            ui.separator();

            render_visibility_section(ui, state);
            ui.add_space(10.0);

            render_wikimedia_section(ui, state);
            ui.add_space(10.0);

            render_language_section(ui, state);
            ui.add_space(10.0);

            ui.label(
                RichText::new(state.t(Message::SettingsSaved))
                    .small()
                    .color(colors::ui::SUCCESS),
            );
        });
    });
}

fn render_visibility_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new(state.t(Message::VisibilitySettings)).strong())
        .default_open(true)
        .show(ui, |ui| {
            ui.label(
                RichText::new(state.t(Message::VisibilityDescription)).color(colors::ui::LABEL),
            );

            let mut edited = state.settings.settings().clone();
            ui.checkbox(&mut edited.show_taxon_image, state.t(Message::ShowTaxonImage));
            ui.checkbox(&mut edited.show_taxon_range, state.t(Message::ShowTaxonRange));
            ui.checkbox(
                &mut edited.show_conservation_status,
                state.t(Message::ShowConservationStatus),
            );
            if state.settings.apply(&edited) {
                log::debug!("Visibility settings changed");
            }
        });
}

fn render_wikimedia_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new(state.t(Message::WikimediaIntegration)).strong())
        .default_open(true)
        .show(ui, |ui| {
            ui.label(
                RichText::new(state.t(Message::WikimediaDescription)).color(colors::ui::LABEL),
            );

            let mut username = state.settings.settings().wikimedia_username.clone();
            ui.horizontal(|ui| {
                ui.label(state.t(Message::WikimediaUsername));
                ui.add(
                    egui::TextEdit::singleline(&mut username)
                        .hint_text(state.t(Message::WikimediaUsernamePlaceholder))
                        .desired_width(200.0),
                )
                .on_hover_text(state.t(Message::InputWikimediaUsername));
            });
            if username != state.settings.settings().wikimedia_username {
                state.settings.set_wikimedia_username(username);
            }
        });
}

fn render_language_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::ComboBox::from_id_salt("locale_selector")
        .selected_text(state.locale.native_name())
        .width(150.0)
        .show_ui(ui, |ui| {
            for locale in Locale::ALL {
                ui.selectable_value(&mut state.locale, locale, locale.native_name());
            }
        });
}
