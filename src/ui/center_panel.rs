use eframe::egui;
use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};

use crate::model::transcript::{Transcript, EXPORT_FILE_NAME};
use crate::model::turn::Turn;
use crate::ui::app::DungeonApp;
use crate::ui::audio::play_narration;
use crate::ui::settings::UiSettings;

pub fn draw_center_panel(ctx: &egui::Context, app: &mut DungeonApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            draw_header(ui, app);
            draw_input(ui, app);
            draw_status(ui, app);
        });

        ui.separator();

        if !app.ui.transcript.is_empty() {
            ui.vertical_centered(|ui| {
                if ui.button("💾 Download Story").clicked() {
                    download_story(app);
                }
                if let Some(notice) = &app.ui.notice {
                    ui.weak(notice);
                }
            });
            ui.add_space(8.0);
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for (idx, turn) in app.ui.transcript.feed() {
                    draw_turn_card(ui, app, idx, turn);
                }
            });
    });
}

fn draw_header(ui: &mut egui::Ui, app: &DungeonApp) {
    ui.add_space(8.0);
    ui.label(
        egui::RichText::new("Dungeon Scribe")
            .size(40.0)
            .strong()
            .color(app.settings.color("Title")),
    );
    ui.label(
        egui::RichText::new(format!(
            "Mode: {} Adventure | Powered by GenAI",
            app.settings.story.genre.label()
        ))
        .color(egui::Color32::from_rgb(178, 190, 195)),
    );
    ui.add_space(16.0);
}

fn draw_input(ui: &mut egui::Ui, app: &mut DungeonApp) {
    let busy = app.ui.is_busy();

    let response = ui.add_enabled(
        !busy,
        egui::TextEdit::singleline(&mut app.ui.input_text)
            .hint_text("What do you do next?")
            .desired_width(ui.available_width() * 0.7),
    );
    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    ui.add_space(8.0);
    let clicked = ui
        .add_enabled(!busy, egui::Button::new("Take Action ➡"))
        .clicked();

    if clicked || enter {
        app.submit_action();
        response.request_focus();
    }
}

fn draw_status(ui: &mut egui::Ui, app: &DungeonApp) {
    if let Some(stage) = app.ui.stage.filter(|_| app.ui.is_busy()) {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(stage.label());
        });
    }
    if let Some(err) = &app.ui.last_error {
        ui.colored_label(egui::Color32::LIGHT_RED, err);
    }
}

fn draw_turn_card(ui: &mut egui::Ui, app: &DungeonApp, idx: usize, turn: &Turn) {
    let settings: &UiSettings = &app.settings;

    egui::Frame::new()
        .fill(settings.color("Card"))
        .corner_radius(egui::CornerRadius::same(12))
        .inner_margin(egui::Margin::same(16))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "👤 {}: {}",
                        app.settings.story.character_name,
                        turn.player_action()
                    ))
                    .strong()
                    .color(settings.color("Player")),
                );
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(format!("🔮 {}", turn.narrative()))
                        .color(settings.color("Story")),
                );

                if let Some(texture) = app.ui.textures.get(&idx) {
                    ui.add_space(8.0);
                    ui.add(egui::Image::new(texture).max_width(480.0));
                } else if let Some(note) = turn.illustration().note() {
                    ui.weak(format!("No image: {note}"));
                }

                if let Some(narration) = turn.narration().artifact() {
                    ui.add_space(6.0);
                    if ui.button("🔊 Play narration").clicked() {
                        play_narration(&narration.path);
                    }
                } else if let Some(note) = turn.narration().note() {
                    ui.weak(format!("No narration: {note}"));
                }
            });
        });
    ui.add_space(12.0);
}

fn download_story(app: &mut DungeonApp) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("Text", &["txt"])
        .save_file()
    else {
        return;
    };

    app.ui.notice = Some(match save_transcript(&path, &app.ui.transcript) {
        Ok(()) => {
            info!("story saved to {}", path.display());
            format!("Saved to {}", path.display())
        }
        Err(e) => {
            warn!("could not save story to {}: {e}", path.display());
            format!("Could not save: {e}")
        }
    });
}

/// Writes the plain text export of `transcript` to `path`.
pub fn save_transcript(path: &Path, transcript: &Transcript) -> io::Result<()> {
    fs::write(path, transcript.export_text())
}
