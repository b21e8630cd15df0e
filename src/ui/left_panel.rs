use eframe::egui;

use crate::model::genre::Genre;
use crate::model::story_settings::{MAX_CREATIVITY, MIN_CREATIVITY};
use crate::ui::app::DungeonApp;

pub fn draw_left_panel(ctx: &egui::Context, app: &mut DungeonApp) {
    egui::SidePanel::left("sidebar")
        .resizable(false)
        .default_width(230.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    draw_genre(ui, app);
                    ui.separator();
                    draw_profile(ui, app);
                    ui.separator();
                    draw_options(ui, app);
                    ui.separator();

                    let busy = app.ui.is_busy();
                    if ui
                        .add_enabled(!busy, egui::Button::new("🗑 Reset Story"))
                        .clicked()
                    {
                        app.reset_story();
                    }
                });
            });
        });
}

fn draw_genre(ui: &mut egui::Ui, app: &mut DungeonApp) {
    let story = &mut app.settings.story;

    ui.heading("🎭 Select Genre");
    egui::ComboBox::from_id_salt("genre")
        .selected_text(story.genre.label().to_string())
        .show_ui(ui, |ui| {
            for genre in Genre::ALL {
                let label = genre.label().to_string();
                ui.selectable_value(&mut story.genre, genre, label);
            }
        });
}

fn draw_profile(ui: &mut egui::Ui, app: &mut DungeonApp) {
    let story = &mut app.settings.story;

    ui.heading("🎒 Character Profile");

    ui.label("Name");
    ui.text_edit_singleline(&mut story.character_name);

    ui.label("Inventory");
    ui.add(egui::TextEdit::multiline(&mut story.inventory).desired_rows(3));
}

fn draw_options(ui: &mut egui::Ui, app: &mut DungeonApp) {
    ui.heading("⚙ Settings");

    let story = &mut app.settings.story;
    ui.checkbox(&mut story.enable_voice, "Enable Voice");
    ui.checkbox(&mut story.enable_image, "Generate Images");

    ui.label("Creativity");
    ui.add(egui::Slider::new(
        &mut story.creativity,
        MIN_CREATIVITY..=MAX_CREATIVITY,
    ));

    ui.label("UI Scale");
    ui.add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0));
}
