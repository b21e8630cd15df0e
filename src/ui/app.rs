use eframe::egui;
use std::collections::HashMap;
use std::sync::mpsc;

use log::{error, warn};

use crate::config::AppConfig;
use crate::engine::engine::EngineHandle;
use crate::engine::illustration::InferenceApiIllustrator;
use crate::engine::llm_client::TextModel;
use crate::engine::narrator::TranslateTts;
use crate::engine::pipeline::{TurnPipeline, TurnStage};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::session::Session;
use crate::model::transcript::Transcript;
use crate::model::turn::Illustration;
use crate::ui::settings::UiSettings;
use crate::ui::settings_io::save_settings;

/* =========================
   UI State
   ========================= */

#[derive(Default)]
pub struct UiState {
    pub input_text: String,
    pub transcript: Transcript,
    pub stage: Option<TurnStage>,
    pub last_error: Option<String>,
    pub notice: Option<String>,

    /// Illustration textures keyed by turn index.
    pub textures: HashMap<usize, egui::TextureHandle>,
}

impl UiState {
    pub fn is_busy(&self) -> bool {
        matches!(
            self.stage,
            Some(TurnStage::Generating | TurnStage::Illustrating | TurnStage::Narrating)
        )
    }
}

/* =========================
   App
   ========================= */

pub struct DungeonApp {
    pub ui: UiState,
    pub settings: UiSettings,
    saved_settings: UiSettings,

    /// Set when the model could not be loaded; nothing else is drawn.
    fatal: Option<String>,

    /// Dropped with the app, which closes the session and its audio files.
    engine: Option<EngineHandle>,
    resp_rx: Option<mpsc::Receiver<EngineResponse>>,
}

impl DungeonApp {
    pub fn new(model: &'static dyn TextModel, config: &AppConfig, settings: UiSettings) -> Self {
        let pipeline = TurnPipeline::new(
            model,
            Box::new(InferenceApiIllustrator::new(&config.image)),
            Box::new(TranslateTts::new(&config.speech)),
            config.speech.language.clone(),
        );
        let (engine, resp_rx) =
            EngineHandle::spawn(pipeline, Session::create(&config.audio_root()));

        let mut app = Self::empty(settings);
        app.engine = Some(engine);
        app.resp_rx = Some(resp_rx);
        app
    }

    /// An app that only shows why it cannot run.
    pub fn fatal(message: String, settings: UiSettings) -> Self {
        let mut app = Self::empty(settings);
        app.fatal = Some(message);
        app
    }

    fn empty(settings: UiSettings) -> Self {
        Self {
            ui: UiState::default(),
            saved_settings: settings.clone(),
            settings,
            fatal: None,
            engine: None,
            resp_rx: None,
        }
    }

    pub fn send_command(&mut self, cmd: EngineCommand) {
        let Some(engine) = &self.engine else {
            return;
        };
        if engine.send(cmd).is_err() {
            error!("engine thread is gone");
            self.ui.last_error = Some("The story engine stopped unexpectedly.".into());
            self.ui.stage = None;
        }
    }

    pub fn submit_action(&mut self) {
        if self.engine.is_none() || self.ui.input_text.trim().is_empty() || self.ui.is_busy() {
            return;
        }

        let action = std::mem::take(&mut self.ui.input_text);
        self.ui.last_error = None;
        self.ui.stage = Some(TurnStage::Generating);
        let settings = self.settings.story.clone();
        self.send_command(EngineCommand::SubmitAction { action, settings });
    }

    pub fn reset_story(&mut self) {
        self.ui.last_error = None;
        self.ui.notice = None;
        self.send_command(EngineCommand::ResetStory);
    }

    fn drain_engine(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.resp_rx else {
            return;
        };

        while let Ok(resp) = rx.try_recv() {
            match resp {
                EngineResponse::Stage(TurnStage::Idle) => self.ui.stage = None,
                EngineResponse::Stage(stage) => self.ui.stage = Some(stage),
                EngineResponse::TurnCommitted(turn) => {
                    self.ui.transcript.push(turn);
                    upload_textures(ctx, &self.ui.transcript, &mut self.ui.textures);
                }
                EngineResponse::StoryReset => {
                    self.ui.transcript.clear();
                    self.ui.textures.clear();
                }
                EngineResponse::TurnFailed(message) => self.ui.last_error = Some(message),
            }
        }
    }

    fn persist_settings(&mut self) {
        if self.settings != self.saved_settings {
            save_settings(&self.settings);
            self.saved_settings = self.settings.clone();
        }
    }
}

fn upload_textures(
    ctx: &egui::Context,
    transcript: &Transcript,
    textures: &mut HashMap<usize, egui::TextureHandle>,
) {
    for (idx, turn) in transcript.turns().iter().enumerate() {
        if textures.contains_key(&idx) {
            continue;
        }
        if let Some(img) = turn.illustration().artifact() {
            match texture_image(img) {
                Some(color_image) => {
                    let handle = ctx.load_texture(
                        format!("illustration-{idx}"),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    textures.insert(idx, handle);
                }
                None => warn!("illustration {idx} has inconsistent size"),
            }
        }
    }
}

fn texture_image(img: &Illustration) -> Option<egui::ColorImage> {
    let expected = img.width as usize * img.height as usize * 4;
    if img.rgba.len() != expected {
        return None;
    }
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [img.width as usize, img.height as usize],
        &img.rgba,
    ))
}

/* =========================
   egui App
   ========================= */

impl eframe::App for DungeonApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        if let Some(message) = &self.fatal {
            draw_fatal(ctx, message);
            return;
        }

        self.drain_engine(ctx);

        super::left_panel::draw_left_panel(ctx, self);
        super::center_panel::draw_center_panel(ctx, self);

        self.persist_settings();

        if self.ui.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

fn draw_fatal(ctx: &egui::Context, message: &str) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading("⚠ Model loading failed.");
            ui.add_space(12.0);
            ui.colored_label(egui::Color32::LIGHT_RED, message);
            ui.add_space(12.0);
            ui.label("Start your local model server and restart the app.");
        });
    });
}
