use std::time::{Duration, Instant};

use client_core::{KeyValueStore, Notice, Settings, ToastKind};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{FieldId, RunState, Theme, CORRECT_FIELD, DEFECT_FIELD},
    protocol::FieldAction,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::{apply_ui_event, StationState},
};
use crate::ui::{
    keypad::keypad_widget,
    theme::{kind_fill, visuals_for_theme},
};

const TOAST_TTL: Duration = Duration::from_secs(5);
const FIELD_WIDTH: f32 = 160.0;

struct ActiveToast {
    message: String,
    kind: ToastKind,
    shown_at: Instant,
}

struct ActiveBanner {
    message: String,
    kind: ToastKind,
    reload_at: Option<Instant>,
}

pub struct TallyApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: StationState<Box<dyn KeyValueStore>>,
    location: String,
    toasts: Vec<ActiveToast>,
    banner: Option<ActiveBanner>,
    applied_theme: Option<Theme>,
    applied_fullscreen: bool,
}

fn field_label(id: &FieldId) -> &str {
    match id.as_str() {
        CORRECT_FIELD => "Correct",
        DEFECT_FIELD => "Defect",
        other => other,
    }
}

impl TallyApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &Settings,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: StationState::new(settings, store),
            location: settings.location.clone(),
            toasts: Vec::new(),
            banner: None,
            applied_theme: None,
            applied_fullscreen: false,
        }
    }

    /// Records that the window was opened fullscreen.
    pub fn mark_fullscreen(&mut self) {
        if !self.state.page.is_fullscreen() {
            self.state.page.toggle_fullscreen();
        }
        self.applied_fullscreen = true;
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            apply_ui_event(&mut self.state, event);
        }
    }

    fn collect_notices(&mut self) {
        let now = Instant::now();
        for notice in self.state.page.notifier_mut().drain() {
            match notice {
                Notice::Toast { message, kind } => self.toasts.push(ActiveToast {
                    message,
                    kind,
                    shown_at: now,
                }),
                Notice::Banner {
                    kind,
                    message,
                    reload_after,
                } => {
                    self.banner = Some(ActiveBanner {
                        message,
                        kind,
                        reload_at: reload_after.map(|after| now + after),
                    });
                }
            }
        }
        self.toasts
            .retain(|toast| now.duration_since(toast.shown_at) < TOAST_TTL);

        let reload_due = self
            .banner
            .as_ref()
            .and_then(|banner| banner.reload_at)
            .is_some_and(|at| now >= at);
        if reload_due {
            self.banner = None;
            self.state.reload();
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        let theme = self.state.page.theme();
        if self.applied_theme == Some(theme) {
            return;
        }
        ctx.set_visuals(visuals_for_theme(theme));
        self.applied_theme = Some(theme);
    }

    fn sync_fullscreen(&mut self, ctx: &egui::Context) {
        let fullscreen = self.state.page.is_fullscreen();
        if self.applied_fullscreen != fullscreen {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(fullscreen));
            self.applied_fullscreen = fullscreen;
        }
    }

    fn show_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(format!("Tally · {}", self.location));
            let (label, color) = match self.state.page.run_state() {
                RunState::Running => ("● running", egui::Color32::from_rgb(67, 181, 129)),
                RunState::Paused => ("● paused", egui::Color32::from_rgb(240, 178, 50)),
                RunState::Stopped => ("● stopped", egui::Color32::GRAY),
            };
            ui.label(egui::RichText::new(label).color(color));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let fullscreen_label = if self.state.page.is_fullscreen() {
                    "Exit fullscreen"
                } else {
                    "Fullscreen"
                };
                if ui.button(fullscreen_label).clicked() {
                    self.state.page.toggle_fullscreen();
                }
                let theme_label = match self.state.page.theme() {
                    Theme::Light => "🌙 Dark",
                    Theme::Dark => "☀ Light",
                };
                if ui.button(theme_label).clicked() {
                    self.state.page.toggle_theme();
                }
            });
        });
    }

    fn show_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = &self.banner else {
            return;
        };
        let mut reload = false;
        egui::Frame::NONE
            .fill(kind_fill(banner.kind))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(&banner.message)
                            .size(20.0)
                            .color(egui::Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Reload").clicked() {
                            reload = true;
                        }
                    });
                });
            });
        if reload {
            self.banner = None;
            self.state.reload();
        }
    }

    fn show_fields(&mut self, ui: &mut egui::Ui) {
        for id in self.state.field_ids() {
            let mut action = None;
            ui.horizontal(|ui| {
                ui.selectable_value(
                    &mut self.state.selected,
                    id.clone(),
                    egui::RichText::new(field_label(&id)).size(18.0),
                );
                if ui.button("−").clicked() {
                    action = Some(FieldAction::Decrement);
                }
                if let Some(handle) = self.state.keypad.field_mut(&id) {
                    let response = ui.add(
                        egui::TextEdit::singleline(handle.surface_mut())
                            .desired_width(FIELD_WIDTH)
                            .font(egui::TextStyle::Heading),
                    );
                    if response.changed() {
                        action = Some(FieldAction::FreeTextChanged(handle.surface().clone()));
                    }
                    if response.gained_focus() {
                        self.state.selected = id.clone();
                    }
                }
                if ui.button("+").clicked() {
                    action = Some(FieldAction::Increment);
                }
            });
            if let Some(action) = action {
                self.state.apply_field_action(&id, &action);
            }
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Item no.");
            ui.add(
                egui::TextEdit::singleline(&mut self.state.item_no).desired_width(FIELD_WIDTH),
            );
        });
        ui.add_space(6.0);

        let mut command = None;
        ui.horizontal_wrapped(|ui| {
            if ui.button(egui::RichText::new("Save").strong()).clicked() {
                command = Some(self.state.save_command());
            }
            if ui.button("Clear").clicked() {
                self.state.clear_correct();
            }
            if ui.button("Reset current").clicked() {
                command = Some(self.state.reset_current_command());
            }
            if ui.button("Reset total").clicked() {
                command = Some(BackendCommand::ResetCount);
            }
            ui.separator();
            if ui.button("▶ Start").clicked() {
                command = Some(BackendCommand::Start);
            }
            if ui.button("⏸ Pause").clicked() {
                command = Some(BackendCommand::Pause);
            }
            if ui.button("■ Stop").clicked() {
                command = Some(BackendCommand::Stop);
            }
        });
        if let Some(command) = command {
            self.dispatch(command);
        }
    }

    fn show_station(&mut self, ui: &mut egui::Ui) {
        self.show_banner(ui);
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("Total: {}", self.state.total_count)).size(28.0),
            );
            ui.add_space(24.0);
            ui.label(
                egui::RichText::new(format!("Current: {}", self.state.current_count)).size(20.0),
            );
        });
        if self.state.page.run_state() == RunState::Paused {
            ui.label(
                egui::RichText::new("PAUSED")
                    .size(32.0)
                    .strong()
                    .color(egui::Color32::from_rgb(240, 178, 50)),
            );
        }
        ui.add_space(8.0);

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                self.show_fields(ui);
                ui.add_space(12.0);
                self.show_controls(ui);
            });
            ui.add_space(24.0);
            if let Some(action) = keypad_widget(ui, "station_keypad") {
                self.state.press_key(&action);
            }
        });

        if !self.state.status.is_empty() {
            ui.add_space(8.0);
            ui.small(egui::RichText::new(&self.state.status).weak());
        }
    }

    fn show_toasts(&self, ui: &mut egui::Ui) {
        for toast in &self.toasts {
            egui::Frame::NONE
                .fill(kind_fill(toast.kind))
                .corner_radius(6.0)
                .inner_margin(egui::Margin::symmetric(10, 6))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(&toast.message).color(egui::Color32::WHITE));
                });
        }
    }
}

impl eframe::App for TallyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.collect_notices();
        self.apply_theme_if_needed(ctx);
        self.sync_fullscreen(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| self.show_top_bar(ui));
        if !self.toasts.is_empty() {
            egui::TopBottomPanel::bottom("toasts").show(ctx, |ui| self.show_toasts(ui));
        }
        egui::CentralPanel::default().show(ctx, |ui| self.show_station(ui));

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
