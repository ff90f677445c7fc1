use client_core::ToastKind;
use eframe::egui;
use shared::domain::Theme;

pub fn visuals_for_theme(theme: Theme) -> egui::Visuals {
    match theme {
        Theme::Light => egui::Visuals::light(),
        Theme::Dark => {
            let mut v = egui::Visuals::dark();
            v.panel_fill = egui::Color32::from_rgb(33, 37, 41);
            v.window_fill = egui::Color32::from_rgb(43, 48, 53);
            v.extreme_bg_color = egui::Color32::from_rgb(23, 25, 28);
            v
        }
    }
}

/// Fill colour for toasts and banners of `kind`.
pub fn kind_fill(kind: ToastKind) -> egui::Color32 {
    match kind {
        ToastKind::Primary => egui::Color32::from_rgb(13, 110, 253),
        ToastKind::Success => egui::Color32::from_rgb(25, 135, 84),
        ToastKind::Warning => egui::Color32::from_rgb(176, 128, 0),
        ToastKind::Danger => egui::Color32::from_rgb(176, 42, 55),
        ToastKind::Info => egui::Color32::from_rgb(13, 122, 148),
    }
}
