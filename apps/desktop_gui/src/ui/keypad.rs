//! On-screen numeric keypad.

use eframe::egui;
use shared::protocol::FieldAction;

const KEY_SIZE: [f32; 2] = [72.0, 56.0];

enum Key {
    Digit(u8),
    Negate,
    Clear,
}

const LAYOUT: [[Key; 3]; 4] = [
    [Key::Digit(7), Key::Digit(8), Key::Digit(9)],
    [Key::Digit(4), Key::Digit(5), Key::Digit(6)],
    [Key::Digit(1), Key::Digit(2), Key::Digit(3)],
    [Key::Negate, Key::Digit(0), Key::Clear],
];

/// Draws the keypad and returns the action of the key tapped this frame.
pub fn keypad_widget(ui: &mut egui::Ui, id_salt: &str) -> Option<FieldAction> {
    let mut pressed = None;
    egui::Grid::new(id_salt)
        .spacing(egui::vec2(6.0, 6.0))
        .show(ui, |ui| {
            for row in &LAYOUT {
                for key in row {
                    let (label, action) = match key {
                        Key::Digit(d) => (d.to_string(), FieldAction::Digit(*d)),
                        Key::Negate => ("±".to_string(), FieldAction::Negate),
                        Key::Clear => ("C".to_string(), FieldAction::Reset),
                    };
                    let button = egui::Button::new(egui::RichText::new(label).size(22.0).strong());
                    if ui.add_sized(KEY_SIZE, button).clicked() {
                        pressed = Some(action);
                    }
                }
                ui.end_row();
            }
        });
    pressed
}
