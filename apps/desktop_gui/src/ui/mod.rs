//! UI layer for the counting station: app shell, keypad widget and theme.

pub mod app;
pub mod keypad;
pub mod theme;

pub use app::TallyApp;
