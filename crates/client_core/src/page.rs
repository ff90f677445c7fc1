//! Page-wide UI state: theme, fullscreen, connection banner and run state.
//! The store and notifier are handed in rather than reached for globally.

use std::time::Duration;

use shared::{
    domain::{RunState, Theme},
    protocol::RunStatus,
};
use tracing::{info, warn};

use crate::{
    notify::{Notice, Notifier, ToastKind},
    store::KeyValueStore,
};

pub const THEME_KEY: &str = "theme";
pub const THEME_TTL_DAYS: i64 = 365;
/// How long a reconnect banner waits before reloading by itself.
pub const RECONNECT_RELOAD_AFTER: Duration = Duration::from_secs(15 * 60);

pub const RECONNECTED_MESSAGE: &str = "Connection to server successful";
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Error connecting to the server. Contact the IT department.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected,
    Reconnected { attempt: u32 },
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Failed,
}

pub struct PageContext<K, N> {
    store: K,
    notifier: N,
    theme: Theme,
    fullscreen: bool,
    connection: ConnectionState,
    run_state: RunState,
}

impl<K: KeyValueStore, N: Notifier> PageContext<K, N> {
    /// Applies the stored theme (dark when unset) and stores it again to
    /// refresh its expiry.
    pub fn init(store: K, notifier: N) -> Self {
        let theme = store
            .get(THEME_KEY)
            .map(|value| Theme::from_stored(&value))
            .unwrap_or_default();
        let mut page = Self {
            store,
            notifier,
            theme,
            fullscreen: false,
            connection: ConnectionState::default(),
            run_state: RunState::default(),
        };
        page.set_theme(theme);
        page
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(err) = self.store.set(
            THEME_KEY,
            theme.as_str(),
            Some(chrono::Duration::days(THEME_TTL_DAYS)),
        ) {
            warn!(%theme, "failed to persist theme: {err}");
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(next);
        next
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Returns whether the page is fullscreen afterwards.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn on_connection(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => {
                self.connection = ConnectionState::Connected;
            }
            ConnectionEvent::Reconnected { attempt } => {
                info!(attempt, "reconnected to counting server");
                self.connection = ConnectionState::Connected;
                self.notifier.notify(Notice::Banner {
                    kind: ToastKind::Success,
                    message: RECONNECTED_MESSAGE.to_string(),
                    reload_after: Some(RECONNECT_RELOAD_AFTER),
                });
            }
            ConnectionEvent::Error(reason) => {
                warn!("counting server connection error: {reason}");
                self.connection = ConnectionState::Failed;
                self.notifier.notify(Notice::Banner {
                    kind: ToastKind::Danger,
                    message: CONNECTION_ERROR_MESSAGE.to_string(),
                    reload_after: None,
                });
            }
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn apply_run_status(&mut self, status: RunStatus) {
        self.run_state = status.into();
    }

    pub fn toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.notifier.notify(Notice::Toast {
            message: message.into(),
            kind,
        });
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
