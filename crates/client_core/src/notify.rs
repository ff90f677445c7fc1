use std::{collections::VecDeque, fmt, time::Duration};

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Primary,
    Success,
    Warning,
    Danger,
    Info,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToastKind::Primary => "primary",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Danger => "danger",
            ToastKind::Info => "info",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Short-lived message that dismisses itself.
    Toast { message: String, kind: ToastKind },
    /// Sticky message offering a reload, optionally reloading on its own
    /// after `reload_after`.
    Banner {
        kind: ToastKind,
        message: String,
        reload_after: Option<Duration>,
    },
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Holds notices until a renderer drains them.
#[derive(Debug, Default)]
pub struct QueueNotifier {
    pending: VecDeque<Notice>,
}

impl QueueNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        self.pending.drain(..).collect()
    }
}

impl Notifier for QueueNotifier {
    fn notify(&mut self, notice: Notice) {
        self.pending.push_back(notice);
    }
}

/// Sends notices to the log; used where nothing renders them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::Toast { message, kind } => match kind {
                ToastKind::Danger | ToastKind::Warning => warn!(%kind, "{message}"),
                _ => info!(%kind, "{message}"),
            },
            Notice::Banner {
                kind,
                message,
                reload_after,
            } => match kind {
                ToastKind::Danger | ToastKind::Warning => {
                    warn!(%kind, ?reload_after, "banner: {message}")
                }
                _ => info!(%kind, ?reload_after, "banner: {message}"),
            },
        }
    }
}
