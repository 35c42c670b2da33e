//! User-visible notices and page elements outside the map

use crate::detail::DetailPanel;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeKind {
    LoadFailure,
    SearchNotFound,
    /// Console input that could not be carried out
    UnknownCommand,
}

/// A blocking notification for the user (an alert in a browser front-end)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn load_failure(initial: bool) -> Self {
        let message = if initial {
            "Failed to load COVID data."
        } else {
            "Failed to reload COVID data."
        };
        Self {
            kind: NoticeKind::LoadFailure,
            message: message.to_string(),
        }
    }

    pub fn search_not_found() -> Self {
        Self {
            kind: NoticeKind::SearchNotFound,
            message: "Country not found. Try another name.".to_string(),
        }
    }
}

impl Notice {
    pub fn unknown_command(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::UnknownCommand,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The page around the map: alerts, the detail panel and the
/// last-updated text
pub trait Notifier {
    fn notify(&mut self, notice: Notice);

    /// The detail panel now shows `detail`
    fn show_detail(&mut self, _detail: &DetailPanel) {}

    /// New last-updated text after a load
    fn show_last_updated(&mut self, _label: &str) {}
}

/// Collects notices, for tests and headless runs
impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Writes notices to the log only
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        warn!("{:?}: {}", notice.kind, notice.message);
    }

    fn show_detail(&mut self, detail: &DetailPanel) {
        info!("Detail panel: {}", detail.name);
    }

    fn show_last_updated(&mut self, label: &str) {
        info!("{}", label);
    }
}
