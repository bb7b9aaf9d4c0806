//! User-facing notification seam.
//!
//! The collection manager never surfaces adapter errors raw; it translates
//! every user-visible outcome into a [`Notice`] and hands it to whatever
//! [`Notifier`] the host application injected (a toast system, typically).

use async_trait::async_trait;

/// Visual weight of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A single user-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Error,
        }
    }
}

/// Sink for user-facing notifications; rendering is the host's concern
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice);
}

/// Default sink that routes notices to the `log` crate
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => log::info!("{}: {}", notice.title, notice.description),
            Severity::Error => log::warn!("{}: {}", notice.title, notice.description),
        }
    }
}
