//! Operator feedback emitted by manual dispatch actions.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Default,
    Destructive,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Destructive => "destructive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub title: String,
    pub description: String,
}

impl NotificationMessage {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Outbound notification port (toasts, chat hooks, e-mail adapters).
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: NotificationMessage)
        -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Writes notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(
        &self,
        kind: NotificationKind,
        message: NotificationMessage,
    ) -> Result<(), NotifyError> {
        match kind {
            NotificationKind::Default => {
                info!(title = %message.title, "{}", message.description)
            }
            NotificationKind::Destructive => {
                warn!(title = %message.title, "{}", message.description)
            }
        }
        Ok(())
    }
}
