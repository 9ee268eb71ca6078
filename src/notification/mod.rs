use actix_session::Session;
use serde::{Deserialize, Serialize};

const NOTIFICATIONS_KEY: &str = "notifications";

/// Where user-facing feedback ends up. Fire and forget.
pub trait NotificationSink {
    fn show_error(&self, text: String);

    fn show_success(&self, text: String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

/// Flash notifications queued in the session until the next page render.
pub struct SessionNotifications {
    session: Session,
}

impl SessionNotifications {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Removes and returns everything queued so far.
    pub fn drain(&self) -> Vec<Notification> {
        match self.session.remove_as::<Vec<Notification>>(NOTIFICATIONS_KEY) {
            Some(Ok(notifications)) => notifications,
            Some(Err(raw)) => {
                log::warn!("dropping unreadable notifications from session: {raw}");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn push(&self, kind: NotificationKind, text: String) {
        let mut queued = self
            .session
            .get::<Vec<Notification>>(NOTIFICATIONS_KEY)
            .unwrap_or(None)
            .unwrap_or_default();
        queued.push(Notification { kind, text });

        if let Err(err) = self.session.insert(NOTIFICATIONS_KEY, queued) {
            log::warn!("couldn't queue notification: {err}");
        }
    }
}

impl NotificationSink for SessionNotifications {
    fn show_error(&self, text: String) {
        self.push(NotificationKind::Error, text);
    }

    fn show_success(&self, text: String) {
        self.push(NotificationKind::Success, text);
    }
}
