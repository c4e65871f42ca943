//! Session-backed storage of the toast queue.

use std::fmt::Display;

use actix_session::Session;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::notifications::{ToastLevel, ToastQueue, ToastView};

/// Session key the queue is stored under unless configured otherwise.
pub const DEFAULT_SESSION_KEY: &str = "toasts";

/// Handle to the per-user toast queue. Created once in `run` and shared as
/// `web::Data`; the queue itself lives in the user's session.
#[derive(Debug, Clone)]
pub struct ToastStore {
    session_key: String,
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_KEY)
    }
}

impl ToastStore {
    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
        }
    }

    /// Reads the queue; an unreadable session value yields an empty queue.
    pub fn load(&self, session: &Session) -> ToastQueue {
        match session.get::<ToastQueue>(&self.session_key) {
            Ok(queue) => queue.unwrap_or_default(),
            Err(err) => {
                log::warn!("Failed to read toast queue from session: {err}");
                ToastQueue::default()
            }
        }
    }

    pub fn save(&self, session: &Session, queue: &ToastQueue) {
        let result = if queue.is_empty() {
            session.remove(&self.session_key);
            Ok(())
        } else {
            session.insert(&self.session_key, queue)
        };
        if let Err(err) = result {
            log::error!("Failed to store toast queue in session: {err}");
        }
    }

    /// Moves incoming flash messages into the queue and returns the toasts to
    /// render on this page.
    pub fn present(
        &self,
        session: &Session,
        flash_messages: &IncomingFlashMessages,
        now: DateTime<Utc>,
    ) -> Vec<ToastView> {
        let mut queue = self.load(session);
        for message in flash_messages.iter() {
            queue.append(level_from_flash(message.level()), message.content(), now);
        }
        let views = queue.present(now);
        self.save(session, &queue);
        views
    }

    pub fn dismiss(&self, session: &Session, id: Uuid) -> bool {
        let mut queue = self.load(session);
        let dismissed = queue.dismiss(id);
        queue.evict_expired(Utc::now());
        self.save(session, &queue);
        dismissed
    }
}

pub fn level_from_flash(level: Level) -> ToastLevel {
    match level {
        Level::Error => ToastLevel::Error,
        Level::Warning => ToastLevel::Warning,
        Level::Success => ToastLevel::Success,
        Level::Info | Level::Debug => ToastLevel::Info,
    }
}

/// Queues an error toast for the next rendered page.
pub fn error_toast(err: impl Display) {
    FlashMessage::error(err.to_string()).send();
}

/// Queues a success toast for the next rendered page.
pub fn success_toast(message: impl Into<String>) {
    FlashMessage::success(message.into()).send();
}
