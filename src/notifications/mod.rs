//! Toast notification queue.
//!
//! Toasts are kept FIFO. A toast is `Queued` until it is first presented,
//! then `Visible` until it is older than [`TOAST_TTL_MS`] or dismissed.
//! Expiry is computed from timestamps whenever the queue is touched; the
//! rendered page carries the remaining time for the client-side hide.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "server")]
pub mod store;

/// Lifetime of a toast in milliseconds.
pub const TOAST_TTL_MS: i64 = 5000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastLevel::Info => "info",
            ToastLevel::Success => "success",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastPhase {
    Queued,
    Visible,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub phase: ToastPhase,
}

impl Toast {
    fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::milliseconds(TOAST_TTL_MS)
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Toast as handed to `partials/toasts.html`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToastView {
    pub id: Uuid,
    pub level: &'static str,
    pub message: String,
    pub remaining_ms: i64,
    /// `toast-enter` on the first render, `toast-exit` is added client-side.
    pub class: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, level: ToastLevel, message: impl Into<String>, now: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.toasts.push_back(Toast {
            id,
            level,
            message: message.into(),
            created_at: now,
            phase: ToastPhase::Queued,
        });
        id
    }

    /// Drops every overdue toast from the front of the queue and returns how
    /// many were removed.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let mut evicted = 0;
        while self.toasts.front().is_some_and(|toast| toast.is_expired(now)) {
            self.toasts.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        match self.toasts.iter().position(|toast| toast.id == id) {
            Some(index) => {
                self.toasts.remove(index);
                true
            }
            None => false,
        }
    }

    /// Evicts overdue toasts and returns the rest, marking them visible.
    pub fn present(&mut self, now: DateTime<Utc>) -> Vec<ToastView> {
        self.evict_expired(now);
        self.toasts
            .iter_mut()
            .map(|toast| {
                let entering = toast.phase == ToastPhase::Queued;
                toast.phase = ToastPhase::Visible;
                let class = if entering {
                    format!("toast toast-{} toast-enter", toast.level.as_str())
                } else {
                    format!("toast toast-{}", toast.level.as_str())
                };
                ToastView {
                    id: toast.id,
                    level: toast.level.as_str(),
                    message: toast.message.clone(),
                    remaining_ms: (toast.expires_at() - now).num_milliseconds().max(0),
                    class,
                }
            })
            .collect()
    }

    /// Time left until the oldest toast expires.
    pub fn next_expiry(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.toasts
            .front()
            .map(|toast| (toast.expires_at() - now).max(Duration::zero()))
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000 + ms).unwrap()
    }

    #[test]
    fn toasts_are_presented_in_order() {
        let mut queue = ToastQueue::new();
        queue.append(ToastLevel::Success, "Баннер сохранен", at(0));
        queue.append(ToastLevel::Error, "Ошибка сервера", at(100));

        let views = queue.present(at(200));
        let messages: Vec<&str> = views.iter().map(|view| view.message.as_str()).collect();
        assert_eq!(messages, vec!["Баннер сохранен", "Ошибка сервера"]);
        assert_eq!(views[0].remaining_ms, 4800);
        assert_eq!(views[1].level, "danger");
    }

    #[test]
    fn first_presentation_enters() {
        let mut queue = ToastQueue::new();
        queue.append(ToastLevel::Info, "Привет", at(0));

        assert_eq!(queue.present(at(10))[0].class, "toast toast-info toast-enter");
        assert_eq!(queue.present(at(20))[0].class, "toast toast-info");
        assert!(queue.toasts().all(|toast| toast.phase == ToastPhase::Visible));
    }

    #[test]
    fn toasts_expire_after_ttl() {
        let mut queue = ToastQueue::new();
        queue.append(ToastLevel::Info, "a", at(0));
        queue.append(ToastLevel::Info, "b", at(3000));

        assert_eq!(queue.evict_expired(at(4999)), 0);
        assert_eq!(queue.evict_expired(at(5000)), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_expiry(at(5000)), Some(Duration::milliseconds(3000)));
    }

    #[test]
    fn overdue_toasts_are_evicted_at_once() {
        let mut queue = ToastQueue::new();
        for i in 0..5 {
            queue.append(ToastLevel::Warning, format!("toast {i}"), at(i * 100));
        }
        assert!(queue.present(at(60_000)).is_empty());
        assert!(queue.is_empty());
        assert_eq!(queue.next_expiry(at(60_000)), None);
    }

    #[test]
    fn size_accounts_for_dismissed_and_expired() {
        let mut queue = ToastQueue::new();
        let first = queue.append(ToastLevel::Info, "1", at(0));
        queue.append(ToastLevel::Info, "2", at(1000));
        let third = queue.append(ToastLevel::Info, "3", at(6000));
        queue.append(ToastLevel::Info, "4", at(6500));

        assert!(queue.dismiss(third));
        assert!(!queue.dismiss(third));
        assert_eq!(queue.evict_expired(at(6500)), 2);
        // 4 appended - 1 dismissed - 2 expired
        assert_eq!(queue.len(), 1);
        assert!(!queue.dismiss(first));
    }

    #[test]
    fn queue_survives_serialization() {
        let mut queue = ToastQueue::new();
        queue.append(ToastLevel::Success, "ok", at(0));
        let json = serde_json::to_string(&queue).unwrap();
        let restored: ToastQueue = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, queue);
    }
}
