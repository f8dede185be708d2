//! Notification bus and display-side visibility

use std::cell::RefCell;
use std::collections::HashSet;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{NewNotification, Notification, Severity};

/// Live subscribers that fall this far behind start missing messages;
/// the log itself is never lossy.
const SUBSCRIBER_CAPACITY: usize = 64;

/// Application-lifetime log of transient status messages.
///
/// Created once at start-up and passed by reference to everything that
/// emits or displays notifications. The log only grows: dismissing a
/// message is a display concern, see [`NotificationView`].
pub struct NotificationBus {
    log: RefCell<Vec<Notification>>,
    sender: broadcast::Sender<Notification>,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        NotificationBus {
            log: RefCell::new(Vec::new()),
            sender,
        }
    }

    /// Append a message with a fresh id and fan it out to live subscribers
    pub fn emit(&self, new: NewNotification) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            severity: new.severity,
            title: new.title,
            body: new.body,
            created_at: Utc::now(),
        };

        match notification.severity {
            Severity::Info => info!(
                "notification: {} {}",
                notification.title,
                notification.body.as_deref().unwrap_or("")
            ),
            Severity::Destructive => warn!(
                "notification: {} {}",
                notification.title,
                notification.body.as_deref().unwrap_or("")
            ),
        }

        let id = notification.id;
        self.log.borrow_mut().push(notification.clone());
        // No subscribers is fine; the log still has it
        let _ = self.sender.send(notification);
        id
    }

    /// Receive every message emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Every message ever emitted, in emission order
    pub fn replay(&self) -> Vec<Notification> {
        self.log.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    pub fn destructive_count(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|n| n.is_destructive())
            .count()
    }
}

/// One display surface's projection of the bus: everything not yet dismissed
#[derive(Debug, Default)]
pub struct NotificationView {
    dismissed: HashSet<Uuid>,
}

impl NotificationView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide a message in this view. Returns false if it was already hidden.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        self.dismissed.insert(id)
    }

    pub fn visible(&self, bus: &NotificationBus) -> Vec<Notification> {
        bus.replay()
            .into_iter()
            .filter(|n| !self.dismissed.contains(&n.id))
            .collect()
    }
}
