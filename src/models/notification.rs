//! Transient status message models

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Destructive,
}

/// A message as handed to the bus, before it gets an identity
#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub severity: Severity,
    pub title: String,
    pub body: Option<String>,
}

impl NewNotification {
    pub fn info(title: impl Into<String>) -> Self {
        NewNotification {
            severity: Severity::Info,
            title: title.into(),
            body: None,
        }
    }

    pub fn destructive(title: impl Into<String>) -> Self {
        NewNotification {
            severity: Severity::Destructive,
            title: title.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A message that has been emitted on the bus
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub severity: Severity,
    pub title: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_destructive(&self) -> bool {
        self.severity == Severity::Destructive
    }
}
