use crate::dashboard::Dashboard;
use crate::models::{Notification, Severity};
use crate::services::NotificationView;

pub fn list(dash: &Dashboard, view: &NotificationView) -> String {
    let visible = view.visible(dash.bus());
    if visible.is_empty() {
        return "No notifications".to_string();
    }

    visible
        .iter()
        .enumerate()
        .map(|(i, n)| format!("{}. {}", i + 1, line(n)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `n` is the 1-based position in the current `toasts` listing
pub fn dismiss(dash: &Dashboard, view: &mut NotificationView, args: &[String]) -> Result<String, String> {
    let n = args
        .first()
        .and_then(|a| a.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .ok_or("Usage: `dismiss <N>`")?;

    let visible = view.visible(dash.bus());
    let target = visible
        .get(n - 1)
        .ok_or_else(|| format!("No notification {}", n))?;

    view.dismiss(target.id);
    Ok(format!("Dismissed {}", n))
}

/// One-line rendering shared with the live printer
pub fn line(notification: &Notification) -> String {
    let icon = match notification.severity {
        Severity::Info => "ℹ️",
        Severity::Destructive => "❌",
    };
    match &notification.body {
        Some(body) => format!(
            "{} [{}] {}: {}",
            icon,
            notification.created_at.format("%H:%M:%S"),
            notification.title,
            body
        ),
        None => format!(
            "{} [{}] {}",
            icon,
            notification.created_at.format("%H:%M:%S"),
            notification.title
        ),
    }
}
