// src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::models::question::validate_not_blank;

/// What a notification is about. Drives the icon shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Course,
    System,
    Community,
    General,
    Suggestion,
}

/// Icon identifier for a category. Presentation only; never persisted.
pub fn category_icon(category: NotificationCategory) -> &'static str {
    match category {
        NotificationCategory::Course => "book-open",
        NotificationCategory::System => "settings",
        NotificationCategory::Community => "users",
        NotificationCategory::General => "bell",
        NotificationCategory::Suggestion => "lightbulb",
    }
}

/// A persisted notification record. Read state lives in a separate id set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub category: NotificationCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Input for [`crate::store::notifications::NotificationStore::add`].
///
/// `title` and `description` are expected to be non-empty; the store does not
/// check.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub description: String,
    pub category: NotificationCategory,
    pub link: Option<String>,
}

impl NewNotification {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: NotificationCategory,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// A record joined with its read flag and icon, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub category: NotificationCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub read: bool,
    pub icon: &'static str,
}

impl NotificationView {
    pub fn project(record: Notification, read: bool) -> Self {
        let icon = category_icon(record.category);
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            created_at: record.created_at,
            category: record.category,
            link: record.link,
            read,
            icon,
        }
    }
}

/// DTO for creating a notification.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title length must be between 1 and 200 chars"
    ), custom(function = validate_not_blank))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description length must be between 1 and 2000 chars"
    ), custom(function = validate_not_blank))]
    pub description: String,
    pub category: NotificationCategory,
    #[validate(length(max = 500), custom(function = validate_link))]
    pub link: Option<String>,
}

/// Accepts absolute URLs and site-relative paths such as `/courses/42`.
fn validate_link(link: &str) -> Result<(), validator::ValidationError> {
    if link.starts_with('/') && !link.starts_with("//") {
        return Ok(());
    }
    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_link")),
    }
}
