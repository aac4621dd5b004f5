// src/store/notifications.rs
//
// Two keys live in the medium:
//   notifications       JSON array of records, most recent first
//   notifications_read  JSON array of ids marked as read
// Every write replaces the whole snapshot. Reads always go back to the
// medium; only the undo ring is held in memory.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::models::notification::{NewNotification, Notification, NotificationView};
use crate::store::kv::KeyValueStore;
use crate::utils::id::notification_id;

pub const NOTIFICATIONS_KEY: &str = "notifications";
pub const READ_IDS_KEY: &str = "notifications_read";

/// Maximum number of deletions that can be undone.
pub const UNDO_CAPACITY: usize = 10;

type ReadIds = BTreeSet<String>;

/// Notification log over a key-value medium.
///
/// No operation fails: an unavailable medium reads as empty and swallows
/// writes, and unparseable snapshots read as empty. Both are logged.
pub struct NotificationStore {
    medium: Arc<dyn KeyValueStore>,
    undo: VecDeque<Notification>,
}

impl NotificationStore {
    pub fn new(medium: Arc<dyn KeyValueStore>) -> Self {
        Self {
            medium,
            undo: VecDeque::with_capacity(UNDO_CAPACITY),
        }
    }

    /// Appends a notification stamped with the current time.
    pub fn add(&mut self, new: NewNotification) -> NotificationView {
        self.add_at(new, Utc::now())
    }

    /// Appends a notification with an explicit creation time.
    ///
    /// The record is prepended; the log is not re-sorted.
    pub fn add_at(&mut self, new: NewNotification, created_at: DateTime<Utc>) -> NotificationView {
        let record = Notification {
            id: notification_id(),
            title: new.title,
            description: new.description,
            created_at,
            category: new.category,
            link: new.link,
        };

        let mut log = self.load_log();
        log.insert(0, record.clone());
        self.save(NOTIFICATIONS_KEY, &log);

        tracing::debug!(id = %record.id, "notification added");
        NotificationView::project(record, false)
    }

    /// Removes a notification and remembers it for undo. Unknown ids are a
    /// no-op; returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let mut log = self.load_log();
        let Some(pos) = log.iter().position(|n| n.id == id) else {
            return false;
        };

        let removed = log.remove(pos);
        if !self.save(NOTIFICATIONS_KEY, &log) {
            return false;
        }

        if self.undo.len() == UNDO_CAPACITY {
            self.undo.pop_front();
        }
        self.undo.push_back(removed);
        true
    }

    /// Restores the most recently deleted notification.
    ///
    /// Unlike `add`, this re-sorts the whole log by `created_at` descending.
    /// If the write fails the deletion stays on the ring and `None` is returned.
    pub fn undo_last_deletion(&mut self) -> Option<NotificationView> {
        let record = self.undo.pop_back()?;

        let mut log = self.load_log();
        if !log.iter().any(|n| n.id == record.id) {
            log.push(record.clone());
            sort_recent_first(&mut log);
            if !self.save(NOTIFICATIONS_KEY, &log) {
                self.undo.push_back(record);
                return None;
            }
        }

        let read = self.load_read_ids().contains(&record.id);
        tracing::debug!(id = %record.id, "notification restored");
        Some(NotificationView::project(record, read))
    }

    /// Number of deletions that can still be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn mark_read(&mut self, id: &str) {
        let mut read = self.load_read_ids();
        if read.insert(id.to_string()) {
            self.save(READ_IDS_KEY, &read);
        }
    }

    pub fn mark_unread(&mut self, id: &str) {
        let mut read = self.load_read_ids();
        if read.remove(id) {
            self.save(READ_IDS_KEY, &read);
        }
    }

    /// Marks every notification currently in the log as read. Ids of deleted
    /// notifications already in the set stay there.
    pub fn mark_all_read(&mut self) {
        let mut read = self.load_read_ids();
        read.extend(self.load_log().into_iter().map(|n| n.id));
        self.save(READ_IDS_KEY, &read);
    }

    /// Clears the read set entirely.
    pub fn mark_all_unread(&mut self) {
        self.save(READ_IDS_KEY, &ReadIds::new());
    }

    /// The log joined with read state, most recent first.
    pub fn list(&self) -> Vec<NotificationView> {
        let read = self.load_read_ids();
        let mut log = self.load_log();
        sort_recent_first(&mut log);

        log.into_iter()
            .map(|n| {
                let is_read = read.contains(&n.id);
                NotificationView::project(n, is_read)
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<NotificationView> {
        let record = self.load_log().into_iter().find(|n| n.id == id)?;
        let read = self.load_read_ids().contains(&record.id);
        Some(NotificationView::project(record, read))
    }

    pub fn unread_count(&self) -> usize {
        let read = self.load_read_ids();
        self.load_log()
            .iter()
            .filter(|n| !read.contains(&n.id))
            .count()
    }

    fn load_log(&self) -> Vec<Notification> {
        self.load(NOTIFICATIONS_KEY)
    }

    fn load_read_ids(&self) -> ReadIds {
        self.load(READ_IDS_KEY)
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.medium.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!("Failed to read '{}' from storage: {}", key, e);
                return T::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::error!("Discarding malformed '{}' snapshot: {}", key, e);
            T::default()
        })
    }

    /// Writes a snapshot; returns whether it reached the medium.
    fn save<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to serialize '{}': {}", key, e);
                return false;
            }
        };

        match self.medium.set(key, &raw) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to write '{}' to storage: {}", key, e);
                false
            }
        }
    }
}

/// Stable sort, so records sharing a timestamp keep their relative order.
fn sort_recent_first(log: &mut [Notification]) {
    log.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
