use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub masjid_id: String,
    pub title: String,
    pub body: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn default_category() -> String {
    "general".to_string()
}

impl Announcement {
    /// Visible when `now` falls inside the window; a null bound never hides it.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.starts_at.is_none_or(|start| start <= now) && self.ends_at.is_none_or(|end| now <= end)
    }

    /// Pinned first, then newest first.
    pub fn display_order(a: &Announcement, b: &Announcement) -> Ordering {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    }
}

/// Filter to the active set and sort for display.
pub fn active_sorted(items: &[Announcement], now: DateTime<Utc>) -> Vec<Announcement> {
    let mut active: Vec<Announcement> = items.iter().filter(|a| a.is_active(now)).cloned().collect();
    active.sort_by(Announcement::display_order);
    active
}
