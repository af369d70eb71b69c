//! Session-local derived state: the bounded activity feed and the mention
//! notification log. Neither round-trips to the backend.

use chrono::{DateTime, NaiveDateTime, Utc};

use mc_api_types::{ApiActivity, ApiAnnouncement};

/// The feed keeps only this many entries; older ones are silently dropped.
/// It is a UI convenience view, not an audit log.
pub const FEED_CAP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Task,
    Comment,
    Status,
    Announcement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub kind: FeedKind,
    pub title: String,
    pub detail: String,
    pub agent_id: Option<String>,
    pub task_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Parse the backend's timestamps: RFC 3339 when present, else the naive
/// ISO form FastAPI emits, else "now" (the feed only sorts by recency).
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }
    Utc::now()
}

impl FeedEntry {
    pub fn from_activity(a: &ApiActivity) -> Self {
        let kind = match a.activity_type.as_str() {
            t if t.contains("comment") => FeedKind::Comment,
            t if t.contains("review") || t.contains("approved") || t.contains("rejected")
                || t.contains("status") =>
            {
                FeedKind::Status
            }
            t if t.contains("announcement") => FeedKind::Announcement,
            _ => FeedKind::Task,
        };
        Self {
            id: a.id.clone(),
            kind,
            title: a.activity_type.replace('_', " "),
            detail: a.description.clone(),
            agent_id: a.agent_id.clone(),
            task_id: a.task_id.clone(),
            timestamp: parse_timestamp(&a.created_at),
        }
    }

    pub fn from_announcement(a: &ApiAnnouncement) -> Self {
        Self {
            id: a.id.clone(),
            kind: FeedKind::Announcement,
            title: a.title.clone().unwrap_or_else(|| "Announcement".to_string()),
            detail: a.message.clone(),
            agent_id: Some(a.created_by.clone()),
            task_id: None,
            timestamp: parse_timestamp(&a.created_at),
        }
    }
}

/// Most-recent-first ring of the last [`FEED_CAP`] entries.
#[derive(Debug, Clone, Default)]
pub struct ActivityFeed {
    entries: Vec<FeedEntry>,
}

impl ActivityFeed {
    pub fn push(&mut self, entry: FeedEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(FEED_CAP);
    }

    /// Replace the whole feed from a backend activity fetch. The backend
    /// already returns newest-first.
    pub fn replace_from_api(&mut self, activity: &[ApiActivity]) {
        self.entries = activity.iter().map(FeedEntry::from_activity).collect();
        self.entries.truncate(FEED_CAP);
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Mention notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MentionNotification {
    pub id: String,
    pub from_agent: String,
    pub to_agent: String,
    pub task_id: Option<String>,
    pub text: String,
    pub read: bool,
    pub timestamp: DateTime<Utc>,
}

/// Session-local unread-mention tracking, newest first. Never persisted;
/// lives exactly as long as the store does.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    items: Vec<MentionNotification>,
}

impl NotificationLog {
    pub fn push(
        &mut self,
        from_agent: &str,
        to_agent: &str,
        task_id: Option<String>,
        text: &str,
    ) {
        self.items.insert(
            0,
            MentionNotification {
                id: uuid::Uuid::new_v4().to_string(),
                from_agent: from_agent.to_string(),
                to_agent: to_agent.to_string(),
                task_id,
                text: text.to_string(),
                read: false,
                timestamp: Utc::now(),
            },
        );
    }

    pub fn all(&self) -> &[MentionNotification] {
        &self.items
    }

    pub fn unread_count_for(&self, agent_id: &str) -> usize {
        self.items
            .iter()
            .filter(|n| !n.read && n.to_agent == agent_id)
            .count()
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        if let Some(n) = self.items.iter_mut().find(|n| n.id == id) {
            n.read = true;
            true
        } else {
            false
        }
    }

    pub fn mark_all_read_for(&mut self, agent_id: &str) {
        for n in self.items.iter_mut().filter(|n| n.to_agent == agent_id) {
            n.read = true;
        }
    }
}
