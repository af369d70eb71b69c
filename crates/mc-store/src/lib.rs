//! The mission store: process-wide state for the dashboard client.
//!
//! One [`MissionStore`] per process owns every client-side collection
//! (agents, tasks, recurring tasks, chat, the bounded activity feed, mention
//! notifications) plus the background tasks that keep them fresh: the `/ws`
//! subscription, the agent/monitoring poll, and the short fallback refreshes
//! that paper over missed WebSocket events.
//!
//! Mutating actions follow one of two shapes:
//!
//! * optimistic-then-confirm -- mutate local state first for immediate UI
//!   feedback, then issue the backend call; a failure reverts by re-fetching
//!   the canonical collection (never by fine-grained undo);
//! * confirm-then-refresh -- issue the call, re-fetch, and schedule one more
//!   refresh ~500ms later in case the confirming WebSocket event was missed.

pub mod config;
mod error;
mod feed;
pub mod mentions;
mod state;
mod store;

pub use config::Config;
pub use error::{Result, StoreError};
pub use feed::{ActivityFeed, FeedEntry, FeedKind, MentionNotification, NotificationLog, FEED_CAP};
pub use state::{ChatEntry, MissionState};
pub use store::MissionStore;
