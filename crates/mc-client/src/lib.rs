//! HTTP + WebSocket client for the mission-control backend.
//!
//! [`ApiClient`] is a thin async wrapper over the REST surface; it performs no
//! retries of its own. [`ws::run_listener`] owns the single `/ws` connection
//! and its fixed-delay reconnect loop. The [`MissionApi`] trait is the seam
//! the store is written against, so tests can substitute an in-memory fake.

mod api;
mod error;
mod http;
pub mod ws;

pub use api::MissionApi;
pub use error::{ClientError, Result};
pub use http::ApiClient;
