pub mod activity;
pub mod agents;
pub mod board;
pub mod chat;
pub mod dashboard;
pub mod recurring;
