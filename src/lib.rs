//! Single-user goal tracker.
//!
//! Goals live in a JSON file managed by [`store::GoalStore`] and are exposed
//! over HTTP by the router in [`api`].

pub mod api;
pub mod models;
pub mod render;
pub mod store;
