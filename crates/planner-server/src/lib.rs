//! HTTP frontend for the planner scheduler.
//!
//! The binary in `main.rs` wires a [`config::Config`] and a
//! `SqliteRepository` into the [`api::router`]; everything the handlers
//! need travels in [`api::AppState`], so the whole surface can be stood up
//! in tests without touching process-wide state.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
