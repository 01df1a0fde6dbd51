//! # Planner Core Library
//!
//! Scheduling core for the planner reminder service: a pure recurrence
//! engine plus a SQLite-backed task store.
//!
//! The heart of the crate is [`recurrence::next_occurrence`], which takes a
//! reference date, an anchor date in `YYYYMMDD` form, and a repeat rule
//! string, and returns the next date the rule lands on strictly after the
//! reference. Rules come in four kinds (see [`rule::Rule`]):
//!
//! - `d <n>`: every `n` days (1..=400)
//! - `y`: yearly on the anchor's month and day
//! - `w <d,...>`: on the given ISO weekdays (1 = Monday .. 7 = Sunday)
//! - `m <d,...> [<m,...>]`: on the given days of the month (negative
//!   counts from the month's end), optionally restricted to given months
//!
//! The engine is a pure function of its inputs: no I/O, no shared state,
//! safe to call from any number of concurrent request handlers.
//!
//! ## Core Modules
//!
//! - [`date`]: the 8-digit `YYYYMMDD` wire format
//! - [`rule`]: the repeat-rule grammar and its parser
//! - [`recurrence`]: the next-occurrence engine
//! - [`models`]: task row and insert data
//! - [`db`]: connection pool and migrations
//! - [`repository`]: data access layer with the Repository pattern
//! - [`error`]: error types shared across the crate

pub mod date;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod rule;
