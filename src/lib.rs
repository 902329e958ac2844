//! Session feedback service.
//!
//! Tracks game sessions, users and the 1–5 feedback users leave on sessions,
//! served over HTTP/JSON from a SQLite store.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod feedback;
pub mod models;
