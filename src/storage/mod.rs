//! Storage layer for breathe.
//!
//! `SQLite`-based persistence for recorded breathing sessions.

mod database;
mod migrations;

pub use database::Database;
