//! Storage layer
//!
//! Uses SQLite (embedded) for the country table.

pub mod db;

pub use db::Database;
