//! Persistence layer for the Kudos backend.
//!
//! This crate contains:
//! - SQLite connection management and embedded migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Immediate write transactions

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod transaction;
