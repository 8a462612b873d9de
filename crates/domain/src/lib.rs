//! Domain layer for the Kudos backend.
//!
//! This crate contains:
//! - Domain models (User, Sprint, Praise, Template, Emoji, Message)
//! - Request shapes with validation rules
//! - The notification dispatcher boundary

pub mod models;
pub mod services;
