//! Shared utilities and common types for the Kudos backend.
//!
//! This crate provides functionality used across all other crates:
//! - Placeholder substitution for message templates
//! - Uniform random selection from content pools
//! - Common validation logic

pub mod selection;
pub mod templating;
pub mod validation;
