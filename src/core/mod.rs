//! Core module - Shared types and utilities
//!
//! This module provides:
//! - Error types
//! - Key hashing and time helpers
//! - Entry path derivation
//! - Result model and rendering for the command-line front end

pub mod error;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
