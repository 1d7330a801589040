//! Core types, configuration and errors for the Vellum diagram engine.
//!
//! This crate provides the foundational types used across the other vellum crates:
//! - Value types (lengths, edges, colors)
//! - Unit string parsing
//! - The configuration surface for containers and artboards
//! - Error types

pub mod config;
pub mod errors;
pub mod types;
pub mod units;

pub use config::*;
pub use errors::*;
pub use types::*;
pub use units::parse_length;
