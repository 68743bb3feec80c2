//! Keel Core - Foundational types for the Keel template linter
//!
//! This crate provides the types every other Keel crate depends on:
//! - `Position` - 1-based line/column source locations
//! - `LineIndex` - byte offset to `Position` conversion
//! - Error types and Result alias

mod error;
mod position;

pub use error::{KeelError, Result};
pub use position::{LineIndex, Position};
