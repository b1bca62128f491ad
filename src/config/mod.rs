//! Configuration module for mdconvert
//!
//! This module handles user preferences, including deserialization from
//! JSON and lookup in platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
