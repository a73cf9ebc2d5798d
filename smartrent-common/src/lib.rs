//! # SmartRent Common Library
//!
//! Shared code for the SmartRent services including:
//! - Property attribute and estimate response types
//! - Configuration loading (TOML file, environment, compiled defaults)
//! - Common error type

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
