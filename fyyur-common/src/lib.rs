//! # Fyyur Common Library
//!
//! Shared code for the Fyyur listing service:
//! - Database bootstrap, schema and record models
//! - Configuration loading
//! - Error type
//! - Timestamp parsing and display formatting

pub mod choices;
pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
