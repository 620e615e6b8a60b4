//! # SQA Common Library
//!
//! Shared code for the lyrics sentiment QA service:
//! - Database initialization and schema
//! - Catalog, feedback and summary stores
//! - Configuration loading
//! - Error types and timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
