//! Database models and queries

pub mod catalog;
pub mod feedback;
pub mod init;
pub mod models;
pub mod seed;
pub mod summary;

pub use init::*;
pub use models::*;
