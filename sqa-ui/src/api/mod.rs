//! HTTP API handlers for sqa-ui

pub mod buildinfo;
pub mod catalog;
pub mod feedback;
pub mod health;
pub mod summary;
pub mod ui;

pub use catalog::catalog_routes;
pub use feedback::feedback_routes;
pub use health::health_routes;
pub use summary::summary_routes;
pub use ui::ui_routes;
