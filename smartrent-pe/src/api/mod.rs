//! HTTP API handlers for smartrent-pe

pub mod buildinfo;
pub mod health;
pub mod predict;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use predict::predict_routes;
