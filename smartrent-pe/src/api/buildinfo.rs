//! `GET /api/buildinfo`
//!
//! Identifies the running binary and the local formula it falls back to, so
//! an operator can tell which pricing rules produced a fallback estimate.

use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::engine::LOCAL_MODEL_VERSION;

#[derive(Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: String,
    pub version: String,
    /// Short commit hash, suffixed `-dirty` for uncommitted changes
    pub git_hash: String,
    pub build_timestamp: String,
    pub build_profile: String,
    pub local_model_version: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_hash: env!("GIT_HASH").to_string(),
            build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
            build_profile: env!("BUILD_PROFILE").to_string(),
            local_model_version: LOCAL_MODEL_VERSION.to_string(),
        }
    }
}

pub async fn get_build_info() -> Json<BuildInfo> {
    Json(BuildInfo::current())
}
