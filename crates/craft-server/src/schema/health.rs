//! Health check response.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub craftnodes: u64,
    pub combinations: u64,
}
