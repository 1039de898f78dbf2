//! Craftnode lookup request types.

use serde::Deserialize;

/// Query for `GET /craftnode?text=`.
#[derive(Debug, Clone, Deserialize)]
pub struct CraftnodeQuery {
    #[serde(default)]
    pub text: String,
}
