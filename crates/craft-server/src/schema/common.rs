//! Common response types shared by the lookup endpoints.

use craft_storage::Craftnode;
use serde::Serialize;

/// Answer to a lookup: `{exists: true, result}` on hit, `{exists: false}`
/// on miss. A miss is never an error.
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Craftnode>,
}

impl LookupResponse {
    pub fn from_option(result: Option<Craftnode>) -> Self {
        LookupResponse {
            exists: result.is_some(),
            result,
        }
    }
}
