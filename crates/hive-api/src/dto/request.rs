//! Request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use hive_entity::NetworkUpdate;

/// Body of `POST /network` and `PUT /network/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRequest {
    #[validate(length(min = 1, max = 128, message = "Network name must be 1-128 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 64))]
    pub key: Option<String>,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
}

impl From<NetworkRequest> for NetworkUpdate {
    fn from(req: NetworkRequest) -> Self {
        Self {
            name: req.name,
            key: req.key,
            description: req.description,
        }
    }
}
