use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceBidRequest {
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceBidResponse {
    pub current_bid: i64,
}
