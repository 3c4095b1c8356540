use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProofStatusRequest {
    pub status: String,
    pub amount: Option<i64>,
    pub comment: Option<String>,
}

/// Per-month registration counts, index 0 = January.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserReport {
    pub bidders: Vec<i64>,
    pub auctioneers: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueReport {
    pub total_monthly_revenue: Vec<i64>,
}
