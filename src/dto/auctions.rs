use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Auction, AuctionStatus, BidEntry, User};
use crate::storage::UploadedImage;

// Assembled from the multipart form by the route handler.
#[derive(Debug)]
pub struct CreateAuctionRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub starting_bid: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub image: UploadedImage,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RepublishRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuctionList {
    pub items: Vec<Auction>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuctionDetail {
    pub auction: Auction,
    pub status: AuctionStatus,
    pub bidders: Vec<BidEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RepublishResponse {
    pub auction: Auction,
    pub created_by: User,
}
