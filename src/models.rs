use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub role: String,
    pub profile_image_public_id: String,
    pub profile_image_url: String,
    pub bank_account_number: Option<String>,
    pub bank_account_name: Option<String>,
    pub bank_name: Option<String>,
    pub upi_id: Option<String>,
    pub paypal_email: Option<String>,
    pub unpaid_commission: i64,
    pub auctions_won: i32,
    pub money_spent: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Auction {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub starting_bid: i64,
    pub current_bid: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub image_public_id: String,
    pub image_url: String,
    pub created_by: Uuid,
    pub highest_bidder_id: Option<Uuid>,
    pub settled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BidEntry {
    pub id: Uuid,
    pub auction_id: Uuid,
    pub bidder_id: Uuid,
    pub bidder_name: String,
    pub bidder_image: Option<String>,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentProof {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_public_id: String,
    pub image_url: String,
    pub amount: i64,
    pub comment: String,
    pub status: ProofStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Auction state is derived from the time window on every access; nothing is
/// stored. Settlement is the separate one-shot event stamped via `settled_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum AuctionStatus {
    Upcoming,
    Open,
    Ended,
}

impl AuctionStatus {
    pub fn at(start_time: DateTime<Utc>, end_time: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start_time {
            AuctionStatus::Upcoming
        } else if now > end_time {
            AuctionStatus::Ended
        } else {
            AuctionStatus::Open
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProofStatus {
    Pending,
    Approved,
    Rejected,
    Settled,
}

impl ProofStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(ProofStatus::Pending),
            "Approved" => Some(ProofStatus::Approved),
            "Rejected" => Some(ProofStatus::Rejected),
            "Settled" => Some(ProofStatus::Settled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProofStatus::Pending => "Pending",
            ProofStatus::Approved => "Approved",
            ProofStatus::Rejected => "Rejected",
            ProofStatus::Settled => "Settled",
        }
    }

    /// Review moves strictly forward: a pending proof is approved or
    /// rejected, and only an approved proof can be settled.
    pub fn can_transition_to(&self, next: ProofStatus) -> bool {
        matches!(
            (self, next),
            (ProofStatus::Pending, ProofStatus::Approved)
                | (ProofStatus::Pending, ProofStatus::Rejected)
                | (ProofStatus::Approved, ProofStatus::Settled)
        )
    }
}
