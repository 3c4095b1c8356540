use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::bids::{PlaceBidRequest, PlaceBidResponse},
    entity::{
        auctions::{ActiveModel as AuctionActive, Entity as Auctions},
        bids::{ActiveModel as BidActive, Column as BidCol, Entity as Bids},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_bidder},
    models::AuctionStatus,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn place_bid(
    state: &AppState,
    user: &AuthUser,
    auction_id: Uuid,
    payload: PlaceBidRequest,
) -> AppResult<ApiResponse<PlaceBidResponse>> {
    ensure_bidder(user)?;

    let amount = payload.amount;
    if amount <= 0 {
        return Err(AppError::BadRequest("Bid amount is required".into()));
    }

    // The auction row lock serializes concurrent bids: the compare against
    // current_bid and the write of the new leader happen under one lock.
    let txn = state.orm.begin().await?;
    let auction = Auctions::find_by_id(auction_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let auction = match auction {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    let now = Utc::now();
    match AuctionStatus::at(
        auction.start_time.with_timezone(&Utc),
        auction.end_time.with_timezone(&Utc),
        now,
    ) {
        AuctionStatus::Upcoming => {
            return Err(AppError::BadRequest("Auction has not started yet.".into()));
        }
        AuctionStatus::Ended => {
            return Err(AppError::BadRequest("Auction is ended.".into()));
        }
        AuctionStatus::Open => {}
    }

    if amount < auction.starting_bid {
        return Err(AppError::BadRequest(format!(
            "Bid amount must be at least {}",
            auction.starting_bid
        )));
    }
    if amount <= auction.current_bid {
        return Err(AppError::BadRequest(
            "Bid amount must be higher than the current bid".into(),
        ));
    }

    let existing = Bids::find()
        .filter(
            Condition::all()
                .add(BidCol::AuctionId.eq(auction_id))
                .add(BidCol::BidderId.eq(user.user_id)),
        )
        .one(&txn)
        .await?;

    match existing {
        // A repeat bid raises the existing entry; created_at keeps the
        // original insertion order for tie-breaking.
        Some(bid) => {
            let mut active: BidActive = bid.into();
            active.amount = Set(amount);
            active.update(&txn).await?;
        }
        None => {
            let bidder = Users::find_by_id(user.user_id).one(&txn).await?;
            let bidder = match bidder {
                Some(b) => b,
                None => return Err(AppError::NotFound),
            };
            BidActive {
                id: Set(Uuid::new_v4()),
                auction_id: Set(auction_id),
                bidder_id: Set(user.user_id),
                bidder_name: Set(bidder.user_name),
                bidder_image: Set(Some(bidder.profile_image_url)),
                amount: Set(amount),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
        }
    }

    let mut active: AuctionActive = auction.into();
    active.current_bid = Set(amount);
    active.highest_bidder_id = Set(Some(user.user_id));
    let auction = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "bid_place",
        Some("bids"),
        Some(serde_json::json!({ "auction_id": auction_id, "amount": amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Bid placed successfully",
        PlaceBidResponse {
            current_bid: auction.current_bid,
        },
        Some(Meta::empty()),
    ))
}
