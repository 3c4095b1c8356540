use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auctions::{AuctionDetail, AuctionList, CreateAuctionRequest, RepublishRequest, RepublishResponse},
    entity::{
        auctions::{ActiveModel as AuctionActive, Column as AuctionCol, Entity as Auctions, Model as AuctionModel},
        bids::{Column as BidCol, Entity as Bids, Model as BidModel},
        commissions::ActiveModel as CommissionActive,
        users::{ActiveModel as UserActive, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ROLE_SUPER_ADMIN, ensure_auctioneer},
    models::{Auction, AuctionStatus, BidEntry, User},
    response::{ApiResponse, Meta},
    routes::params::{AuctionListQuery, SortOrder},
    services::commission_service::commission_for,
    state::AppState,
};

pub async fn create_auction(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAuctionRequest,
) -> AppResult<ApiResponse<Auction>> {
    ensure_auctioneer(user)?;

    if payload.title.is_empty()
        || payload.description.is_empty()
        || payload.category.is_empty()
        || payload.condition.is_empty()
        || payload.starting_bid <= 0
    {
        return Err(AppError::BadRequest("Please provide all details.".into()));
    }

    let now = Utc::now();
    if payload.start_time <= now {
        return Err(AppError::BadRequest(
            "Invalid start time. Start time must be in the future.".into(),
        ));
    }
    if payload.end_time <= payload.start_time {
        return Err(AppError::BadRequest(
            "End time must be after start time.".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    // The creator's row is the serialization point for the one-active-auction
    // rule; two concurrent creates queue on this lock.
    let creator = Users::find_by_id(user.user_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    if creator.is_none() {
        return Err(AppError::NotFound);
    }

    let active_auction = Auctions::find()
        .filter(
            Condition::all()
                .add(AuctionCol::CreatedBy.eq(user.user_id))
                .add(AuctionCol::EndTime.gt(now)),
        )
        .one(&txn)
        .await?;
    if active_auction.is_some() {
        return Err(AppError::BadRequest(
            "You already have an active auction.".into(),
        ));
    }

    let image = state.images.store("auctions", &payload.image).await?;

    let auction = AuctionActive {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        description: Set(payload.description),
        category: Set(payload.category),
        condition: Set(payload.condition),
        starting_bid: Set(payload.starting_bid),
        current_bid: Set(payload.starting_bid),
        start_time: Set(payload.start_time.into()),
        end_time: Set(payload.end_time.into()),
        image_public_id: Set(image.public_id),
        image_url: Set(image.url),
        created_by: Set(user.user_id),
        highest_bidder_id: Set(None),
        settled_at: Set(None),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "auction_create",
        Some("auctions"),
        Some(serde_json::json!({ "auction_id": auction.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Auction created",
        auction_from_entity(auction),
        Some(Meta::empty()),
    ))
}

pub async fn list_auctions(
    state: &AppState,
    query: AuctionListQuery,
) -> AppResult<ApiResponse<AuctionList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(AuctionCol::Category.eq(category.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Auctions::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(AuctionCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(AuctionCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(auction_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Auctions",
        AuctionList { items },
        Some(meta),
    ))
}

pub async fn my_auctions(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AuctionList>> {
    ensure_auctioneer(user)?;

    let items = Auctions::find()
        .filter(AuctionCol::CreatedBy.eq(user.user_id))
        .order_by_desc(AuctionCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(auction_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "My auctions",
        AuctionList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_auction_detail(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<AuctionDetail>> {
    let auction = Auctions::find_by_id(id).one(&state.orm).await?;
    let mut auction = match auction {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    // First post-end read performs the settlement event.
    let now = Utc::now();
    let status = AuctionStatus::at(
        auction.start_time.with_timezone(&Utc),
        auction.end_time.with_timezone(&Utc),
        now,
    );
    if status == AuctionStatus::Ended && auction.settled_at.is_none() {
        auction = settle_auction(state, id).await?;
    }

    let bidders = Bids::find()
        .filter(BidCol::AuctionId.eq(id))
        .order_by_desc(BidCol::Amount)
        .order_by_asc(BidCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(bid_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Auction detail",
        AuctionDetail {
            auction: auction_from_entity(auction),
            status,
            bidders,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_auction(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let auction = Auctions::find_by_id(id).one(&state.orm).await?;
    let auction = match auction {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    if auction.created_by != user.user_id && user.role != ROLE_SUPER_ADMIN {
        return Err(AppError::Forbidden);
    }

    let txn = state.orm.begin().await?;
    Bids::delete_many()
        .filter(BidCol::AuctionId.eq(id))
        .exec(&txn)
        .await?;
    Auctions::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "auction_delete",
        Some("auctions"),
        Some(serde_json::json!({ "auction_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Auction removed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Idempotent settlement event: books winner stats and commission exactly
/// once per auction, keyed on `settled_at`.
pub async fn settle_auction(state: &AppState, id: Uuid) -> AppResult<AuctionModel> {
    let txn = state.orm.begin().await?;
    let auction = Auctions::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let auction = match auction {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    let auction = settle_locked(&txn, auction).await?;
    txn.commit().await?;
    Ok(auction)
}

// Caller holds the auction row lock.
async fn settle_locked(
    txn: &DatabaseTransaction,
    auction: AuctionModel,
) -> AppResult<AuctionModel> {
    let now = Utc::now();
    let status = AuctionStatus::at(
        auction.start_time.with_timezone(&Utc),
        auction.end_time.with_timezone(&Utc),
        now,
    );
    if status != AuctionStatus::Ended || auction.settled_at.is_some() {
        return Ok(auction);
    }

    // An ended auction with no accepted bids settles empty: no winner, no
    // commission.
    if let Some(winner_id) = auction.highest_bidder_id {
        let winner = Users::find_by_id(winner_id)
            .lock(LockType::Update)
            .one(txn)
            .await?;
        let winner = match winner {
            Some(w) => w,
            None => return Err(AppError::NotFound),
        };
        let mut winner_active: UserActive = winner.clone().into();
        winner_active.money_spent = Set(winner.money_spent + auction.current_bid);
        winner_active.auctions_won = Set(winner.auctions_won + 1);
        winner_active.update(txn).await?;

        let commission = commission_for(auction.current_bid);
        CommissionActive {
            id: Set(Uuid::new_v4()),
            auction_id: Set(auction.id),
            user_id: Set(auction.created_by),
            amount: Set(commission),
            created_at: NotSet,
        }
        .insert(txn)
        .await?;

        let creator = Users::find_by_id(auction.created_by)
            .lock(LockType::Update)
            .one(txn)
            .await?;
        let creator = match creator {
            Some(c) => c,
            None => return Err(AppError::NotFound),
        };
        let mut creator_active: UserActive = creator.clone().into();
        creator_active.unpaid_commission = Set(creator.unpaid_commission + commission);
        creator_active.update(txn).await?;

        tracing::info!(
            auction_id = %auction.id,
            winner_id = %winner_id,
            commission,
            "auction settled"
        );
    }

    let mut active: AuctionActive = auction.into();
    active.settled_at = Set(Some(now.into()));
    let auction = active.update(txn).await?;
    Ok(auction)
}

pub async fn republish_auction(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RepublishRequest,
) -> AppResult<ApiResponse<RepublishResponse>> {
    ensure_auctioneer(user)?;

    let txn = state.orm.begin().await?;
    let auction = Auctions::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let auction = match auction {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    if auction.created_by != user.user_id {
        return Err(AppError::Forbidden);
    }

    let now = Utc::now();
    let status = AuctionStatus::at(
        auction.start_time.with_timezone(&Utc),
        auction.end_time.with_timezone(&Utc),
        now,
    );
    if status != AuctionStatus::Ended {
        return Err(AppError::BadRequest(
            "Auction is still active. Cannot republish.".into(),
        ));
    }

    if payload.start_time <= now {
        return Err(AppError::BadRequest(
            "Invalid start time. Start time must be in the future.".into(),
        ));
    }
    if payload.end_time <= payload.start_time {
        return Err(AppError::BadRequest(
            "End time must be after start time.".into(),
        ));
    }

    // Settle first so the winner increments being reversed below are
    // guaranteed to exist, whether or not a post-end read got here earlier.
    let auction = settle_locked(&txn, auction).await?;

    if let Some(winner_id) = auction.highest_bidder_id {
        let winner = Users::find_by_id(winner_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let winner = match winner {
            Some(w) => w,
            None => return Err(AppError::NotFound),
        };
        let mut winner_active: UserActive = winner.clone().into();
        winner_active.money_spent = Set(winner.money_spent - auction.current_bid);
        winner_active.auctions_won = Set(winner.auctions_won - 1);
        winner_active.update(&txn).await?;
    }

    Bids::delete_many()
        .filter(BidCol::AuctionId.eq(id))
        .exec(&txn)
        .await?;

    let starting_bid = auction.starting_bid;
    let created_by = auction.created_by;
    let mut active: AuctionActive = auction.into();
    active.start_time = Set(payload.start_time.into());
    active.end_time = Set(payload.end_time.into());
    active.current_bid = Set(starting_bid);
    active.highest_bidder_id = Set(None);
    active.settled_at = Set(None);
    let auction = active.update(&txn).await?;

    let creator = Users::find_by_id(created_by)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let creator = match creator {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    let mut creator_active: UserActive = creator.into();
    creator_active.unpaid_commission = Set(0);
    let creator = creator_active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "auction_republish",
        Some("auctions"),
        Some(serde_json::json!({ "auction_id": auction.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Auction republished",
        RepublishResponse {
            auction: auction_from_entity(auction),
            created_by: user_from_entity(creator),
        },
        Some(Meta::empty()),
    ))
}

pub(crate) fn auction_from_entity(model: AuctionModel) -> Auction {
    Auction {
        id: model.id,
        title: model.title,
        description: model.description,
        category: model.category,
        condition: model.condition,
        starting_bid: model.starting_bid,
        current_bid: model.current_bid,
        start_time: model.start_time.with_timezone(&Utc),
        end_time: model.end_time.with_timezone(&Utc),
        image_public_id: model.image_public_id,
        image_url: model.image_url,
        created_by: model.created_by,
        highest_bidder_id: model.highest_bidder_id,
        settled_at: model.settled_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn bid_from_entity(model: BidModel) -> BidEntry {
    BidEntry {
        id: model.id,
        auction_id: model.auction_id,
        bidder_id: model.bidder_id,
        bidder_name: model.bidder_name,
        bidder_image: model.bidder_image,
        amount: model.amount,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        user_name: model.user_name,
        email: model.email,
        password_hash: model.password_hash,
        phone: model.phone,
        address: model.address,
        role: model.role,
        profile_image_public_id: model.profile_image_public_id,
        profile_image_url: model.profile_image_url,
        bank_account_number: model.bank_account_number,
        bank_account_name: model.bank_account_name,
        bank_name: model.bank_name,
        upi_id: model.upi_id,
        paypal_email: model.paypal_email,
        unpaid_commission: model.unpaid_commission,
        auctions_won: model.auctions_won,
        money_spent: model.money_spent,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
