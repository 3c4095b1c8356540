use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::auctions::{AuctionDetail, AuctionList, CreateAuctionRequest, RepublishRequest, RepublishResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Auction,
    response::ApiResponse,
    routes::multipart::{MultipartForm, parse_amount, parse_datetime},
    routes::params::AuctionListQuery,
    services::auction_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_auction))
        .route("/", get(list_auctions))
        .route("/my", get(my_auctions))
        .route("/{id}", get(get_auction))
        .route("/{id}", delete(delete_auction))
        .route("/{id}/republish", put(republish_auction))
}

const MISSING_DETAILS: &str = "Please provide all details.";

#[utoipa::path(
    post,
    path = "/api/auctions",
    responses(
        (status = 200, description = "Create auction (multipart form with image)", body = ApiResponse<Auction>),
        (status = 400, description = "Invalid window, duplicate active auction, or bad image"),
        (status = 403, description = "Not an auctioneer"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auctions"
)]
pub async fn create_auction(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Auction>>> {
    let form = MultipartForm::read(multipart).await?;

    let image = form.require_file("image", "Auction item image Required.")?;
    let starting_bid = parse_amount(
        &form.require_text("starting_bid", MISSING_DETAILS)?,
        "Invalid starting bid.",
    )?;
    let start_time = parse_datetime(
        &form.require_text("start_time", MISSING_DETAILS)?,
        "Invalid start time.",
    )?;
    let end_time = parse_datetime(
        &form.require_text("end_time", MISSING_DETAILS)?,
        "Invalid end time.",
    )?;

    let payload = CreateAuctionRequest {
        title: form.require_text("title", MISSING_DETAILS)?,
        description: form.require_text("description", MISSING_DETAILS)?,
        category: form.require_text("category", MISSING_DETAILS)?,
        condition: form.require_text("condition", MISSING_DETAILS)?,
        starting_bid,
        start_time,
        end_time,
        image,
    };

    let resp = auction_service::create_auction(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auctions",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc"),
    ),
    responses(
        (status = 200, description = "List auctions", body = ApiResponse<AuctionList>)
    ),
    tag = "Auctions"
)]
pub async fn list_auctions(
    State(state): State<AppState>,
    Query(query): Query<AuctionListQuery>,
) -> AppResult<Json<ApiResponse<AuctionList>>> {
    let resp = auction_service::list_auctions(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auctions/my",
    responses(
        (status = 200, description = "Caller's auctions", body = ApiResponse<AuctionList>),
        (status = 403, description = "Not an auctioneer"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auctions"
)]
pub async fn my_auctions(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AuctionList>>> {
    let resp = auction_service::my_auctions(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auctions/{id}",
    params(
        ("id" = Uuid, Path, description = "Auction ID")
    ),
    responses(
        (status = 200, description = "Auction with bids sorted by amount", body = ApiResponse<AuctionDetail>),
        (status = 404, description = "Auction not found"),
    ),
    tag = "Auctions"
)]
pub async fn get_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AuctionDetail>>> {
    let resp = auction_service::get_auction_detail(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/auctions/{id}",
    params(
        ("id" = Uuid, Path, description = "Auction ID")
    ),
    responses(
        (status = 200, description = "Auction removed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Auction not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auctions"
)]
pub async fn delete_auction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auction_service::delete_auction(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/auctions/{id}/republish",
    params(
        ("id" = Uuid, Path, description = "Auction ID")
    ),
    request_body = RepublishRequest,
    responses(
        (status = 200, description = "Auction reset with a new window", body = ApiResponse<RepublishResponse>),
        (status = 400, description = "Auction still open or invalid window"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Auction not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auctions"
)]
pub async fn republish_auction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RepublishRequest>,
) -> AppResult<Json<ApiResponse<RepublishResponse>>> {
    let resp = auction_service::republish_auction(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
