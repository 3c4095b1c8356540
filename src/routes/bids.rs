use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::bids::{PlaceBidRequest, PlaceBidResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::bid_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{auction_id}", post(place_bid))
}

#[utoipa::path(
    post,
    path = "/api/bids/{auction_id}",
    params(
        ("auction_id" = Uuid, Path, description = "Auction ID")
    ),
    request_body = PlaceBidRequest,
    responses(
        (status = 200, description = "Bid accepted", body = ApiResponse<PlaceBidResponse>),
        (status = 400, description = "Auction closed or amount too low"),
        (status = 403, description = "Not a bidder"),
        (status = 404, description = "Auction not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bids"
)]
pub async fn place_bid(
    State(state): State<AppState>,
    user: AuthUser,
    Path(auction_id): Path<Uuid>,
    Json(payload): Json<PlaceBidRequest>,
) -> AppResult<Json<ApiResponse<PlaceBidResponse>>> {
    let resp = bid_service::place_bid(&state, &user, auction_id, payload).await?;
    Ok(Json(resp))
}
