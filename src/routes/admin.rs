use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{RevenueReport, UpdateProofStatusRequest, UserReport},
        commission::ProofList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::PaymentProof,
    response::ApiResponse,
    routes::params::ProofListQuery,
    services::{admin_service, auction_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auctions/{id}", delete(delete_auction))
        .route("/payment-proofs", get(list_payment_proofs))
        .route("/payment-proofs/{id}", get(get_payment_proof))
        .route("/payment-proofs/{id}/status", patch(update_proof_status))
        .route("/payment-proofs/{id}", delete(delete_payment_proof))
        .route("/reports/users", get(monthly_registrations))
        .route("/reports/revenue", get(monthly_revenue))
}

#[utoipa::path(
    delete,
    path = "/api/admin/auctions/{id}",
    params(
        ("id" = Uuid, Path, description = "Auction ID")
    ),
    responses(
        (status = 200, description = "Auction removed (super admin)"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_auction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    // Ownership is waived for the super admin inside the service.
    let resp = auction_service::delete_auction(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/payment-proofs",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
    ),
    responses(
        (status = 200, description = "List payment proofs", body = ApiResponse<ProofList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_payment_proofs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ProofListQuery>,
) -> AppResult<Json<ApiResponse<ProofList>>> {
    let resp = admin_service::list_payment_proofs(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/payment-proofs/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment proof ID")
    ),
    responses(
        (status = 200, description = "Payment proof detail", body = ApiResponse<PaymentProof>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_payment_proof(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentProof>>> {
    let resp = admin_service::get_payment_proof(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/payment-proofs/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Payment proof ID")
    ),
    request_body = UpdateProofStatusRequest,
    responses(
        (status = 200, description = "Proof status updated", body = ApiResponse<PaymentProof>),
        (status = 400, description = "Unknown status or illegal transition"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_proof_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProofStatusRequest>,
) -> AppResult<Json<ApiResponse<PaymentProof>>> {
    let resp = admin_service::update_proof_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/payment-proofs/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment proof ID")
    ),
    responses(
        (status = 200, description = "Payment proof deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_payment_proof(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_payment_proof(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/users",
    responses(
        (status = 200, description = "Monthly registration counts by role", body = ApiResponse<UserReport>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn monthly_registrations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserReport>>> {
    let resp = admin_service::monthly_registrations(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/revenue",
    responses(
        (status = 200, description = "Monthly commission revenue", body = ApiResponse<RevenueReport>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn monthly_revenue(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RevenueReport>>> {
    let resp = admin_service::monthly_revenue(&state, &user).await?;
    Ok(Json(resp))
}
