use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};

use crate::{
    dto::commission::SubmitProofRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::PaymentProof,
    response::ApiResponse,
    routes::multipart::{MultipartForm, parse_amount},
    services::commission_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/proof", post(submit_proof))
}

const MISSING_DETAILS: &str = "Please provide all (amount, comment) details.";

#[utoipa::path(
    post,
    path = "/api/commission/proof",
    responses(
        (status = 200, description = "Payment proof submitted (multipart form with proof image)", body = ApiResponse<PaymentProof>),
        (status = 400, description = "Claim exceeds unpaid commission or bad image"),
        (status = 403, description = "Not an auctioneer"),
    ),
    security(("bearer_auth" = [])),
    tag = "Commission"
)]
pub async fn submit_proof(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<PaymentProof>>> {
    let form = MultipartForm::read(multipart).await?;

    let proof = form.require_file("proof", "Payment Proof screenshot required.")?;
    let amount = parse_amount(
        &form.require_text("amount", MISSING_DETAILS)?,
        MISSING_DETAILS,
    )?;
    let comment = form.require_text("comment", MISSING_DETAILS)?;

    let payload = SubmitProofRequest {
        amount,
        comment,
        proof,
    };

    let resp = commission_service::submit_proof(&state, &user, payload).await?;
    Ok(Json(resp))
}
