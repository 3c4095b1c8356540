use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::commission::SubmitProofRequest,
    entity::payment_proofs::{ActiveModel as ProofActive, Model as ProofModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_auctioneer},
    models::{PaymentProof, ProofStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

const COMMISSION_RATE_PERCENT: i64 = 5;

/// Platform cut of an auction's final bid. Flat rate, truncating division.
pub fn commission_for(final_bid: i64) -> i64 {
    final_bid * COMMISSION_RATE_PERCENT / 100
}

pub async fn submit_proof(
    state: &AppState,
    user: &AuthUser,
    payload: SubmitProofRequest,
) -> AppResult<ApiResponse<PaymentProof>> {
    ensure_auctioneer(user)?;

    if payload.amount <= 0 || payload.comment.is_empty() {
        return Err(AppError::BadRequest(
            "Please provide all (amount, comment) details.".into(),
        ));
    }

    let row: Option<(i64,)> = sqlx::query_as("SELECT unpaid_commission FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    let unpaid_commission = match row {
        Some((unpaid,)) => unpaid,
        None => return Err(AppError::NotFound),
    };

    // Nothing owed: success with no proof created, by design not an error.
    if unpaid_commission == 0 {
        return Ok(ApiResponse::message_only("You have no unpaid commission."));
    }

    if payload.amount > unpaid_commission {
        return Err(AppError::BadRequest(
            "You cannot claim more than your unpaid commission.".into(),
        ));
    }

    let image = state.images.store("payment_proofs", &payload.proof).await?;

    let proof = ProofActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        image_public_id: Set(image.public_id),
        image_url: Set(image.url),
        amount: Set(payload.amount),
        comment: Set(payload.comment),
        status: Set(ProofStatus::Pending.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "proof_submit",
        Some("payment_proofs"),
        Some(serde_json::json!({ "proof_id": proof.id, "amount": proof.amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment proof submitted successfully.",
        proof_from_entity(proof),
        Some(Meta::empty()),
    ))
}

pub(crate) fn proof_from_entity(model: ProofModel) -> PaymentProof {
    let status = ProofStatus::parse(&model.status).unwrap_or(ProofStatus::Pending);
    PaymentProof {
        id: model.id,
        user_id: model.user_id,
        image_public_id: model.image_public_id,
        image_url: model.image_url,
        amount: model.amount,
        comment: model.comment,
        status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
