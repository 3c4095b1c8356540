use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::{
        admin::{RevenueReport, UpdateProofStatusRequest, UserReport},
        commission::ProofList,
    },
    entity::{
        payment_proofs::{ActiveModel as ProofActive, Column as ProofCol, Entity as PaymentProofs},
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ROLE_AUCTIONEER, ROLE_BIDDER, ensure_super_admin},
    models::{PaymentProof, ProofStatus},
    response::{ApiResponse, Meta},
    routes::params::ProofListQuery,
    services::commission_service::proof_from_entity,
    state::AppState,
};

pub async fn list_payment_proofs(
    state: &AppState,
    user: &AuthUser,
    query: ProofListQuery,
) -> AppResult<ApiResponse<ProofList>> {
    ensure_super_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(ProofCol::Status.eq(status.clone()));
    }

    let finder = PaymentProofs::find()
        .filter(condition)
        .order_by_desc(ProofCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(proof_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Payment proofs",
        ProofList { items },
        Some(meta),
    ))
}

pub async fn get_payment_proof(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentProof>> {
    ensure_super_admin(user)?;
    let proof = PaymentProofs::find_by_id(id).one(&state.orm).await?;
    let proof = match proof {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "Payment proof",
        proof_from_entity(proof),
        Some(Meta::empty()),
    ))
}

pub async fn update_proof_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProofStatusRequest,
) -> AppResult<ApiResponse<PaymentProof>> {
    ensure_super_admin(user)?;

    let next = ProofStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid status value.".into()))?;

    if let Some(amount) = payload.amount {
        if amount <= 0 {
            return Err(AppError::BadRequest("Invalid amount.".into()));
        }
    }

    let txn = state.orm.begin().await?;
    let proof = PaymentProofs::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let proof = match proof {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let current = ProofStatus::parse(&proof.status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("corrupt proof status")))?;
    if !current.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Invalid status transition: {} -> {}",
            current.as_str(),
            next.as_str()
        )));
    }

    let user_id = proof.user_id;
    let amount = payload.amount.unwrap_or(proof.amount);

    let mut active: ProofActive = proof.into();
    active.status = Set(next.as_str().to_string());
    active.amount = Set(amount);
    if let Some(comment) = payload.comment {
        active.comment = Set(comment);
    }
    active.updated_at = Set(Utc::now().into());
    let proof = active.update(&txn).await?;

    // Settling a proof is the moment the owed balance actually shrinks.
    if next == ProofStatus::Settled {
        let submitter = Users::find_by_id(user_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let submitter = match submitter {
            Some(s) => s,
            None => return Err(AppError::NotFound),
        };
        let remaining = (submitter.unpaid_commission - amount).max(0);
        let mut submitter_active: UserActive = submitter.into();
        submitter_active.unpaid_commission = Set(remaining);
        submitter_active.update(&txn).await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "proof_status_update",
        Some("payment_proofs"),
        Some(serde_json::json!({ "proof_id": proof.id, "status": proof.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment proof status updated",
        proof_from_entity(proof),
        Some(Meta::empty()),
    ))
}

pub async fn delete_payment_proof(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_super_admin(user)?;
    let proof = PaymentProofs::find_by_id(id).one(&state.orm).await?;
    let proof = match proof {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    PaymentProofs::delete_by_id(proof.id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "proof_delete",
        Some("payment_proofs"),
        Some(serde_json::json!({ "proof_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment proof deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[derive(Debug, FromRow)]
struct MonthlyCountRow {
    month: i32,
    role: String,
    count: i64,
}

/// Registrations per calendar month split by role. Rows arrive ordered by
/// year then month; later years overwrite earlier slots, matching the
/// dashboard's 12-bucket view.
pub async fn monthly_registrations(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<UserReport>> {
    ensure_super_admin(user)?;

    let rows: Vec<MonthlyCountRow> = sqlx::query_as(
        r#"
        SELECT EXTRACT(MONTH FROM created_at)::int AS month,
               role,
               COUNT(*) AS count
        FROM users
        GROUP BY EXTRACT(YEAR FROM created_at), EXTRACT(MONTH FROM created_at), role
        ORDER BY EXTRACT(YEAR FROM created_at), EXTRACT(MONTH FROM created_at)
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let mut bidders = vec![0i64; 12];
    let mut auctioneers = vec![0i64; 12];
    for row in rows {
        let slot = (row.month - 1).clamp(0, 11) as usize;
        if row.role == ROLE_BIDDER {
            bidders[slot] = row.count;
        } else if row.role == ROLE_AUCTIONEER {
            auctioneers[slot] = row.count;
        }
    }

    Ok(ApiResponse::success(
        "User registrations",
        UserReport {
            bidders,
            auctioneers,
        },
        Some(Meta::empty()),
    ))
}

#[derive(Debug, FromRow)]
struct MonthlyRevenueRow {
    month: i32,
    total: i64,
}

pub async fn monthly_revenue(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<RevenueReport>> {
    ensure_super_admin(user)?;

    let rows: Vec<MonthlyRevenueRow> = sqlx::query_as(
        r#"
        SELECT EXTRACT(MONTH FROM created_at)::int AS month,
               SUM(amount)::bigint AS total
        FROM commissions
        GROUP BY EXTRACT(YEAR FROM created_at), EXTRACT(MONTH FROM created_at)
        ORDER BY EXTRACT(YEAR FROM created_at), EXTRACT(MONTH FROM created_at)
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let mut total_monthly_revenue = vec![0i64; 12];
    for row in rows {
        let slot = (row.month - 1).clamp(0, 11) as usize;
        total_monthly_revenue[slot] = row.total;
    }

    Ok(ApiResponse::success(
        "Monthly revenue",
        RevenueReport {
            total_monthly_revenue,
        },
        Some(Meta::empty()),
    ))
}
