use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ROLE_BIDDER},
    models::User,
    response::{ApiResponse, Meta},
};

pub async fn get_profile(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let profile: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(pool)
        .await?;

    let profile = match profile {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success("Profile", profile, None))
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct Leaderboard {
    pub items: Vec<User>,
}

/// Bidders ranked by lifetime winning spend. Zero-spend users carry no
/// signal and are omitted.
pub async fn fetch_leaderboard(pool: &DbPool) -> AppResult<ApiResponse<Leaderboard>> {
    let items: Vec<User> = sqlx::query_as(
        r#"
        SELECT * FROM users
        WHERE role = $1 AND money_spent > 0
        ORDER BY money_spent DESC
        LIMIT 100
        "#,
    )
    .bind(ROLE_BIDDER)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(
        "Leaderboard",
        Leaderboard { items },
        Some(Meta::empty()),
    ))
}
