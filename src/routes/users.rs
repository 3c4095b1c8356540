use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::user_service::{self, Leaderboard},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/leaderboard", get(leaderboard))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Authenticated user's profile", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::get_profile(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/leaderboard",
    responses(
        (status = 200, description = "Bidders ranked by money spent", body = ApiResponse<Leaderboard>),
    ),
    tag = "Users"
)]
pub async fn leaderboard(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Leaderboard>>> {
    let resp = user_service::fetch_leaderboard(&state.pool).await?;
    Ok(Json(resp))
}
