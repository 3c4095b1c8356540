use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    models::User,
    response::ApiResponse,
    routes::multipart::MultipartForm,
    services::auth_service::{login_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

const MISSING_FIELDS: &str = "Please fill all the required fields.";

#[utoipa::path(
    post,
    path = "/api/auth/register",
    responses(
        (status = 200, description = "Register user (multipart form with profile_image)", body = ApiResponse<User>),
        (status = 400, description = "Missing fields or invalid image"),
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<User>>> {
    let form = MultipartForm::read(multipart).await?;

    let profile_image = form.require_file("profile_image", "Profile image Required.")?;

    let payload = RegisterRequest {
        user_name: form.require_text("user_name", MISSING_FIELDS)?,
        email: form.require_text("email", MISSING_FIELDS)?,
        password: form.require_text("password", MISSING_FIELDS)?,
        phone: form.require_text("phone", MISSING_FIELDS)?,
        address: form.require_text("address", MISSING_FIELDS)?,
        role: form.require_text("role", MISSING_FIELDS)?,
        bank_account_number: form.text("bank_account_number"),
        bank_account_name: form.text("bank_account_name"),
        bank_name: form.text("bank_name"),
        upi_id: form.text("upi_id"),
        paypal_email: form.text("paypal_email"),
        profile_image,
    };

    let resp = register_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout (token disposal is client-side)"),
    ),
    tag = "Auth"
)]
pub async fn logout() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        "Logged out",
        serde_json::json!({}),
        None,
    ))
}
