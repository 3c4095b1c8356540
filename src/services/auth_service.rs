use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::{ROLE_AUCTIONEER, ROLE_BIDDER},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    if payload.user_name.is_empty()
        || payload.email.is_empty()
        || payload.password.is_empty()
        || payload.phone.is_empty()
        || payload.address.is_empty()
    {
        return Err(AppError::BadRequest(
            "Please fill all the required fields.".to_string(),
        ));
    }

    if payload.role != ROLE_AUCTIONEER && payload.role != ROLE_BIDDER {
        return Err(AppError::BadRequest("Invalid role.".to_string()));
    }

    // Payout destinations are mandatory for auctioneers; commission is
    // settled against them.
    if payload.role == ROLE_AUCTIONEER {
        let complete = [
            &payload.bank_account_number,
            &payload.bank_account_name,
            &payload.bank_name,
            &payload.upi_id,
            &payload.paypal_email,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()));
        if !complete {
            return Err(AppError::BadRequest(
                "Please fill all the payment method fields.".to_string(),
            ));
        }
    }

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(&state.pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::BadRequest(
            "User already registered with this email.".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let image = state.images.store("users", &payload.profile_image).await?;

    let id = Uuid::new_v4();
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (
            id, user_name, email, password_hash, phone, address, role,
            profile_image_public_id, profile_image_url,
            bank_account_number, bank_account_name, bank_name, upi_id, paypal_email
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.user_name.as_str())
    .bind(payload.email.as_str())
    .bind(password_hash)
    .bind(payload.phone.as_str())
    .bind(payload.address.as_str())
    .bind(payload.role.as_str())
    .bind(image.public_id)
    .bind(image.url)
    .bind(payload.bank_account_number)
    .bind(payload.bank_account_name)
    .bind(payload.bank_name)
    .bind(payload.upi_id)
    .bind(payload.paypal_email)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id, "role": user.role })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
    Ok(ApiResponse::success("User registered", user, None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&state.pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}
