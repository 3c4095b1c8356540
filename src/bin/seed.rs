use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_auction_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    middleware::auth::{ROLE_AUCTIONEER, ROLE_BIDDER, ROLE_SUPER_ADMIN},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;

    // The super admin is never created through registration.
    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", ROLE_SUPER_ADMIN).await?;
    let auctioneer_id =
        ensure_user(&pool, "auctioneer@example.com", "seller123", ROLE_AUCTIONEER).await?;
    let bidder_id = ensure_user(&pool, "bidder@example.com", "bidder123", ROLE_BIDDER).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Auctioneer ID: {auctioneer_id}, Bidder ID: {bidder_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let user_name = email.split('@').next().unwrap_or("user");

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (
            id, user_name, email, password_hash, phone, address, role,
            profile_image_public_id, profile_image_url,
            bank_account_number, bank_account_name, bank_name, upi_id, paypal_email
        )
        VALUES ($1, $2, $3, $4, '0000000000', 'Seeded', $5,
                'seed/none', 'about:blank',
                $6, $7, $8, $9, $10)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind((role == ROLE_AUCTIONEER).then(|| "0000111122223333"))
    .bind((role == ROLE_AUCTIONEER).then(|| user_name))
    .bind((role == ROLE_AUCTIONEER).then(|| "Seed Bank"))
    .bind((role == ROLE_AUCTIONEER).then(|| format!("{user_name}@upi")))
    .bind((role == ROLE_AUCTIONEER).then(|| email.to_string()))
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}
