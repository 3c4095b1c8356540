use axum_auction_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::admin::UpdateProofStatusRequest,
    dto::commission::SubmitProofRequest,
    entity::users::{ActiveModel as UserActive, Entity as Users},
    error::AppError,
    middleware::auth::{AuthUser, ROLE_AUCTIONEER, ROLE_SUPER_ADMIN},
    models::ProofStatus,
    services::{admin_service, commission_service},
    state::AppState,
    storage::{ImageStore, UploadedImage},
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use uuid::Uuid;

// Proof review flow: submit against an unpaid balance, approve, settle, and
// watch the balance shrink only at settlement.
#[tokio::test]
async fn proof_submission_and_review_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let auctioneer_id = create_auctioneer(&state, "seller@example.com", 500).await?;
    let admin_id = create_admin(&state, "admin@example.com").await?;

    let auctioneer = AuthUser {
        user_id: auctioneer_id,
        role: ROLE_AUCTIONEER.into(),
    };
    let admin = AuthUser {
        user_id: admin_id,
        role: ROLE_SUPER_ADMIN.into(),
    };

    // Claiming more than the unpaid balance is rejected.
    let err = commission_service::submit_proof(
        &state,
        &auctioneer,
        proof_request(600),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let resp = commission_service::submit_proof(&state, &auctioneer, proof_request(200)).await?;
    let proof = resp.data.expect("proof created");
    assert_eq!(proof.status, ProofStatus::Pending);
    assert_eq!(proof.amount, 200);

    // Submission alone never reduces the balance.
    let user = Users::find_by_id(auctioneer_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(user.unpaid_commission, 500);

    // Pending cannot jump straight to Settled.
    let err = admin_service::update_proof_status(
        &state,
        &admin,
        proof.id,
        UpdateProofStatusRequest {
            status: "Settled".into(),
            amount: None,
            comment: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Unknown status values are rejected outright.
    let err = admin_service::update_proof_status(
        &state,
        &admin,
        proof.id,
        UpdateProofStatusRequest {
            status: "Paid".into(),
            amount: None,
            comment: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let resp = admin_service::update_proof_status(
        &state,
        &admin,
        proof.id,
        UpdateProofStatusRequest {
            status: "Approved".into(),
            amount: None,
            comment: Some("Verified against bank statement".into()),
        },
    )
    .await?;
    assert_eq!(resp.data.unwrap().status, ProofStatus::Approved);

    // Approval still does not touch the balance.
    let user = Users::find_by_id(auctioneer_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(user.unpaid_commission, 500);

    // Settling applies the (admin-corrected) amount.
    let resp = admin_service::update_proof_status(
        &state,
        &admin,
        proof.id,
        UpdateProofStatusRequest {
            status: "Settled".into(),
            amount: Some(300),
            comment: None,
        },
    )
    .await?;
    let settled = resp.data.unwrap();
    assert_eq!(settled.status, ProofStatus::Settled);
    assert_eq!(settled.amount, 300);

    let user = Users::find_by_id(auctioneer_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(user.unpaid_commission, 200);

    // A rejected proof is terminal.
    let resp = commission_service::submit_proof(&state, &auctioneer, proof_request(100)).await?;
    let second = resp.data.expect("second proof created");
    admin_service::update_proof_status(
        &state,
        &admin,
        second.id,
        UpdateProofStatusRequest {
            status: "Rejected".into(),
            amount: None,
            comment: None,
        },
    )
    .await?;
    let err = admin_service::update_proof_status(
        &state,
        &admin,
        second.id,
        UpdateProofStatusRequest {
            status: "Settled".into(),
            amount: None,
            comment: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // A fully-paid-up auctioneer gets a friendly success and no proof row.
    let paidup_id = create_auctioneer(&state, "paidup@example.com", 0).await?;
    let paidup = AuthUser {
        user_id: paidup_id,
        role: ROLE_AUCTIONEER.into(),
    };
    let resp = commission_service::submit_proof(&state, &paidup, proof_request(100)).await?;
    assert_eq!(resp.message, "You have no unpaid commission.");
    assert!(resp.data.is_none());

    let proofs = admin_service::list_payment_proofs(
        &state,
        &admin,
        axum_auction_api::routes::params::ProofListQuery {
            pagination: axum_auction_api::routes::params::Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            status: None,
        },
    )
    .await?;
    let items = proofs.data.unwrap().items;
    assert_eq!(items.len(), 2, "short circuit must not create a proof");
    assert!(items.iter().all(|p| p.user_id != paidup_id));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(database_url).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE bids, commissions, payment_proofs, auctions, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let upload_dir = std::env::temp_dir().join(format!("auction-test-{}", Uuid::new_v4()));
    let images = ImageStore::new(upload_dir, "http://localhost:3000");

    Ok(AppState { pool, orm, images })
}

async fn create_auctioneer(
    state: &AppState,
    email: &str,
    unpaid_commission: i64,
) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        user_name: Set(email.split('@').next().unwrap_or("seller").to_string()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        phone: Set("0000000000".into()),
        address: Set("Somewhere".into()),
        role: Set(ROLE_AUCTIONEER.into()),
        profile_image_public_id: Set("users/test".into()),
        profile_image_url: Set("about:blank".into()),
        bank_account_number: Set(Some("0000111122223333".into())),
        bank_account_name: Set(Some("Seller".into())),
        bank_name: Set(Some("Test Bank".into())),
        upi_id: Set(Some("seller@upi".into())),
        paypal_email: Set(Some(email.to_string())),
        unpaid_commission: Set(unpaid_commission),
        auctions_won: Set(0),
        money_spent: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn create_admin(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        user_name: Set("admin".into()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        phone: Set("0000000000".into()),
        address: Set("HQ".into()),
        role: Set(ROLE_SUPER_ADMIN.into()),
        profile_image_public_id: Set("users/admin".into()),
        profile_image_url: Set("about:blank".into()),
        bank_account_number: Set(None),
        bank_account_name: Set(None),
        bank_name: Set(None),
        upi_id: Set(None),
        paypal_email: Set(None),
        unpaid_commission: Set(0),
        auctions_won: Set(0),
        money_spent: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

fn proof_request(amount: i64) -> SubmitProofRequest {
    SubmitProofRequest {
        amount,
        comment: "Paid via bank transfer".into(),
        proof: UploadedImage {
            content_type: "image/png".into(),
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
        },
    }
}
