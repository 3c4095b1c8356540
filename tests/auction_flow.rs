use axum_auction_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::auctions::{CreateAuctionRequest, RepublishRequest},
    dto::bids::PlaceBidRequest,
    entity::{
        auctions::{ActiveModel as AuctionActive, Entity as Auctions},
        bids::{Column as BidCol, Entity as Bids},
        commissions::{Column as CommissionCol, Entity as Commissions},
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::AppError,
    middleware::auth::{AuthUser, ROLE_AUCTIONEER, ROLE_BIDDER, ROLE_SUPER_ADMIN},
    models::AuctionStatus,
    services::{auction_service, bid_service},
    state::AppState,
    storage::{ImageStore, UploadedImage},
};
use chrono::{Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, Statement};
use uuid::Uuid;

// Integration flow: bidders outbid each other -> auction ends -> settlement
// books winner stats and commission -> republish reverses everything.
#[tokio::test]
async fn bid_settle_and_republish_flow() -> anyhow::Result<()> {
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

    let auctioneer_id = create_user(&state, ROLE_AUCTIONEER, "seller@example.com").await?;
    let alice_id = create_user(&state, ROLE_BIDDER, "alice@example.com").await?;
    let bob_id = create_user(&state, ROLE_BIDDER, "bob@example.com").await?;

    let alice = AuthUser {
        user_id: alice_id,
        role: ROLE_BIDDER.into(),
    };
    let bob = AuthUser {
        user_id: bob_id,
        role: ROLE_BIDDER.into(),
    };
    let auctioneer = AuthUser {
        user_id: auctioneer_id,
        role: ROLE_AUCTIONEER.into(),
    };

    // Open window seeded directly; the create endpoint only accepts future
    // start times.
    let auction_id = seed_open_auction(&state, auctioneer_id, 1000).await?;

    // Below starting bid.
    let err = bid_service::place_bid(
        &state,
        &alice,
        auction_id,
        PlaceBidRequest { amount: 500 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Equal to current bid (== starting bid here) is still rejected.
    let err = bid_service::place_bid(
        &state,
        &alice,
        auction_id,
        PlaceBidRequest { amount: 1000 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Alice leads, Bob outbids, Alice re-bids: her row is updated in place.
    bid_service::place_bid(&state, &alice, auction_id, PlaceBidRequest { amount: 1500 }).await?;
    bid_service::place_bid(&state, &bob, auction_id, PlaceBidRequest { amount: 2000 }).await?;
    let resp =
        bid_service::place_bid(&state, &alice, auction_id, PlaceBidRequest { amount: 2500 })
            .await?;
    assert_eq!(resp.data.unwrap().current_bid, 2500);

    let alice_bids = Bids::find()
        .filter(BidCol::AuctionId.eq(auction_id))
        .filter(BidCol::BidderId.eq(alice_id))
        .all(&state.orm)
        .await?;
    assert_eq!(alice_bids.len(), 1, "re-bid must update, not duplicate");
    assert_eq!(alice_bids[0].amount, 2500);

    let auction = Auctions::find_by_id(auction_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(auction.current_bid, 2500);
    assert_eq!(auction.highest_bidder_id, Some(alice_id));

    // Detail view reports the derived status and ranks bids by amount.
    let detail = auction_service::get_auction_detail(&state, auction_id)
        .await?
        .data
        .unwrap();
    assert_eq!(detail.status, AuctionStatus::Open);
    let amounts: Vec<i64> = detail.bidders.iter().map(|b| b.amount).collect();
    assert_eq!(amounts, vec![2500, 2000]);

    // A losing bid after being outbid never lowers the leader.
    let err = bid_service::place_bid(
        &state,
        &bob,
        auction_id,
        PlaceBidRequest { amount: 2500 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Republish while the window is still open must fail.
    let err = auction_service::republish_auction(
        &state,
        &auctioneer,
        auction_id,
        RepublishRequest {
            start_time: Utc::now() + Duration::hours(1),
            end_time: Utc::now() + Duration::hours(2),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Close the window and settle.
    end_auction(&state, auction_id).await?;
    auction_service::settle_auction(&state, auction_id).await?;

    let winner = Users::find_by_id(alice_id).one(&state.orm).await?.unwrap();
    assert_eq!(winner.money_spent, 2500);
    assert_eq!(winner.auctions_won, 1);

    let creator = Users::find_by_id(auctioneer_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(creator.unpaid_commission, 125, "5% of 2500");

    // Settlement is idempotent: a second invocation books nothing.
    auction_service::settle_auction(&state, auction_id).await?;
    let creator = Users::find_by_id(auctioneer_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(creator.unpaid_commission, 125);
    let ledger = Commissions::find()
        .filter(CommissionCol::AuctionId.eq(auction_id))
        .all(&state.orm)
        .await?;
    assert_eq!(ledger.len(), 1);

    // Republish: winner stats reversed, bids wiped, state reset.
    let resp = auction_service::republish_auction(
        &state,
        &auctioneer,
        auction_id,
        RepublishRequest {
            start_time: Utc::now() + Duration::hours(1),
            end_time: Utc::now() + Duration::hours(2),
        },
    )
    .await?;
    let data = resp.data.unwrap();
    assert_eq!(data.auction.current_bid, 1000);
    assert_eq!(data.auction.highest_bidder_id, None);
    assert_eq!(data.auction.settled_at, None);
    assert_eq!(data.created_by.unpaid_commission, 0);

    let winner = Users::find_by_id(alice_id).one(&state.orm).await?.unwrap();
    assert_eq!(winner.money_spent, 0);
    assert_eq!(winner.auctions_won, 0);

    let remaining = Bids::find()
        .filter(BidCol::AuctionId.eq(auction_id))
        .all(&state.orm)
        .await?;
    assert!(remaining.is_empty(), "republish deletes the bid ledger");

    // The republished auction is active again, so a second listing is
    // rejected.
    let err = auction_service::create_auction(
        &state,
        &auctioneer,
        sample_create_request(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Super admin can always remove a listing.
    let admin_id = create_user(&state, ROLE_SUPER_ADMIN, "admin@example.com").await?;
    let admin = AuthUser {
        user_id: admin_id,
        role: ROLE_SUPER_ADMIN.into(),
    };
    auction_service::delete_auction(&state, &admin, auction_id).await?;
    assert!(
        Auctions::find_by_id(auction_id)
            .one(&state.orm)
            .await?
            .is_none()
    );

    // Settling an ended auction that attracted no bids books nothing: no
    // winner, no commission, just the settlement stamp.
    let unsold_id = seed_open_auction(&state, auctioneer_id, 1000).await?;
    end_auction(&state, unsold_id).await?;
    let unsold = auction_service::settle_auction(&state, unsold_id).await?;
    assert!(unsold.settled_at.is_some());

    let creator = Users::find_by_id(auctioneer_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(creator.unpaid_commission, 0);

    let ledger = Commissions::find()
        .filter(CommissionCol::AuctionId.eq(unsold_id))
        .all(&state.orm)
        .await?;
    assert!(ledger.is_empty());

    // With every prior listing ended, a new one is accepted again.
    let created = auction_service::create_auction(&state, &auctioneer, sample_create_request())
        .await?
        .data
        .unwrap();
    assert_eq!(created.current_bid, created.starting_bid);

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

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let is_auctioneer = role == ROLE_AUCTIONEER;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        user_name: Set(email.split('@').next().unwrap_or("user").to_string()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        phone: Set("0000000000".into()),
        address: Set("Somewhere".into()),
        role: Set(role.into()),
        profile_image_public_id: Set("users/test".into()),
        profile_image_url: Set("about:blank".into()),
        bank_account_number: Set(is_auctioneer.then(|| "0000111122223333".into())),
        bank_account_name: Set(is_auctioneer.then(|| "Seller".into())),
        bank_name: Set(is_auctioneer.then(|| "Test Bank".into())),
        upi_id: Set(is_auctioneer.then(|| "seller@upi".into())),
        paypal_email: Set(is_auctioneer.then(|| email.to_string())),
        unpaid_commission: Set(0),
        auctions_won: Set(0),
        money_spent: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn seed_open_auction(
    state: &AppState,
    created_by: Uuid,
    starting_bid: i64,
) -> anyhow::Result<Uuid> {
    let now = Utc::now();
    let auction = AuctionActive {
        id: Set(Uuid::new_v4()),
        title: Set("Vintage Radio".into()),
        description: Set("Working condition, minor scratches".into()),
        category: Set("Electronics".into()),
        condition: Set("Used".into()),
        starting_bid: Set(starting_bid),
        current_bid: Set(starting_bid),
        start_time: Set((now - Duration::hours(1)).into()),
        end_time: Set((now + Duration::hours(1)).into()),
        image_public_id: Set("auctions/test".into()),
        image_url: Set("about:blank".into()),
        created_by: Set(created_by),
        highest_bidder_id: Set(None),
        settled_at: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(auction.id)
}

async fn end_auction(state: &AppState, auction_id: Uuid) -> anyhow::Result<()> {
    let auction = Auctions::find_by_id(auction_id)
        .one(&state.orm)
        .await?
        .expect("auction exists");
    let now = Utc::now();
    let mut active: AuctionActive = auction.into();
    active.start_time = Set((now - Duration::hours(2)).into());
    active.end_time = Set((now - Duration::hours(1)).into());
    active.update(&state.orm).await?;
    Ok(())
}

fn sample_create_request() -> CreateAuctionRequest {
    let now = Utc::now();
    CreateAuctionRequest {
        title: "Second Listing".into(),
        description: "Should be rejected while another is active".into(),
        category: "Electronics".into(),
        condition: "New".into(),
        starting_bid: 500,
        start_time: now + Duration::hours(1),
        end_time: now + Duration::hours(2),
        image: sample_image(),
    }
}

fn sample_image() -> UploadedImage {
    UploadedImage {
        content_type: "image/png".into(),
        bytes: vec![0x89, 0x50, 0x4E, 0x47],
    }
}
