use chrono::{Duration, Utc};

use axum_auction_api::models::{AuctionStatus, ProofStatus};
use axum_auction_api::services::commission_service::commission_for;
use axum_auction_api::storage::image_extension;

#[test]
fn auction_status_is_derived_from_the_window() {
    let now = Utc::now();
    let start = now + Duration::hours(1);
    let end = now + Duration::hours(2);

    assert_eq!(AuctionStatus::at(start, end, now), AuctionStatus::Upcoming);
    assert_eq!(
        AuctionStatus::at(start, end, start + Duration::minutes(30)),
        AuctionStatus::Open
    );
    assert_eq!(
        AuctionStatus::at(start, end, end + Duration::seconds(1)),
        AuctionStatus::Ended
    );
    // Boundaries belong to the open window.
    assert_eq!(AuctionStatus::at(start, end, start), AuctionStatus::Open);
    assert_eq!(AuctionStatus::at(start, end, end), AuctionStatus::Open);
}

#[test]
fn commission_is_five_percent() {
    assert_eq!(commission_for(1000), 50);
    assert_eq!(commission_for(2500), 125);
    assert_eq!(commission_for(0), 0);
    // Truncating division.
    assert_eq!(commission_for(19), 0);
    assert_eq!(commission_for(21), 1);
}

#[test]
fn proof_status_round_trips_and_rejects_unknown() {
    for status in [
        ProofStatus::Pending,
        ProofStatus::Approved,
        ProofStatus::Rejected,
        ProofStatus::Settled,
    ] {
        assert_eq!(ProofStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(ProofStatus::parse("Paid"), None);
    assert_eq!(ProofStatus::parse("pending"), None);
}

#[test]
fn proof_review_moves_strictly_forward() {
    use ProofStatus::*;

    assert!(Pending.can_transition_to(Approved));
    assert!(Pending.can_transition_to(Rejected));
    assert!(Approved.can_transition_to(Settled));

    assert!(!Pending.can_transition_to(Settled));
    assert!(!Pending.can_transition_to(Pending));
    assert!(!Approved.can_transition_to(Rejected));
    assert!(!Rejected.can_transition_to(Settled));
    assert!(!Settled.can_transition_to(Pending));
}

#[test]
fn image_formats_are_restricted() {
    assert_eq!(image_extension("image/jpeg").unwrap(), "jpg");
    assert_eq!(image_extension("image/jpg").unwrap(), "jpg");
    assert_eq!(image_extension("image/png").unwrap(), "png");
    assert_eq!(image_extension("image/webp").unwrap(), "webp");
    assert!(image_extension("image/gif").is_err());
    assert!(image_extension("application/pdf").is_err());
}
