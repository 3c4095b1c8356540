use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{RevenueReport, UpdateProofStatusRequest, UserReport},
        auctions::{AuctionDetail, AuctionList, RepublishRequest, RepublishResponse},
        auth::{LoginRequest, LoginResponse},
        bids::{PlaceBidRequest, PlaceBidResponse},
        commission::ProofList,
    },
    models::{Auction, AuctionStatus, BidEntry, PaymentProof, ProofStatus, User},
    response::{ApiResponse, Meta},
    routes::{admin, auctions, auth, bids, commission, health, params, users},
    services::user_service::Leaderboard,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        users::me,
        users::leaderboard,
        auctions::create_auction,
        auctions::list_auctions,
        auctions::my_auctions,
        auctions::get_auction,
        auctions::delete_auction,
        auctions::republish_auction,
        bids::place_bid,
        commission::submit_proof,
        admin::delete_auction,
        admin::list_payment_proofs,
        admin::get_payment_proof,
        admin::update_proof_status,
        admin::delete_payment_proof,
        admin::monthly_registrations,
        admin::monthly_revenue
    ),
    components(
        schemas(
            User,
            Auction,
            AuctionStatus,
            BidEntry,
            PaymentProof,
            ProofStatus,
            LoginRequest,
            LoginResponse,
            PlaceBidRequest,
            PlaceBidResponse,
            RepublishRequest,
            RepublishResponse,
            AuctionList,
            AuctionDetail,
            ProofList,
            Leaderboard,
            UpdateProofStatusRequest,
            UserReport,
            RevenueReport,
            params::Pagination,
            params::AuctionListQuery,
            params::ProofListQuery,
            Meta,
            ApiResponse<User>,
            ApiResponse<Auction>,
            ApiResponse<AuctionList>,
            ApiResponse<AuctionDetail>,
            ApiResponse<PlaceBidResponse>,
            ApiResponse<PaymentProof>,
            ApiResponse<ProofList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "Profile and leaderboard"),
        (name = "Auctions", description = "Auction lifecycle endpoints"),
        (name = "Bids", description = "Bid placement"),
        (name = "Commission", description = "Commission payment proofs"),
        (name = "Admin", description = "Super admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
