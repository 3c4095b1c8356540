use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auctions;
pub mod auth;
pub mod bids;
pub mod commission;
pub mod doc;
pub mod health;
pub mod multipart;
pub mod params;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/auctions", auctions::router())
        .nest("/bids", bids::router())
        .nest("/commission", commission::router())
        .nest("/admin", admin::router())
}
