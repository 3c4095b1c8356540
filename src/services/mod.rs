pub mod admin_service;
pub mod auction_service;
pub mod auth_service;
pub mod bid_service;
pub mod commission_service;
pub mod user_service;
