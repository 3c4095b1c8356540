pub mod admin;
pub mod auctions;
pub mod auth;
pub mod bids;
pub mod commission;
