pub mod audit_logs;
pub mod auctions;
pub mod bids;
pub mod commissions;
pub mod payment_proofs;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use auctions::Entity as Auctions;
pub use bids::Entity as Bids;
pub use commissions::Entity as Commissions;
pub use payment_proofs::Entity as PaymentProofs;
pub use users::Entity as Users;
