use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub role: String,
    pub profile_image_public_id: String,
    pub profile_image_url: String,
    pub bank_account_number: Option<String>,
    pub bank_account_name: Option<String>,
    pub bank_name: Option<String>,
    pub upi_id: Option<String>,
    pub paypal_email: Option<String>,
    pub unpaid_commission: i64,
    pub auctions_won: i32,
    pub money_spent: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::auctions::Entity")]
    Auctions,
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
    #[sea_orm(has_many = "super::payment_proofs::Entity")]
    PaymentProofs,
    #[sea_orm(has_many = "super::audit_logs::Entity")]
    AuditLogs,
}

impl Related<super::auctions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Auctions.def()
    }
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl Related<super::payment_proofs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentProofs.def()
    }
}

impl Related<super::audit_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
