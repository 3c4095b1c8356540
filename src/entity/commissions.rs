use sea_orm::entity::prelude::*;

// Immutable ledger entry, written once per settled auction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "commissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub auction_id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::auctions::Entity",
        from = "Column::AuctionId",
        to = "super::auctions::Column::Id"
    )]
    Auctions,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::auctions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Auctions.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
