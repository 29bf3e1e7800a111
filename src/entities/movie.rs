use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub year: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::external_provider_id::Entity")]
    ExternalProviderId,
}

impl Related<super::external_provider_id::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExternalProviderId.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
