//! Association between a movie and an external provider, carrying the
//! provider-specific identifier (e.g. an IMDb title id).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "external_provider_id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub provider_id: i32,
    #[sea_orm(column_name = "id")]
    pub external_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Movie,
    #[sea_orm(
        belongs_to = "super::external_provider::Entity",
        from = "Column::ProviderId",
        to = "super::external_provider::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ExternalProvider,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movie.def()
    }
}

impl Related<super::external_provider::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExternalProvider.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
