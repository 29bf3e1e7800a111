use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string_len(Movie::Name, 128))
                    .col(integer_null(Movie::Year))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_name_unique")
                    .table(Movie::Table)
                    .col(Movie::Name)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExternalProvider::Table)
                    .if_not_exists()
                    .col(pk_auto(ExternalProvider::Id))
                    .col(string_len(ExternalProvider::Slug, 32))
                    .col(string_len(ExternalProvider::Name, 128))
                    .col(string(ExternalProvider::Url))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_external_provider_slug_unique")
                    .table(ExternalProvider::Table)
                    .col(ExternalProvider::Slug)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_external_provider_url_unique")
                    .table(ExternalProvider::Table)
                    .col(ExternalProvider::Url)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExternalProviderId::Table)
                    .if_not_exists()
                    .col(integer(ExternalProviderId::MovieId))
                    .col(integer(ExternalProviderId::ProviderId))
                    .col(string_len(ExternalProviderId::Id, 32))
                    .primary_key(
                        Index::create()
                            .col(ExternalProviderId::MovieId)
                            .col(ExternalProviderId::ProviderId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_external_provider_id_movie")
                            .from(ExternalProviderId::Table, ExternalProviderId::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_external_provider_id_provider")
                            .from(ExternalProviderId::Table, ExternalProviderId::ProviderId)
                            .to(ExternalProvider::Table, ExternalProvider::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_external_provider_id_provider")
                    .table(ExternalProviderId::Table)
                    .col(ExternalProviderId::ProviderId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ExternalProviderId::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ExternalProvider::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Name,
    Year,
}

#[derive(DeriveIden)]
enum ExternalProvider {
    Table,
    Id,
    Slug,
    Name,
    Url,
}

#[derive(DeriveIden)]
enum ExternalProviderId {
    Table,
    MovieId,
    ProviderId,
    Id,
}
