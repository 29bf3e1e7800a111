use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;

use crate::{
    entities::{external_provider, external_provider_id, movie},
    models::Movie,
};

pub async fn get_movie<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<movie::Model>, DbErr> {
    movie::Entity::find_by_id(id).one(db).await
}

/// Only used to reject a duplicate name before inserting.
pub async fn get_movie_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<movie::Model>, DbErr> {
    movie::Entity::find().filter(movie::Column::Name.eq(name)).one(db).await
}

/// SQLite binds OFFSET and LIMIT as signed 64-bit integers.
const MAX_SQL_INTEGER: u64 = i64::MAX as u64;

pub async fn list_movies<C: ConnectionTrait>(
    db: &C,
    skip: u64,
    limit: u64,
) -> Result<Vec<movie::Model>, DbErr> {
    movie::Entity::find()
        .order_by_asc(movie::Column::Id)
        .offset(skip.min(MAX_SQL_INTEGER))
        .limit(limit.min(MAX_SQL_INTEGER))
        .all(db)
        .await
}

/// Inserts a movie and returns it with its assigned id.
///
/// Name uniqueness is left to the unique index on `movie.name`; a duplicate
/// surfaces as a unique-constraint `DbErr`.
pub async fn create_movie<C: ConnectionTrait>(
    db: &C,
    name: &str,
    year: Option<i32>,
) -> Result<movie::Model, DbErr> {
    let model = movie::ActiveModel {
        name: Set(name.to_string()),
        year: Set(year),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    debug!(id = created.id, name = %created.name, "created movie");
    Ok(created)
}

/// Deletes a movie and returns the state it had right before deletion.
/// `None` when no such movie exists, including when a concurrent delete
/// removed it after the snapshot was read.
///
/// The movie's external ids go with it through the `ON DELETE CASCADE` foreign
/// key. Nothing is committed here; when `db` is a session the caller decides
/// when it commits.
pub async fn delete_movie<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Movie>, DbErr> {
    let Some(record) = get_movie(db, id).await? else {
        return Ok(None);
    };
    let snapshot = load_movie(db, record).await?;

    let deleted = movie::Entity::delete_by_id(id).exec(db).await?;
    if deleted.rows_affected == 0 {
        return Ok(None);
    }

    debug!(id, "deleted movie");
    Ok(Some(snapshot))
}

pub async fn load_movie<C: ConnectionTrait>(db: &C, record: movie::Model) -> Result<Movie, DbErr> {
    let mut movies = load_movies(db, vec![record]).await?;
    Ok(movies.remove(0))
}

/// Projects movie records into wire objects, fetching every provider link
/// in a single query. Output order follows `records`.
pub async fn load_movies<C: ConnectionTrait>(
    db: &C,
    records: Vec<movie::Model>,
) -> Result<Vec<Movie>, DbErr> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = records.iter().map(|m| m.id).collect();
    let rows = external_provider_id::Entity::find()
        .filter(external_provider_id::Column::MovieId.is_in(ids))
        .order_by_asc(external_provider_id::Column::ProviderId)
        .find_also_related(external_provider::Entity)
        .all(db)
        .await?;

    let mut links: HashMap<i32, Vec<_>> = HashMap::new();
    for (link, provider) in rows {
        let Some(provider) = provider else {
            continue;
        };
        links.entry(link.movie_id).or_default().push((link, provider));
    }

    Ok(records
        .into_iter()
        .map(|record| {
            let own = links.remove(&record.id).unwrap_or_default();
            Movie::from_record(record, own)
        })
        .collect())
}

/// Registers an external data provider. Providers have no HTTP surface and
/// are populated out-of-band.
pub async fn create_provider<C: ConnectionTrait>(
    db: &C,
    slug: &str,
    name: &str,
    url: &str,
) -> Result<external_provider::Model, DbErr> {
    let model = external_provider::ActiveModel {
        slug: Set(slug.to_string()),
        name: Set(name.to_string()),
        url: Set(url.to_string()),
        ..Default::default()
    };
    model.insert(db).await
}

/// Attaches a provider-specific id to a movie. A movie holds at most one id
/// per provider.
pub async fn link_external_id<C: ConnectionTrait>(
    db: &C,
    movie_id: i32,
    provider_id: i32,
    external_id: &str,
) -> Result<external_provider_id::Model, DbErr> {
    let model = external_provider_id::ActiveModel {
        movie_id: Set(movie_id),
        provider_id: Set(provider_id),
        external_id: Set(external_id.to_string()),
    };
    model.insert(db).await
}
