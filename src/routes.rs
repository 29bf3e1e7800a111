use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use sea_orm::DatabaseConnection;

use crate::{
    AppState, crud,
    db::Session,
    error::{AppError, AppResult},
    models::{Movie, Paging},
};

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(paging), _): WithRejection<Query<Paging>, AppError>,
) -> AppResult<Json<Vec<Movie>>> {
    let limit = state.config.page_limit(paging.limit);
    let session = Session::open(&state.db).await?;

    let records = crud::list_movies(&*session, paging.skip, limit).await?;
    let movies = crud::load_movies(&*session, records).await?;
    Ok(Json(movies))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(movie), _): WithRejection<Json<Movie>, AppError>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let movie = movie.validated()?;

    if crud::get_movie_by_name(&state.db, &movie.name).await?.is_some() {
        return Err(AppError::movie_name_taken());
    }

    let created = insert_movie(&state.db, &movie.name, movie.year).await?;

    tracing::info!(id = ?created.id, name = %created.name, "movie created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Writes a movie in its own session, with the INSERT as the first statement.
///
/// In WAL mode a transaction that has already read cannot start writing once
/// another writer has committed. Starting with the INSERT lets SQLite wait for
/// the lock and then see the committed row, so a racing duplicate is rejected
/// by the unique index.
async fn insert_movie(db: &DatabaseConnection, name: &str, year: Option<i32>) -> AppResult<Movie> {
    let session = Session::open(db).await?;

    let record = crud::create_movie(&*session, name, year).await.map_err(|err| {
        match AppError::from(err) {
            AppError::Conflict(_) => AppError::movie_name_taken(),
            other => other,
        }
    })?;
    let created = crud::load_movie(&*session, record).await?;
    session.commit().await?;

    Ok(created)
}

pub async fn read_movie(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(movie_id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<Movie>> {
    let session = Session::open(&state.db).await?;

    let record = crud::get_movie(&*session, movie_id).await?.ok_or_else(AppError::movie_not_found)?;
    Ok(Json(crud::load_movie(&*session, record).await?))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(movie_id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<Movie>> {
    // Runs on the pool: the cascading DELETE is one autocommit statement, so a
    // commit landing between the snapshot read and the delete cannot fail it.
    let snapshot =
        crud::delete_movie(&state.db, movie_id).await?.ok_or_else(AppError::movie_not_found)?;

    tracing::info!(id = movie_id, "movie deleted");
    Ok(Json(snapshot))
}
