use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::state::AppState;
use crate::stories::repo::{StoryStats, SuccessStory};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user-success", get(list_stories))
        .route("/user-success/random", get(random_story))
        .route("/user-success/country/:country", get(stories_by_country))
        .route("/user-success/stats", get(story_stats))
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

fn internal(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[instrument(skip(state))]
pub async fn list_stories(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<SuccessStory>>, (StatusCode, String)> {
    let rows = SuccessStory::list(&state.db, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn random_story(
    State(state): State<AppState>,
) -> Result<Json<SuccessStory>, (StatusCode, String)> {
    let story = SuccessStory::random(&state.db)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "No stories yet".to_string()))?;
    Ok(Json(story))
}

#[instrument(skip(state))]
pub async fn stories_by_country(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<Vec<SuccessStory>>, (StatusCode, String)> {
    let rows = SuccessStory::by_country(&state.db, &country)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn story_stats(
    State(state): State<AppState>,
) -> Result<Json<StoryStats>, (StatusCode, String)> {
    let stats = SuccessStory::stats(&state.db).await.map_err(internal)?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
    }
}
