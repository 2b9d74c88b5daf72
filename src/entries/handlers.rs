use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::entries::analytics;
use crate::entries::dto::{AnalyticsResponse, CreateEntryRequest, ListQuery, UpdateEntryRequest};
use crate::entries::repo::WeightEntry;
use crate::state::AppState;
use crate::users::goal;
use crate::users::repo::User;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/weight-entries", post(create_entry))
        .route(
            "/weight-entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route("/weight-entries/user/:user_id", get(list_entries))
        .route("/weight-entries/user/:user_id/analytics", get(get_analytics))
}

fn internal(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<WeightEntry>), (StatusCode, String)> {
    if !payload.weight_kg.is_finite() || payload.weight_kg <= 0.0 {
        return Err((StatusCode::BAD_REQUEST, "Invalid weight".into()));
    }

    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "User not found".to_string()))?;
    let user = goal::expire_if_due(&state.db, user).await.map_err(internal)?;

    let today = OffsetDateTime::now_utc().date();
    let entry_date = payload.entry_date.unwrap_or(today);

    let active_goal = user.active_goal();
    if let Some(goal) = &active_goal {
        if entry_date < goal.created_at.date() {
            warn!(user_id = %user.id, %entry_date, "entry predates goal");
            return Err((StatusCode::BAD_REQUEST, "Entry predates the active goal".into()));
        }
    }

    let entry = WeightEntry::upsert(
        &state.db,
        user.id,
        entry_date,
        payload.weight_kg,
        payload.notes.as_deref(),
        active_goal.as_ref().map(|g| g.id),
    )
    .await
    .map_err(internal)?;

    // today's measurement is the new current weight
    if entry_date == today {
        User::set_current_weight(&state.db, user.id, payload.weight_kg)
            .await
            .map_err(internal)?;
    }

    info!(user_id = %user.id, %entry_date, weight_kg = payload.weight_kg, "weight logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Loads the entry and checks the caller owns it.
async fn load_owned_entry(
    state: &AppState,
    caller: Uuid,
    id: Uuid,
) -> Result<WeightEntry, (StatusCode, String)> {
    let entry = WeightEntry::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Entry not found".to_string()))?;
    if entry.user_id != caller {
        warn!(%caller, entry_id = %id, "cross-user entry access rejected");
        return Err((StatusCode::FORBIDDEN, "Forbidden".into()));
    }
    Ok(entry)
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<WeightEntry>, (StatusCode, String)> {
    let entry = load_owned_entry(&state, caller, id).await?;
    Ok(Json(entry))
}

#[instrument(skip(state, payload))]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Result<Json<WeightEntry>, (StatusCode, String)> {
    if let Some(w) = payload.weight_kg {
        if !w.is_finite() || w <= 0.0 {
            return Err((StatusCode::BAD_REQUEST, "Invalid weight".into()));
        }
    }
    let entry = load_owned_entry(&state, caller, id).await?;
    let updated = WeightEntry::update(&state.db, entry.id, payload.weight_kg, payload.notes.as_deref())
        .await
        .map_err(internal)?;

    let today = OffsetDateTime::now_utc().date();
    if updated.entry_date == today {
        User::set_current_weight(&state.db, caller, updated.weight_kg)
            .await
            .map_err(internal)?;
    }
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let entry = load_owned_entry(&state, caller, id).await?;
    WeightEntry::delete(&state.db, entry.id)
        .await
        .map_err(internal)?;
    info!(user_id = %caller, entry_id = %id, "weight entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<WeightEntry>>, (StatusCode, String)> {
    if caller != user_id {
        return Err((StatusCode::FORBIDDEN, "Forbidden".into()));
    }
    let rows = WeightEntry::list_by_user(&state.db, user_id, q.from, q.to, q.limit, q.offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn get_analytics(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AnalyticsResponse>, (StatusCode, String)> {
    if caller != user_id {
        return Err((StatusCode::FORBIDDEN, "Forbidden".into()));
    }
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "User not found".to_string()))?;
    let user = goal::expire_if_due(&state.db, user).await.map_err(internal)?;

    let active_goal = user.active_goal();
    let entries = match &active_goal {
        Some(goal) => {
            WeightEntry::list_for_goal(&state.db, user.id, goal.id, goal.created_at.date())
                .await
                .map_err(internal)?
        }
        None => WeightEntry::list_all_asc(&state.db, user.id)
            .await
            .map_err(internal)?,
    };

    let weights: Vec<f64> = entries.iter().map(|e| e.weight_kg).collect();
    let summary = analytics::summarize(&weights);

    let progress_percent = match (&active_goal, &summary) {
        (Some(goal), Some(s)) => Some(analytics::progress_percent(
            goal.initial_weight_kg,
            s.latest_weight_kg,
            goal.target_weight_kg,
        )),
        _ => None,
    };

    let bmi = summary
        .as_ref()
        .and_then(|s| crate::calc::bmi::bmi(s.latest_weight_kg, user.height_cm));

    Ok(Json(AnalyticsResponse {
        goal_id: active_goal.map(|g| g.id),
        summary,
        progress_percent,
        bmi,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn analytics_response_flattens_summary() {
        let summary = analytics::summarize(&[80.0, 78.0]);
        let res = AnalyticsResponse {
            goal_id: Some(Uuid::new_v4()),
            summary,
            progress_percent: Some(20.0),
            bmi: Some(24.1),
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["net_change_kg"], serde_json::json!(-2.0));
        assert_eq!(json["trend"], "decreasing");
        assert_eq!(json["progress_percent"], 20.0);
    }

    #[test]
    fn list_query_defaults() {
        let q: ListQuery = serde_json::from_str("{}").expect("deserializes");
        assert_eq!(q.limit, 30);
        assert_eq!(q.offset, 0);
        assert!(q.from.is_none());
    }

    #[test]
    fn create_request_parses_date() {
        let payload: CreateEntryRequest =
            serde_json::from_str(r#"{"entry_date":"2026-08-01","weight_kg":74.2}"#)
                .expect("deserializes");
        assert_eq!(payload.entry_date, Some(date!(2026 - 08 - 01)));
    }
}
