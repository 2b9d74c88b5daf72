use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::state::AppState;
use crate::users::dto::{UpdateUserRequest, UserDetails, UserProfile};
use crate::users::goal::{self, GoalError, GoalStatus, PastGoal};
use crate::users::repo::{ProfileUpdate, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/:id", get(get_user))
        .route("/users/:id", put(update_user))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/achieve-goal", post(achieve_goal))
        .route("/users/:id/discard-goal", post(discard_goal))
}

fn internal(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn goal_error(e: GoalError) -> (StatusCode, String) {
    match e {
        GoalError::NoActiveGoal | GoalError::TargetDateInPast => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        GoalError::Db(e) => internal(e),
    }
}

/// Token subject must match the path user; loads the row or 404s.
async fn load_owned(
    state: &AppState,
    caller: Uuid,
    id: Uuid,
) -> Result<User, (StatusCode, String)> {
    if caller != id {
        warn!(%caller, %id, "cross-user access rejected");
        return Err((StatusCode::FORBIDDEN, "Forbidden".into()));
    }
    User::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "User not found".into()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDetails>, (StatusCode, String)> {
    let user = load_owned(&state, caller, id).await?;
    // archive a stale goal before reporting state
    let user = goal::expire_if_due(&state.db, user).await.map_err(internal)?;
    let past_goals = PastGoal::list_by_user(&state.db, id)
        .await
        .map_err(internal)?;
    Ok(Json(UserDetails {
        profile: UserProfile::from(user),
        past_goals,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    let user = load_owned(&state, caller, id).await?;
    let user = goal::expire_if_due(&state.db, user).await.map_err(internal)?;

    let user = User::update_profile(
        &state.db,
        user.id,
        ProfileUpdate {
            name: payload.name.as_deref(),
            mobile: payload.mobile.as_deref(),
            country: payload.country.as_deref(),
            gender: payload.gender.as_deref(),
            age: payload.age,
            height_cm: payload.height_cm,
            current_weight_kg: payload.current_weight_kg,
        },
    )
    .await
    .map_err(internal)?;

    let user = match (payload.target_weight_kg, payload.target_date) {
        (Some(target_weight_kg), Some(target_date)) => {
            goal::open_goal(&state.db, &user, target_weight_kg, target_date)
                .await
                .map_err(goal_error)?
        }
        (None, None) => user,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "target_weight_kg and target_date must be set together".into(),
            ))
        }
    };

    info!(user_id = %user.id, "user updated");
    Ok(Json(UserProfile::from(user)))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    load_owned(&state, caller, id).await?;
    let deleted = User::delete(&state.db, id).await.map_err(|e| {
        error!(error = %e, user_id = %id, "delete user failed");
        internal(e)
    })?;
    if !deleted {
        return Err((StatusCode::NOT_FOUND, "User not found".into()));
    }
    info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn achieve_goal(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    close_with_status(state, caller, id, GoalStatus::Achieved).await
}

#[instrument(skip(state))]
pub async fn discard_goal(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    close_with_status(state, caller, id, GoalStatus::Discarded).await
}

async fn close_with_status(
    state: AppState,
    caller: Uuid,
    id: Uuid,
    status: GoalStatus,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    let user = load_owned(&state, caller, id).await?;
    let user = goal::expire_if_due(&state.db, user).await.map_err(internal)?;
    let user = goal::close_goal(&state.db, &user, status)
        .await
        .map_err(goal_error)?;
    Ok(Json(UserProfile::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;

    #[test]
    fn profile_serializes_goal_and_hides_hash() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: "Mia".into(),
            email: "mia@example.com".into(),
            mobile: None,
            country: Some("DE".into()),
            password_hash: "secret-hash".into(),
            gender: "female".into(),
            age: 28,
            height_cm: 170.0,
            current_weight_kg: 68.0,
            goal_id: Some(Uuid::new_v4()),
            goal_status: Some(GoalStatus::Active),
            target_weight_kg: Some(62.0),
            target_date: Some(date!(2027 - 06 - 01)),
            goal_created_at: Some(now),
            goal_initial_weight_kg: Some(70.0),
            created_at: now,
        };
        let details = UserDetails {
            profile: UserProfile::from(user),
            past_goals: vec![],
        };
        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("mia@example.com"));
        assert!(json.contains("target_weight_kg"));
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn profile_derives_bmi() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: "Tom".into(),
            email: "tom@example.com".into(),
            mobile: None,
            country: None,
            password_hash: "h".into(),
            gender: "male".into(),
            age: 25,
            height_cm: 175.0,
            current_weight_kg: 70.0,
            goal_id: None,
            goal_status: None,
            target_weight_kg: None,
            target_date: None,
            goal_created_at: None,
            goal_initial_weight_kg: None,
            created_at: now,
        };
        let profile = UserProfile::from(user);
        let bmi = profile.bmi.expect("valid body profile");
        assert!((bmi - 22.857).abs() < 0.01);
        assert!(profile.goal.is_none());
    }
}
