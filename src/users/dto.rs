use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::users::goal::{ActiveGoal, PastGoal};
use crate::users::repo::User;

/// Profile as returned to the client; password hash never leaves the repo
/// layer.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub country: Option<String>,
    pub gender: String,
    pub age: i32,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    pub bmi: Option<f64>,
    pub goal: Option<ActiveGoal>,
    pub created_at: OffsetDateTime,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        let goal = user.active_goal();
        let bmi = crate::calc::bmi::bmi(user.current_weight_kg, user.height_cm);
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile: user.mobile,
            country: user.country,
            gender: user.gender,
            age: user.age,
            height_cm: user.height_cm,
            current_weight_kg: user.current_weight_kg,
            bmi,
            goal,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub past_goals: Vec<PastGoal>,
}

/// PUT body: any profile field, plus the goal pair which opens a new goal
/// when both parts are present.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub target_date: Option<Date>,
}
