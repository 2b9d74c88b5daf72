use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::users::goal::{ActiveGoal, GoalStatus};

/// User record: identity, body profile and the active-goal column cluster.
/// The goal columns are all set or all NULL; [`User::active_goal`] is the
/// typed view over them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub country: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub gender: String,
    pub age: i32,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    pub goal_id: Option<Uuid>,
    pub goal_status: Option<GoalStatus>,
    pub target_weight_kg: Option<f64>,
    pub target_date: Option<Date>,
    pub goal_created_at: Option<OffsetDateTime>,
    pub goal_initial_weight_kg: Option<f64>,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, name, email, mobile, country, password_hash, gender, age, \
     height_cm, current_weight_kg, goal_id, goal_status, target_weight_kg, target_date, \
     goal_created_at, goal_initial_weight_kg, created_at";

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub mobile: Option<&'a str>,
    pub country: Option<&'a str>,
    pub password_hash: &'a str,
    pub gender: &'a str,
    pub age: i32,
    pub height_cm: f64,
    pub current_weight_kg: f64,
}

/// Optional profile updates applied with COALESCE; absent fields keep their
/// stored value.
#[derive(Debug, Default)]
pub struct ProfileUpdate<'a> {
    pub name: Option<&'a str>,
    pub mobile: Option<&'a str>,
    pub country: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub current_weight_kg: Option<f64>,
}

impl User {
    pub fn active_goal(&self) -> Option<ActiveGoal> {
        match (
            self.goal_id,
            self.goal_status,
            self.target_weight_kg,
            self.target_date,
            self.goal_created_at,
            self.goal_initial_weight_kg,
        ) {
            (
                Some(id),
                Some(GoalStatus::Active),
                Some(target_weight_kg),
                Some(target_date),
                Some(created_at),
                Some(initial_weight_kg),
            ) => Some(ActiveGoal {
                id,
                target_weight_kg,
                target_date,
                created_at,
                initial_weight_kg,
            }),
            _ => None,
        }
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_mobile(db: &PgPool, mobile: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE mobile = $1"
        ))
        .bind(mobile)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(db: impl sqlx::PgExecutor<'_>, new: NewUser<'_>) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users \
                 (name, email, mobile, country, password_hash, gender, age, height_cm, current_weight_kg) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new.name)
        .bind(new.email)
        .bind(new.mobile)
        .bind(new.country)
        .bind(new.password_hash)
        .bind(new.gender)
        .bind(new.age)
        .bind(new.height_cm)
        .bind(new.current_weight_kg)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        update: ProfileUpdate<'_>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 mobile = COALESCE($3, mobile), \
                 country = COALESCE($4, country), \
                 gender = COALESCE($5, gender), \
                 age = COALESCE($6, age), \
                 height_cm = COALESCE($7, height_cm), \
                 current_weight_kg = COALESCE($8, current_weight_kg) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.mobile)
        .bind(update.country)
        .bind(update.gender)
        .bind(update.age)
        .bind(update.height_cm)
        .bind(update.current_weight_kg)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn set_password(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query(r#"UPDATE users SET password_hash = $2 WHERE id = $1"#)
            .bind(id)
            .bind(password_hash)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn set_current_weight(db: &PgPool, id: Uuid, weight_kg: f64) -> anyhow::Result<()> {
        sqlx::query(r#"UPDATE users SET current_weight_kg = $2 WHERE id = $1"#)
            .bind(id)
            .bind(weight_kg)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Weight entries and past goals cascade via FK.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
