use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::users::repo::User;

/// Goal lifecycle: `none → active → {achieved | discarded | expired}`.
/// `none` is the absence of the active-goal columns, not a stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "goal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Achieved,
    Discarded,
    Expired,
}

/// Typed view over a user's active-goal columns.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveGoal {
    pub id: Uuid,
    pub target_weight_kg: f64,
    pub target_date: Date,
    pub created_at: OffsetDateTime,
    pub initial_weight_kg: f64,
}

impl ActiveGoal {
    /// Build the goal that opening would record: fresh id, created now,
    /// initial weight frozen at the user's current weight.
    pub fn open(user: &User, target_weight_kg: f64, target_date: Date, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_weight_kg,
            target_date,
            created_at: now,
            initial_weight_kg: user.current_weight_kg,
        }
    }

    pub fn is_past_due(&self, today: Date) -> bool {
        self.target_date < today
    }
}

/// Archived goal in `past_goals`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PastGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_id: Uuid,
    pub target_weight_kg: f64,
    pub target_date: Date,
    pub initial_weight_kg: f64,
    pub final_weight_kg: f64,
    pub status: GoalStatus,
    pub started_at: OffsetDateTime,
    pub closed_at: OffsetDateTime,
}

impl PastGoal {
    /// Snapshot the user's active goal for archival. None when no goal is
    /// active. Pure: persistence happens in [`close_goal`].
    pub fn snapshot(user: &User, status: GoalStatus, now: OffsetDateTime) -> Option<PastGoal> {
        let goal = user.active_goal()?;
        Some(PastGoal {
            id: Uuid::new_v4(),
            user_id: user.id,
            goal_id: goal.id,
            target_weight_kg: goal.target_weight_kg,
            target_date: goal.target_date,
            initial_weight_kg: goal.initial_weight_kg,
            final_weight_kg: user.current_weight_kg,
            status,
            started_at: goal.created_at,
            closed_at: now,
        })
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<PastGoal>> {
        let rows = sqlx::query_as::<_, PastGoal>(
            r#"
            SELECT id, user_id, goal_id, target_weight_kg, target_date, initial_weight_kg,
                   final_weight_kg, status, started_at, closed_at
            FROM past_goals
            WHERE user_id = $1
            ORDER BY closed_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    #[error("no active goal")]
    NoActiveGoal,
    #[error("target date is in the past")]
    TargetDateInPast,
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

const CLEAR_GOAL_SQL: &str = "UPDATE users SET goal_id = NULL, goal_status = NULL, \
     target_weight_kg = NULL, target_date = NULL, goal_created_at = NULL, \
     goal_initial_weight_kg = NULL WHERE id = $1";

async fn archive_snapshot(conn: &mut PgConnection, snapshot: &PastGoal) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO past_goals
            (id, user_id, goal_id, target_weight_kg, target_date, initial_weight_kg,
             final_weight_kg, status, started_at, closed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(snapshot.id)
    .bind(snapshot.user_id)
    .bind(snapshot.goal_id)
    .bind(snapshot.target_weight_kg)
    .bind(snapshot.target_date)
    .bind(snapshot.initial_weight_kg)
    .bind(snapshot.final_weight_kg)
    .bind(snapshot.status)
    .bind(snapshot.started_at)
    .bind(snapshot.closed_at)
    .execute(&mut *conn)
    .await?;

    sqlx::query(CLEAR_GOAL_SQL)
        .bind(snapshot.user_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn write_active_goal(
    conn: &mut PgConnection,
    user_id: Uuid,
    goal: &ActiveGoal,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE users SET
            goal_id = $2, goal_status = 'active', target_weight_kg = $3,
            target_date = $4, goal_created_at = $5, goal_initial_weight_kg = $6
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(goal.id)
    .bind(goal.target_weight_kg)
    .bind(goal.target_date)
    .bind(goal.created_at)
    .bind(goal.initial_weight_kg)
    .execute(conn)
    .await?;
    Ok(())
}

/// Archive the active goal with a terminal status and clear the active
/// columns, atomically. Exactly one snapshot lands in `past_goals`.
pub async fn close_goal(db: &PgPool, user: &User, status: GoalStatus) -> Result<User, GoalError> {
    let now = OffsetDateTime::now_utc();
    let snapshot = PastGoal::snapshot(user, status, now).ok_or(GoalError::NoActiveGoal)?;

    let mut tx = db.begin().await.map_err(anyhow::Error::from)?;
    archive_snapshot(&mut tx, &snapshot).await?;
    tx.commit().await.map_err(anyhow::Error::from)?;

    info!(user_id = %user.id, goal_id = %snapshot.goal_id, status = ?status, "goal closed");

    let updated = User::find_by_id(db, user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user vanished during goal close"))?;
    Ok(updated)
}

/// Open a goal for the user. An existing active goal is archived as
/// discarded in the same transaction, keeping the single-active invariant.
pub async fn open_goal(
    db: &PgPool,
    user: &User,
    target_weight_kg: f64,
    target_date: Date,
) -> Result<User, GoalError> {
    let now = OffsetDateTime::now_utc();
    if target_date < now.date() {
        return Err(GoalError::TargetDateInPast);
    }

    let discarded = PastGoal::snapshot(user, GoalStatus::Discarded, now);
    let goal = ActiveGoal::open(user, target_weight_kg, target_date, now);

    let mut tx = db.begin().await.map_err(anyhow::Error::from)?;
    if let Some(snapshot) = &discarded {
        archive_snapshot(&mut tx, snapshot).await?;
    }
    write_active_goal(&mut tx, user.id, &goal).await?;
    tx.commit().await.map_err(anyhow::Error::from)?;

    info!(user_id = %user.id, goal_id = %goal.id, target_weight_kg, "goal opened");

    let updated = User::find_by_id(db, user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user vanished during goal open"))?;
    Ok(updated)
}

/// Open a goal inside a caller-held transaction for a user known to carry
/// no active goal (registration). Returns the user with the goal columns
/// filled in, avoiding a reload from the uncommitted transaction.
pub async fn open_goal_in_tx(
    conn: &mut PgConnection,
    user: &User,
    target_weight_kg: f64,
    target_date: Date,
) -> Result<User, GoalError> {
    let now = OffsetDateTime::now_utc();
    if target_date < now.date() {
        return Err(GoalError::TargetDateInPast);
    }

    let goal = ActiveGoal::open(user, target_weight_kg, target_date, now);
    write_active_goal(conn, user.id, &goal).await.map_err(GoalError::Db)?;

    info!(user_id = %user.id, goal_id = %goal.id, target_weight_kg, "goal opened");

    let mut user = user.clone();
    user.goal_id = Some(goal.id);
    user.goal_status = Some(GoalStatus::Active);
    user.target_weight_kg = Some(goal.target_weight_kg);
    user.target_date = Some(goal.target_date);
    user.goal_created_at = Some(goal.created_at);
    user.goal_initial_weight_kg = Some(goal.initial_weight_kg);
    Ok(user)
}

/// Lazy expiry: archive the goal as expired when its target date has
/// passed. Called on reads and updates of goal state.
pub async fn expire_if_due(db: &PgPool, user: User) -> anyhow::Result<User> {
    let today = OffsetDateTime::now_utc().date();
    match user.active_goal() {
        Some(goal) if goal.is_past_due(today) => {
            match close_goal(db, &user, GoalStatus::Expired).await {
                Ok(updated) => Ok(updated),
                Err(GoalError::Db(e)) => Err(e),
                Err(_) => Ok(user),
            }
        }
        _ => Ok(user),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::NewUser;
    use time::macros::date;

    fn user_with_goal(goal: Option<(f64, Date)>) -> User {
        let now = OffsetDateTime::now_utc();
        let mut user = User {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: "t@example.com".into(),
            mobile: None,
            country: None,
            password_hash: "x".into(),
            gender: "female".into(),
            age: 30,
            height_cm: 168.0,
            current_weight_kg: 72.0,
            goal_id: None,
            goal_status: None,
            target_weight_kg: None,
            target_date: None,
            goal_created_at: None,
            goal_initial_weight_kg: None,
            created_at: now,
        };
        if let Some((target, date)) = goal {
            user.goal_id = Some(Uuid::new_v4());
            user.goal_status = Some(GoalStatus::Active);
            user.target_weight_kg = Some(target);
            user.target_date = Some(date);
            user.goal_created_at = Some(now);
            user.goal_initial_weight_kg = Some(75.0);
        }
        user
    }

    #[test]
    fn open_freezes_initial_weight_at_current() {
        let user = user_with_goal(None);
        let now = OffsetDateTime::now_utc();
        let goal = ActiveGoal::open(&user, 65.0, date!(2027 - 01 - 01), now);
        assert_eq!(goal.initial_weight_kg, 72.0);
        assert_eq!(goal.target_weight_kg, 65.0);
        assert_eq!(goal.created_at, now);
    }

    #[test]
    fn snapshot_carries_status_and_weights() {
        let user = user_with_goal(Some((65.0, date!(2027 - 01 - 01))));
        let now = OffsetDateTime::now_utc();
        let snap = PastGoal::snapshot(&user, GoalStatus::Discarded, now).expect("active goal");
        assert_eq!(snap.status, GoalStatus::Discarded);
        assert_eq!(snap.goal_id, user.goal_id.unwrap());
        assert_eq!(snap.initial_weight_kg, 75.0);
        assert_eq!(snap.final_weight_kg, 72.0);
        assert_eq!(snap.closed_at, now);
    }

    #[test]
    fn snapshot_requires_an_active_goal() {
        let user = user_with_goal(None);
        assert!(PastGoal::snapshot(&user, GoalStatus::Achieved, OffsetDateTime::now_utc()).is_none());
    }

    #[test]
    fn active_goal_view_requires_all_columns() {
        let mut user = user_with_goal(Some((65.0, date!(2027 - 01 - 01))));
        assert!(user.active_goal().is_some());
        user.target_weight_kg = None;
        assert!(user.active_goal().is_none());
    }

    #[test]
    fn past_due_check() {
        let user = user_with_goal(Some((65.0, date!(2024 - 01 - 01))));
        let goal = user.active_goal().unwrap();
        assert!(goal.is_past_due(date!(2024 - 01 - 02)));
        assert!(!goal.is_past_due(date!(2024 - 01 - 01)));
    }

    // Needs a migrated database; skipped when TEST_DATABASE_URL is unset.
    #[tokio::test]
    async fn reopening_archives_the_old_goal_and_activates_the_new() {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            return;
        };
        let db = PgPool::connect(&url).await.expect("connect");
        sqlx::migrate!("./migrations").run(&db).await.expect("migrate");

        let email = format!("goal-{}@example.com", Uuid::new_v4().simple());
        let user = User::create(
            &db,
            NewUser {
                name: "Goals",
                email: &email,
                mobile: None,
                country: None,
                password_hash: "x",
                gender: "male",
                age: 45,
                height_cm: 182.0,
                current_weight_kg: 95.0,
            },
        )
        .await
        .expect("create user");

        let user = open_goal(&db, &user, 88.0, date!(2030 - 01 - 01))
            .await
            .expect("first goal");
        let first = user.active_goal().expect("first goal active");

        let user = open_goal(&db, &user, 85.0, date!(2030 - 06 - 01))
            .await
            .expect("second goal");
        let second = user.active_goal().expect("second goal active");
        assert_ne!(second.id, first.id);
        assert_eq!(second.target_weight_kg, 85.0);

        let past = PastGoal::list_by_user(&db, user.id).await.expect("past goals");
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].goal_id, first.id);
        assert_eq!(past[0].status, GoalStatus::Discarded);

        User::delete(&db, user.id).await.expect("cleanup");
    }
}
