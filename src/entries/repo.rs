use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// One weight measurement per user per calendar day. The day bucket is
/// enforced by a unique index on (user_id, entry_date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeightEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight_kg: f64,
    pub entry_date: Date,
    pub notes: Option<String>,
    pub goal_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const ENTRY_COLUMNS: &str =
    "id, user_id, weight_kg, entry_date, notes, goal_id, created_at, updated_at";

impl WeightEntry {
    /// Day-bucketed upsert: a second write on the same (user, day) replaces
    /// weight and notes in place. ON CONFLICT keeps this atomic under
    /// concurrent writes, so the unique index never surfaces as an error.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        entry_date: Date,
        weight_kg: f64,
        notes: Option<&str>,
        goal_id: Option<Uuid>,
    ) -> anyhow::Result<WeightEntry> {
        let row = sqlx::query_as::<_, WeightEntry>(&format!(
            "INSERT INTO weight_entries (user_id, entry_date, weight_kg, notes, goal_id) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, entry_date) DO UPDATE SET \
                 weight_kg = EXCLUDED.weight_kg, \
                 notes = EXCLUDED.notes, \
                 goal_id = EXCLUDED.goal_id, \
                 updated_at = now() \
             RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(user_id)
        .bind(entry_date)
        .bind(weight_kg)
        .bind(notes)
        .bind(goal_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<WeightEntry>> {
        let row = sqlx::query_as::<_, WeightEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM weight_entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        weight_kg: Option<f64>,
        notes: Option<&str>,
    ) -> anyhow::Result<WeightEntry> {
        let row = sqlx::query_as::<_, WeightEntry>(&format!(
            "UPDATE weight_entries SET \
                 weight_kg = COALESCE($2, weight_kg), \
                 notes = COALESCE($3, notes), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(id)
        .bind(weight_kg)
        .bind(notes)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM weight_entries WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Date-descending page of a user's history, optionally date-bounded.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        from: Option<Date>,
        to: Option<Date>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<WeightEntry>> {
        let rows = sqlx::query_as::<_, WeightEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM weight_entries \
             WHERE user_id = $1 \
               AND ($2::date IS NULL OR entry_date >= $2) \
               AND ($3::date IS NULL OR entry_date <= $3) \
             ORDER BY entry_date DESC \
             LIMIT $4 OFFSET $5"
        ))
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Entries belonging to a goal window, oldest first: stamped with the
    /// goal id, or dated on/after the goal's start for entries written
    /// before the goal existed on older clients.
    pub async fn list_for_goal(
        db: &PgPool,
        user_id: Uuid,
        goal_id: Uuid,
        goal_started: Date,
    ) -> anyhow::Result<Vec<WeightEntry>> {
        let rows = sqlx::query_as::<_, WeightEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM weight_entries \
             WHERE user_id = $1 AND (goal_id = $2 OR entry_date >= $3) \
             ORDER BY entry_date ASC"
        ))
        .bind(user_id)
        .bind(goal_id)
        .bind(goal_started)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Whole history, oldest first (analytics without an active goal).
    pub async fn list_all_asc(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<WeightEntry>> {
        let rows = sqlx::query_as::<_, WeightEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM weight_entries \
             WHERE user_id = $1 ORDER BY entry_date ASC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::{NewUser, User};
    use time::macros::date;

    // Needs a migrated database; skipped when TEST_DATABASE_URL is unset.
    #[tokio::test]
    async fn same_day_upsert_keeps_one_entry_with_latest_values() {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            return;
        };
        let db = PgPool::connect(&url).await.expect("connect");
        sqlx::migrate!("./migrations").run(&db).await.expect("migrate");

        let email = format!("upsert-{}@example.com", Uuid::new_v4().simple());
        let user = User::create(
            &db,
            NewUser {
                name: "Upsert",
                email: &email,
                mobile: None,
                country: None,
                password_hash: "x",
                gender: "female",
                age: 33,
                height_cm: 165.0,
                current_weight_kg: 81.0,
            },
        )
        .await
        .expect("create user");

        let day = date!(2026 - 02 - 01);
        let first = WeightEntry::upsert(&db, user.id, day, 81.0, Some("morning"), None)
            .await
            .expect("first write");
        let second = WeightEntry::upsert(&db, user.id, day, 80.2, Some("evening"), None)
            .await
            .expect("second write");

        // same day bucket: same row updated in place
        assert_eq!(second.id, first.id);
        assert_eq!(second.weight_kg, 80.2);

        let all = WeightEntry::list_all_asc(&db, user.id).await.expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].weight_kg, 80.2);
        assert_eq!(all[0].notes.as_deref(), Some("evening"));

        User::delete(&db, user.id).await.expect("cleanup");
    }
}
