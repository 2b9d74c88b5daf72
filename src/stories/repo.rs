use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Curated testimonial; display-only, no lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SuccessStory {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub weight_lost_kg: f64,
    pub duration_weeks: i32,
    pub story: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StoryStats {
    pub total_stories: i64,
    pub total_weight_lost_kg: f64,
    pub average_weight_lost_kg: f64,
    pub average_duration_weeks: f64,
}

const STORY_COLUMNS: &str = "id, name, country, weight_lost_kg, duration_weeks, story, created_at";

impl SuccessStory {
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<SuccessStory>> {
        let rows = sqlx::query_as::<_, SuccessStory>(&format!(
            "SELECT {STORY_COLUMNS} FROM success_stories \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn random(db: &PgPool) -> anyhow::Result<Option<SuccessStory>> {
        let row = sqlx::query_as::<_, SuccessStory>(&format!(
            "SELECT {STORY_COLUMNS} FROM success_stories ORDER BY random() LIMIT 1"
        ))
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn by_country(db: &PgPool, country: &str) -> anyhow::Result<Vec<SuccessStory>> {
        let rows = sqlx::query_as::<_, SuccessStory>(&format!(
            "SELECT {STORY_COLUMNS} FROM success_stories \
             WHERE lower(country) = lower($1) ORDER BY created_at DESC"
        ))
        .bind(country)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn stats(db: &PgPool) -> anyhow::Result<StoryStats> {
        let stats = sqlx::query_as::<_, StoryStats>(
            r#"
            SELECT count(*) AS total_stories,
                   COALESCE(sum(weight_lost_kg), 0)::double precision AS total_weight_lost_kg,
                   COALESCE(avg(weight_lost_kg), 0)::double precision AS average_weight_lost_kg,
                   COALESCE(avg(duration_weeks), 0)::double precision AS average_duration_weeks
            FROM success_stories
            "#,
        )
        .fetch_one(db)
        .await?;
        Ok(stats)
    }
}
