use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Lifetime of a password-reset code.
pub const OTP_TTL_MINUTES: i64 = 10;

/// One password-reset code for an email account. A row is consumable only
/// while unused and unexpired.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PasswordReset {
    pub id: Uuid,
    pub email: String,
    pub otp: String,
    pub expires_at: OffsetDateTime,
    pub used: bool,
    pub created_at: OffsetDateTime,
}

impl PasswordReset {
    pub fn is_valid(&self, now: OffsetDateTime) -> bool {
        !self.used && self.expires_at > now
    }

    /// Issue a fresh code for this email. Prior unused codes are dropped so
    /// only the newest one verifies, and expired rows are garbage-collected
    /// while we are here (Postgres has no TTL index).
    pub async fn create(db: &PgPool, email: &str, otp: &str) -> anyhow::Result<PasswordReset> {
        sqlx::query(
            r#"
            DELETE FROM password_resets
            WHERE email = $1 OR expires_at < now()
            "#,
        )
        .bind(email)
        .execute(db)
        .await?;

        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(OTP_TTL_MINUTES);
        let row = sqlx::query_as::<_, PasswordReset>(
            r#"
            INSERT INTO password_resets (email, otp, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, email, otp, expires_at, used, created_at
            "#,
        )
        .bind(email)
        .bind(otp)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Find a consumable code for (email, otp): unused and unexpired.
    pub async fn find_valid(
        db: &PgPool,
        email: &str,
        otp: &str,
    ) -> anyhow::Result<Option<PasswordReset>> {
        let row = sqlx::query_as::<_, PasswordReset>(
            r#"
            SELECT id, email, otp, expires_at, used, created_at
            FROM password_resets
            WHERE email = $1 AND otp = $2 AND used = false AND expires_at > now()
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(otp)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn mark_used(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"UPDATE password_resets SET used = true WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

/// Six random decimal digits, zero-padded.
pub fn generate_otp() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(used: bool, expires_in_minutes: i64) -> PasswordReset {
        let now = OffsetDateTime::now_utc();
        PasswordReset {
            id: Uuid::new_v4(),
            email: "a@b.c".into(),
            otp: "123456".into(),
            expires_at: now + Duration::minutes(expires_in_minutes),
            used,
            created_at: now,
        }
    }

    #[test]
    fn fresh_code_is_valid() {
        let r = row(false, OTP_TTL_MINUTES);
        assert!(r.is_valid(OffsetDateTime::now_utc()));
    }

    #[test]
    fn expired_code_is_invalid() {
        let r = row(false, -1);
        assert!(!r.is_valid(OffsetDateTime::now_utc()));
    }

    #[test]
    fn used_code_is_invalid() {
        let r = row(true, OTP_TTL_MINUTES);
        assert!(!r.is_valid(OffsetDateTime::now_utc()));
    }

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..32 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
