use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub api_token: String,
    pub base_url: String,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub verify_service_sid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub client_url: String,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub sms: SmsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let client_url =
            std::env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:3000".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "weightwise".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "weightwise-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
        };
        // Mail/SMS credentials may be absent in local setups; the adapters
        // log and skip delivery when they are empty.
        let mail = MailConfig {
            api_token: std::env::var("SENDMAILS_API_TOKEN").unwrap_or_default(),
            base_url: std::env::var("SENDMAILS_BASE_URL")
                .unwrap_or_else(|_| "https://api.sendmails.io/api".into()),
            from_email: std::env::var("SENDMAILS_FROM_EMAIL")
                .unwrap_or_else(|_| "no-reply@weightwise.app".into()),
            from_name: std::env::var("SENDMAILS_FROM_NAME")
                .unwrap_or_else(|_| "WeightWise".into()),
        };
        let sms = SmsConfig {
            account_sid: std::env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            auth_token: std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            verify_service_sid: std::env::var("TWILIO_VERIFY_SERVICE_SID").unwrap_or_default(),
        };
        Ok(Self {
            database_url,
            client_url,
            jwt,
            mail,
            sms,
        })
    }
}
