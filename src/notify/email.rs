use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::config::MailConfig;

/// Transactional mail seam; `AppState` carries it as `Arc<dyn MailClient>`
/// so tests can substitute a no-op.
#[async_trait]
pub trait MailClient: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()>;
}

/// SendMails.io REST adapter.
#[derive(Clone)]
pub struct SendMails {
    client: reqwest::Client,
    config: MailConfig,
}

impl SendMails {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl MailClient for SendMails {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        if self.config.api_token.is_empty() {
            warn!(%to, "SENDMAILS_API_TOKEN not set, skipping email");
            return Ok(());
        }

        let url = format!("{}/transaction/send", self.config.base_url);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&json!({
                "to": to,
                "from_email": self.config.from_email,
                "from_name": self.config.from_name,
                "subject": subject,
                "content": html,
            }))
            .send()
            .await
            .context("sendmails request")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("sendmails responded {status}: {body}");
        }
        info!(%to, %subject, "email sent");
        Ok(())
    }
}

// --- templates ---

pub fn welcome_email(name: &str, client_url: &str) -> (String, String) {
    let subject = "Welcome to WeightWise".to_string();
    let html = format!(
        "<h2>Welcome, {name}!</h2>\
         <p>Your account is ready. Log your weight daily and set a goal to \
         start tracking progress.</p>\
         <p><a href=\"{client_url}\">Open WeightWise</a></p>"
    );
    (subject, html)
}

pub fn password_reset_email(name: &str, otp: &str) -> (String, String) {
    let subject = "Your WeightWise password reset code".to_string();
    let html = format!(
        "<h2>Password reset</h2>\
         <p>Hi {name}, use this code to reset your password:</p>\
         <h1 style=\"letter-spacing:4px\">{otp}</h1>\
         <p>The code expires in 10 minutes. If you didn't request it, \
         ignore this email.</p>"
    );
    (subject, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_interpolate_fields() {
        let (subject, html) = password_reset_email("Ana", "123456");
        assert!(subject.contains("password reset"));
        assert!(html.contains("Ana"));
        assert!(html.contains("123456"));

        let (_, welcome) = welcome_email("Bo", "https://app.example");
        assert!(welcome.contains("https://app.example"));
    }
}
