use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::SmsConfig;

/// Twilio Verify seam. The provider stores and checks the SMS code, so
/// unlike the email flow there is no local OTP record.
#[async_trait]
pub trait SmsClient: Send + Sync {
    async fn start_verification(&self, phone: &str) -> anyhow::Result<()>;
    async fn check_verification(&self, phone: &str, code: &str) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct TwilioVerify {
    client: reqwest::Client,
    config: SmsConfig,
}

impl TwilioVerify {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn service_url(&self, suffix: &str) -> String {
        format!(
            "https://verify.twilio.com/v2/Services/{}/{}",
            self.config.verify_service_sid, suffix
        )
    }
}

#[derive(Debug, Deserialize)]
struct VerificationCheckResponse {
    status: String,
}

#[async_trait]
impl SmsClient for TwilioVerify {
    async fn start_verification(&self, phone: &str) -> anyhow::Result<()> {
        if self.config.account_sid.is_empty() {
            warn!(%phone, "TWILIO_ACCOUNT_SID not set, skipping SMS verification");
            anyhow::bail!("sms verification not configured");
        }

        let res = self
            .client
            .post(self.service_url("Verifications"))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", phone), ("Channel", "sms")])
            .send()
            .await
            .context("twilio start verification")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("twilio responded {status}: {body}");
        }
        info!(%phone, "sms verification started");
        Ok(())
    }

    async fn check_verification(&self, phone: &str, code: &str) -> anyhow::Result<bool> {
        if self.config.account_sid.is_empty() {
            anyhow::bail!("sms verification not configured");
        }

        let res = self
            .client
            .post(self.service_url("VerificationCheck"))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", phone), ("Code", code)])
            .send()
            .await
            .context("twilio check verification")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("twilio responded {status}: {body}");
        }
        let check: VerificationCheckResponse =
            res.json().await.context("twilio check response body")?;
        Ok(check.status == "approved")
    }
}
