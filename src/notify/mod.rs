//! Outbound notification adapters: transactional email (SendMails.io) and
//! SMS verification (Twilio Verify). Callers that must not fail on delivery
//! problems go through [`send_mail_detached`].

pub mod email;
pub mod sms;

pub use email::{MailClient, SendMails};
pub use sms::{SmsClient, TwilioVerify};

use std::sync::Arc;
use tracing::error;

/// Fire-and-forget email: spawn the send and log the outcome. Used where a
/// delivery failure must not roll back the primary mutation.
pub fn send_mail_detached(mailer: Arc<dyn MailClient>, to: String, subject: String, html: String) {
    tokio::spawn(async move {
        if let Err(e) = mailer.send(&to, &subject, &html).await {
            error!(error = %e, %to, %subject, "email delivery failed");
        }
    });
}
