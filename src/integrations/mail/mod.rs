// src/integrations/mail/mod.rs
//
// Outbound mail
//
// RULES:
// - Delivery is best-effort; callers log failures and move on
// - No retries
// - Backends never touch domain state

pub mod smtp;

use std::sync::Arc;

use crate::config::MailSettings;
use crate::error::AppResult;

pub use smtp::SmtpMailer;

/// A plain-text message to a single recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait Mailer: Send + Sync {
    fn send(&self, message: &MailMessage) -> AppResult<()>;
}

/// Writes messages to the log instead of delivering them
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, message: &MailMessage) -> AppResult<()> {
        log::info!(
            "[mail] to={} subject={:?}\n{}",
            message.to,
            message.subject,
            message.body
        );
        Ok(())
    }
}

/// SMTP when a host is configured, the log otherwise
pub fn build_mailer(settings: &MailSettings) -> AppResult<Arc<dyn Mailer>> {
    match settings.smtp_host {
        Some(_) => Ok(Arc::new(SmtpMailer::new(settings)?)),
        None => {
            log::debug!("No SMTP host configured, mail goes to the log");
            Ok(Arc::new(LogMailer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_mailer_accepts_everything() {
        let message = MailMessage {
            to: "alice@example.com".into(),
            subject: "Confirmation code".into(),
            body: "Hello alice, your confirmation code: 0badc0de!".into(),
        };
        assert!(LogMailer.send(&message).is_ok());
    }

    #[test]
    fn test_build_mailer_without_host() {
        let mailer = build_mailer(&MailSettings::default()).unwrap();
        let message = MailMessage {
            to: "bob@example.com".into(),
            subject: "s".into(),
            body: "b".into(),
        };
        assert!(mailer.send(&message).is_ok());
    }

    #[test]
    fn test_build_mailer_rejects_bad_sender() {
        let settings = MailSettings {
            from_address: "not an address".into(),
            smtp_host: Some("localhost".into()),
            ..MailSettings::default()
        };
        assert!(build_mailer(&settings).is_err());
    }
}
