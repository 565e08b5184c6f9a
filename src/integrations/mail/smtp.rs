// src/integrations/mail/smtp.rs
//
// SMTP backend
//
// `send` only builds the message and queues it. A dedicated thread owns the
// transport and delivers queued messages one by one; failures are logged.

use std::sync::mpsc::{self, Sender};
use std::thread;

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::{MailMessage, Mailer};
use crate::config::MailSettings;
use crate::error::{AppError, AppResult};

pub struct SmtpMailer {
    from: Mailbox,
    queue: Sender<Message>,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> AppResult<Self> {
        let host = settings
            .smtp_host
            .as_deref()
            .ok_or_else(|| AppError::Other("SMTP host is not configured".to_string()))?;

        let from: Mailbox = settings
            .from_address
            .parse()
            .map_err(|e| AppError::Other(format!("Invalid sender address: {}", e)))?;

        let transport = Self::build_transport(host, settings)?;
        let (queue, inbox) = mpsc::channel::<Message>();

        thread::Builder::new()
            .name("smtp-sender".to_string())
            .spawn(move || {
                for message in inbox {
                    if let Err(e) = transport.send(&message) {
                        log::warn!("SMTP delivery failed: {}", e);
                    }
                }
                log::debug!("SMTP sender stopped");
            })?;

        log::info!("SMTP mailer ready ({}:{})", host, settings.smtp_port);
        Ok(Self { from, queue })
    }

    fn build_transport(host: &str, settings: &MailSettings) -> AppResult<SmtpTransport> {
        let mut builder = if settings.smtp_tls {
            SmtpTransport::relay(host)
                .map_err(|e| AppError::Other(format!("SMTP relay setup failed: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(host)
        };

        builder = builder.port(settings.smtp_port);

        if let (Some(user), Some(password)) = (&settings.smtp_username, &settings.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(builder.build())
    }

    fn build_message(&self, message: &MailMessage) -> AppResult<Message> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::Other(format!("Invalid recipient address: {}", e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .body(message.body.clone())
            .map_err(|e| AppError::Other(format!("Could not build mail: {}", e)))
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &MailMessage) -> AppResult<()> {
        let email = self.build_message(message)?;
        self.queue
            .send(email)
            .map_err(|_| AppError::Other("SMTP sender is not running".to_string()))
    }
}
