// src/integrations/mod.rs
//
// External Integrations Module
//
// Collaborators that live outside the process. The core only sees traits.

pub mod mail;

pub use mail::{build_mailer, LogMailer, MailMessage, Mailer, SmtpMailer};
