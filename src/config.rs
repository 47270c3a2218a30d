//! Runtime configuration.
//!
//! Every setting is a CLI flag that falls back to an environment variable,
//! so a plain `visitlog` with the usual `PORT` / `SMTP_*` / `EMAIL_*`
//! variables behaves like a twelve-factor web app.

use crate::notify::{
    Addresses, MailTransport, Notifier, NotifyError, SmtpMailer, SmtpSettings,
};
use crate::store::file::DEFAULT_FILE_NAME;
use crate::store::{FileLogStore, LogStore};
use clap::{ArgAction, Args};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the visit log lives.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// CSV file holding the visit log
    #[arg(long, env = "DATA_FILE", default_value = DEFAULT_FILE_NAME)]
    pub data_file: PathBuf,
}

impl StoreArgs {
    pub fn store(&self) -> Arc<dyn LogStore> {
        Arc::new(FileLogStore::new(&self.data_file))
    }
}

/// SMTP relay and addressing for notifications.
#[derive(Debug, Clone, Default, Args)]
pub struct MailArgs {
    /// SMTP relay host (mail is disabled without it)
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// Use implicit TLS instead of STARTTLS
    #[arg(long, env = "SMTP_SECURE", action = ArgAction::Set, default_value_t = false)]
    pub smtp_secure: bool,

    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    #[arg(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub email_pass: Option<String>,

    /// Sender address (defaults to EMAIL_USER)
    #[arg(long, env = "EMAIL_FROM")]
    pub email_from: Option<String>,

    /// Who receives the notifications
    #[arg(long, env = "EMAIL_RECIPIENT")]
    pub email_recipient: Option<String>,
}

impl MailArgs {
    /// Sender and recipient, if both are known.
    pub fn addresses(&self) -> Option<Addresses> {
        let from = self
            .email_from
            .clone()
            .or_else(|| self.email_user.clone())?;
        let to = self.email_recipient.clone()?;
        Some(Addresses { from, to })
    }

    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        let host = self.smtp_host.clone()?;
        let credentials = match (&self.email_user, &self.email_pass) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };
        Some(SmtpSettings {
            host,
            port: self.smtp_port,
            secure: self.smtp_secure,
            credentials,
        })
    }

    /// True when host, sender and recipient are all set.
    pub fn is_enabled(&self) -> bool {
        self.smtp_settings().is_some() && self.addresses().is_some()
    }

    /// Build the notifier for `store`. Incomplete settings give a disabled
    /// notifier; malformed addresses are an error.
    pub fn notifier(&self, store: Arc<dyn LogStore>) -> Result<Notifier, NotifyError> {
        let (Some(settings), Some(addresses)) = (self.smtp_settings(), self.addresses()) else {
            tracing::warn!("SMTP_HOST, EMAIL_RECIPIENT or sender not set; notifications disabled");
            return Ok(Notifier::disabled(store));
        };

        for address in [&addresses.from, &addresses.to] {
            address
                .parse::<lettre::message::Mailbox>()
                .map_err(|e| NotifyError::Message(format!("{:?}: {}", address, e)))?;
        }

        let transport: Arc<dyn MailTransport> = Arc::new(SmtpMailer::new(&settings)?);
        Ok(Notifier::new(store, transport, addresses))
    }
}

/// Everything `visitlog serve` needs.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory of static files (an index.html here replaces the bundled page)
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub mail: MailArgs,
}

impl ServeArgs {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        use anyhow::Context;
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}
