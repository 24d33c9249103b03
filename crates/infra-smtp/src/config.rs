// SMTP relay settings

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use timemachine_core::error::AppError;

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SMTPS_PORT: u16 = 465;
pub const DEFAULT_SUBJECT: &str = "Daily Reminder";
/// Message-ID every reminder replies to, so mail clients group them
pub const DEFAULT_THREAD_ID: &str = "daily-reminder@timemachine";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the connection to the relay is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Plain connection upgraded with STARTTLS (port 587)
    #[default]
    StartTls,
    /// Implicit TLS from the first byte (port 465)
    Tls,
    /// No encryption; local test relays only
    None,
}

impl TlsMode {
    /// Conventional relay port for this mode
    pub fn default_port(self) -> u16 {
        match self {
            Self::Tls => DEFAULT_SMTPS_PORT,
            Self::StartTls | Self::None => DEFAULT_SMTP_PORT,
        }
    }
}

impl FromStr for TlsMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" => Ok(Self::Tls),
            "none" => Ok(Self::None),
            other => Err(AppError::Config(format!(
                "unknown SMTP TLS mode '{}' (expected starttls, tls or none)",
                other
            ))),
        }
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StartTls => "starttls",
            Self::Tls => "tls",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// Everything needed to reach the relay and address one reminder
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address; the username when unset
    pub sender: Option<String>,
    pub recipient: String,
    pub subject: String,
    /// Bare message id (no angle brackets)
    pub thread_id: String,
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl SmtpConfig {
    /// Config with defaults for everything but the required fields
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SMTP_PORT,
            username: username.into(),
            password: password.into(),
            sender: None,
            recipient: recipient.into(),
            subject: DEFAULT_SUBJECT.to_string(),
            thread_id: DEFAULT_THREAD_ID.to_string(),
            tls: TlsMode::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn sender(&self) -> &str {
        self.sender.as_deref().unwrap_or(&self.username)
    }
}

// Password stays out of logs
impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender())
            .field("recipient", &self.recipient)
            .field("subject", &self.subject)
            .field("thread_id", &self.thread_id)
            .field("tls", &self.tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}
