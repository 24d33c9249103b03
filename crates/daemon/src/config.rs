//! Daemon configuration
//!
//! Built once at startup from the process environment (after an optional
//! `.env` file is loaded) and never mutated afterwards.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use timemachine_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use timemachine_api_rpc::{RpcServerConfig, MAX_BURST};
use timemachine_core::domain::{CronSchedule, DEFAULT_CRON_EXPRESSION, DEFAULT_TIMEZONE};
use timemachine_core::error::{AppError, Result};
use timemachine_infra_smtp::{SmtpConfig, TlsMode};

const DEFAULT_MESSAGES_FILE: &str = "messages.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Fully resolved daemon settings
#[derive(Debug)]
pub struct Config {
    pub smtp: SmtpConfig,
    pub messages_file: PathBuf,
    pub schedule: CronSchedule,
    pub rpc: RpcServerConfig,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                AppError::Config(format!("missing required environment variable {}", key))
            })
        };

        let mut smtp = SmtpConfig::new(
            require("SMTP_HOST")?,
            require("SMTP_USER")?,
            require("SMTP_PASS")?,
            require("TO_EMAIL")?,
        );
        smtp.sender = get("SMTP_FROM");
        if let Some(tls) = get("SMTP_TLS") {
            smtp.tls = TlsMode::from_str(&tls)?;
        }
        smtp.port = match get("SMTP_PORT") {
            Some(port) => parse_number("SMTP_PORT", &port)?,
            None => smtp.tls.default_port(),
        };
        if let Some(secs) = get("SMTP_TIMEOUT_SECS") {
            smtp.timeout = Duration::from_secs(parse_number("SMTP_TIMEOUT_SECS", &secs)?);
        }
        if let Some(subject) = get("EMAIL_SUBJECT") {
            smtp.subject = subject;
        }
        if let Some(thread_id) = get("EMAIL_THREAD_ID") {
            smtp.thread_id = thread_id;
        }

        let messages_file = get("MESSAGES_FILE").unwrap_or_else(|| DEFAULT_MESSAGES_FILE.to_string());
        let messages_file = PathBuf::from(shellexpand::tilde(&messages_file).into_owned());

        let expression = get("CRON_SCHEDULE").unwrap_or_else(|| DEFAULT_CRON_EXPRESSION.to_string());
        let timezone = get("SCHEDULE_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let schedule = CronSchedule::parse(&expression, &timezone)?;

        let mut rpc = RpcServerConfig {
            host: get("TIMEMACHINE_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            port: DEFAULT_RPC_PORT,
            ..RpcServerConfig::default()
        };
        if let Some(port) = get("TIMEMACHINE_RPC_PORT") {
            rpc.port = parse_number("TIMEMACHINE_RPC_PORT", &port)?;
        }
        if let Some(burst) = get("TIMEMACHINE_RATE_LIMIT_BURST") {
            rpc.rate_limit_burst = parse_number("TIMEMACHINE_RATE_LIMIT_BURST", &burst)?;
            if rpc.rate_limit_burst > MAX_BURST {
                return Err(AppError::Config(format!(
                    "TIMEMACHINE_RATE_LIMIT_BURST must be at most {}, got {}",
                    MAX_BURST, rpc.rate_limit_burst
                )));
            }
        }
        if let Some(rate) = get("TIMEMACHINE_RATE_LIMIT_RATE") {
            rpc.rate_limit_per_sec = parse_number("TIMEMACHINE_RATE_LIMIT_RATE", &rate)?;
        }

        let log_format = match get("TIMEMACHINE_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            smtp,
            messages_file,
            schedule,
            rpc,
            log_format,
        })
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", key, value)))
}
