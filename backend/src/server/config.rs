//! Environment-driven server configuration.
//!
//! All settings are read through `mockable::Env` so parsing and validation
//! are testable without touching the process environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::Key;
use mockable::Env;
use tracing::warn;
use url::Url;
use zeroize::Zeroize;

use crate::domain::jobs::ApprovalPolicy;

const DATABASE_URL_ENV: &str = "DATABASE_URL";
const BIND_ADDR_ENV: &str = "BIND_ADDR";
const SESSION_KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const SESSION_COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SESSION_ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const MAIL_RELAY_URL_ENV: &str = "MAIL_RELAY_URL";
const MAIL_SENDER_ENV: &str = "MAIL_SENDER";
const APPROVAL_POLICY_ENV: &str = "APPROVAL_POLICY";

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAIL_SENDER: &str = "noreply@tradehall.example";

/// Errors raised while validating server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}': {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed and ephemeral keys are not
    /// allowed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parsed configuration for the HTTP server.
pub struct ServerConfig {
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub session_key: Key,
    pub cookie_secure: bool,
    pub mail_relay: Option<Url>,
    pub mail_sender: String,
    pub approval_policy: ApprovalPolicy,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("database_url", &self.database_url)
            .field("bind_addr", &self.bind_addr)
            .field("session_key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("mail_relay", &self.mail_relay)
            .field("mail_sender", &self.mail_sender)
            .field("approval_policy", &self.approval_policy)
            .finish()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, ConfigError> {
    let raw = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    raw.parse().map_err(|_| ConfigError::InvalidEnv {
        name: BIND_ADDR_ENV,
        value: raw,
        expected: "host:port socket address",
    })
}

fn cookie_secure_from_env<E: Env>(env: &E) -> Result<bool, ConfigError> {
    match env.string(SESSION_COOKIE_SECURE_ENV) {
        None => Ok(true),
        Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidEnv {
            name: SESSION_COOKIE_SECURE_ENV,
            value: raw,
            expected: "1|0|true|false|yes|no",
        }),
    }
}

fn session_key_from_env<E: Env>(env: &E) -> Result<Key, ConfigError> {
    let path = PathBuf::from(
        env.string(SESSION_KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) => {
            let allow_ephemeral = env
                .string(SESSION_ALLOW_EPHEMERAL_ENV)
                .as_deref()
                .and_then(parse_bool)
                .unwrap_or(false);
            if cfg!(debug_assertions) || allow_ephemeral {
                warn!(path = %path.display(), "using ephemeral session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(ConfigError::KeyRead { path, source })
            }
        }
    }
}

fn mail_relay_from_env<E: Env>(env: &E) -> Result<Option<Url>, ConfigError> {
    match env.string(MAIL_RELAY_URL_ENV) {
        None => Ok(None),
        Some(raw) => Url::parse(&raw).map(Some).map_err(|_| ConfigError::InvalidEnv {
            name: MAIL_RELAY_URL_ENV,
            value: raw,
            expected: "absolute URL",
        }),
    }
}

fn approval_policy_from_env<E: Env>(env: &E) -> Result<ApprovalPolicy, ConfigError> {
    match env.string(APPROVAL_POLICY_ENV).as_deref() {
        None | Some("implicit_approve") => Ok(ApprovalPolicy::ImplicitApprove),
        Some("require_review") => Ok(ApprovalPolicy::RequireReview),
        Some(raw) => Err(ConfigError::InvalidEnv {
            name: APPROVAL_POLICY_ENV,
            value: raw.to_owned(),
            expected: "implicit_approve|require_review",
        }),
    }
}

impl ServerConfig {
    /// Build the configuration from environment variables.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: env.string(DATABASE_URL_ENV),
            bind_addr: bind_addr_from_env(env)?,
            session_key: session_key_from_env(env)?,
            cookie_secure: cookie_secure_from_env(env)?,
            mail_relay: mail_relay_from_env(env)?,
            mail_sender: env
                .string(MAIL_SENDER_ENV)
                .unwrap_or_else(|| DEFAULT_MAIL_SENDER.to_owned()),
            approval_policy: approval_policy_from_env(env)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with(vars: Vec<(&'static str, String)>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
        });
        env
    }

    #[rstest]
    fn defaults_apply_when_env_is_empty() {
        let config = ServerConfig::from_env(&env_with(vec![(
            SESSION_ALLOW_EPHEMERAL_ENV,
            "1".to_owned(),
        )]))
        .expect("defaults are valid");
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.cookie_secure);
        assert!(config.mail_relay.is_none());
        assert_eq!(config.approval_policy, ApprovalPolicy::ImplicitApprove);
    }

    #[rstest]
    fn invalid_bind_addr_is_rejected() {
        let err = ServerConfig::from_env(&env_with(vec![
            (BIND_ADDR_ENV, "not-an-addr".to_owned()),
            (SESSION_ALLOW_EPHEMERAL_ENV, "1".to_owned()),
        ]))
        .expect_err("bad addr");
        assert!(err.to_string().contains("BIND_ADDR"));
    }

    #[rstest]
    fn approval_policy_parses_require_review() {
        let config = ServerConfig::from_env(&env_with(vec![
            (APPROVAL_POLICY_ENV, "require_review".to_owned()),
            (SESSION_ALLOW_EPHEMERAL_ENV, "1".to_owned()),
        ]))
        .expect("valid policy");
        assert_eq!(config.approval_policy, ApprovalPolicy::RequireReview);
    }

    #[rstest]
    fn unknown_approval_policy_is_rejected() {
        let err = ServerConfig::from_env(&env_with(vec![
            (APPROVAL_POLICY_ENV, "rubber_stamp".to_owned()),
            (SESSION_ALLOW_EPHEMERAL_ENV, "1".to_owned()),
        ]))
        .expect_err("bad policy");
        assert!(err.to_string().contains("APPROVAL_POLICY"));
    }

    #[rstest]
    fn invalid_mail_relay_url_is_rejected() {
        let err = ServerConfig::from_env(&env_with(vec![
            (MAIL_RELAY_URL_ENV, "not a url".to_owned()),
            (SESSION_ALLOW_EPHEMERAL_ENV, "1".to_owned()),
        ]))
        .expect_err("bad url");
        assert!(err.to_string().contains("MAIL_RELAY_URL"));
    }

    #[rstest]
    fn session_key_reads_from_file() {
        let key_path = std::env::temp_dir().join("tradehall_session_key_test");
        std::fs::write(&key_path, vec![b'k'; 64]).expect("write key file");
        let raw_path = key_path.to_str().expect("utf8 path").to_owned();

        let config = ServerConfig::from_env(&env_with(vec![(
            SESSION_KEY_FILE_ENV,
            raw_path,
        )]))
        .expect("key file is readable");
        assert!(config.cookie_secure);

        std::fs::remove_file(&key_path).expect("cleanup");
    }
}
