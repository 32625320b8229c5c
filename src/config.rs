use anyhow::Context;
use rand::RngCore;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub admin_password: String,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL is not set; point it at the card database, e.g. sqlite://noyaki.db?mode=rwc")?;
        let admin_password = std::env::var("ADMIN_PASSWORD")
            .context("ADMIN_PASSWORD is not set; the admin secret is required")?;
        if admin_password.is_empty() {
            anyhow::bail!("ADMIN_PASSWORD is empty; the admin secret must not be blank");
        }

        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET").unwrap_or_else(|_| {
                tracing::info!("SESSION_SECRET not set, generating a per-process secret");
                random_secret()
            }),
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "noyaki".into()),
            audience: std::env::var("SESSION_AUDIENCE").unwrap_or_else(|_| "noyaki-clients".into()),
            ttl_minutes: ttl_minutes(std::env::var("SESSION_TTL_MINUTES").ok())?,
        };

        Ok(Self {
            database_url,
            admin_password,
            session,
        })
    }
}

const DEFAULT_TTL_MINUTES: i64 = 60 * 12;
/// One year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

fn ttl_minutes(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    let minutes: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("SESSION_TTL_MINUTES is not a whole number: {raw:?}"))?;
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("SESSION_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}

fn random_secret() -> String {
    let mut buf = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    buf.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Process environment is shared between test threads.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<T>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(k, _)| (k.to_string(), std::env::var(k).ok()))
            .collect();
        for (k, v) in vars {
            match v {
                Some(v) => std::env::set_var(k, v),
                None => std::env::remove_var(k),
            }
        }
        let out = f();
        for (k, v) in saved {
            match v {
                Some(v) => std::env::set_var(&k, v),
                None => std::env::remove_var(&k),
            }
        }
        out
    }

    fn startup_error(vars: &[(&str, Option<&str>)]) -> String {
        let err = with_env(vars, AppConfig::from_env).unwrap_err();
        format!("{err:#}")
    }

    #[test]
    fn missing_database_url_is_named() {
        let msg = startup_error(&[
            ("DATABASE_URL", None),
            ("ADMIN_PASSWORD", Some("secret")),
        ]);
        assert!(msg.contains("DATABASE_URL"), "{msg}");
    }

    #[test]
    fn missing_admin_password_is_named() {
        let msg = startup_error(&[
            ("DATABASE_URL", Some("sqlite::memory:")),
            ("ADMIN_PASSWORD", None),
        ]);
        assert!(msg.contains("ADMIN_PASSWORD"), "{msg}");
    }

    #[test]
    fn empty_admin_password_is_named() {
        let msg = startup_error(&[
            ("DATABASE_URL", Some("sqlite::memory:")),
            ("ADMIN_PASSWORD", Some("")),
        ]);
        assert!(msg.contains("ADMIN_PASSWORD"), "{msg}");
    }

    #[test]
    fn defaults_fill_optional_session_settings() {
        let cfg = with_env(
            &[
                ("DATABASE_URL", Some("sqlite::memory:")),
                ("ADMIN_PASSWORD", Some("secret")),
                ("SESSION_SECRET", None),
                ("SESSION_ISSUER", None),
                ("SESSION_AUDIENCE", None),
                ("SESSION_TTL_MINUTES", None),
            ],
            AppConfig::from_env,
        )
        .unwrap();
        assert_eq!(cfg.admin_password, "secret");
        assert_eq!(cfg.session.issuer, "noyaki");
        assert_eq!(cfg.session.audience, "noyaki-clients");
        assert_eq!(cfg.session.ttl_minutes, 720);
        assert_eq!(cfg.session.secret.len(), 64);
    }

    #[test]
    fn oversized_ttl_is_refused_at_startup() {
        let huge = (i64::MAX / 2).to_string();
        let msg = startup_error(&[
            ("DATABASE_URL", Some("sqlite::memory:")),
            ("ADMIN_PASSWORD", Some("secret")),
            ("SESSION_TTL_MINUTES", Some(huge.as_str())),
        ]);
        assert!(msg.contains("SESSION_TTL_MINUTES"), "{msg}");
    }

    #[test]
    fn ttl_bounds() {
        assert_eq!(ttl_minutes(None).unwrap(), 720);
        assert_eq!(ttl_minutes(Some(" 30 ".into())).unwrap(), 30);
        assert_eq!(ttl_minutes(Some(MAX_TTL_MINUTES.to_string())).unwrap(), MAX_TTL_MINUTES);
        for bad in ["0", "-5", "soon", "525601"] {
            let err = ttl_minutes(Some(bad.into())).unwrap_err();
            assert!(err.to_string().contains("SESSION_TTL_MINUTES"), "{bad}: {err}");
        }
    }

    #[test]
    fn random_secret_is_hex_and_fresh() {
        let a = random_secret();
        let b = random_secret();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
