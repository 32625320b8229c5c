use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{info, warn};

use crate::session::Session;

/// Holds the Argon2 hash of the configured admin password. The plain
/// secret is not kept past startup.
#[derive(Debug)]
pub struct AdminGate {
    hash: String,
}

impl AdminGate {
    pub fn from_secret(secret: &str) -> anyhow::Result<Self> {
        anyhow::ensure!(!secret.is_empty(), "admin secret must not be empty");
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("hash admin secret: {e}"))?
            .to_string();
        Ok(Self { hash })
    }

    /// True iff `submitted` is exactly the configured secret.
    pub fn authenticate(&self, submitted: &str) -> bool {
        if submitted.is_empty() {
            return false;
        }
        let parsed = match PasswordHash::new(&self.hash) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "stored admin hash is unreadable");
                return false;
            }
        };
        Argon2::default()
            .verify_password(submitted.as_bytes(), &parsed)
            .is_ok()
    }

    /// Authenticate and record the outcome in the session's admin flag. A
    /// failed attempt drops any admin rights the session held.
    pub fn login(&self, session: &mut Session, submitted: &str) -> bool {
        let ok = self.authenticate(submitted);
        session.is_admin = ok;
        if ok {
            info!(session_id = %session.id, "admin login");
        } else {
            warn!(session_id = %session.id, "admin login rejected");
        }
        ok
    }

    /// Drops admin rights along with any admin-only work in flight.
    pub fn logout(&self, session: &mut Session) {
        session.is_admin = false;
        session.confirm_delete_all = false;
        session.pending_import = None;
        info!(session_id = %session.id, "admin logout");
    }
}
