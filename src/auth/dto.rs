use serde::{Deserialize, Serialize};

/// Request body for admin login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Whether the calling session may add and delete cards.
#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub is_admin: bool,
}
