use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated principal as reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

/// Issued session. The access token is opaque to this crate; backends attach
/// it to outgoing requests however their wire format requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
    /// Token expiry as reported by the auth service, if it reports one.
    pub expires_at: Option<DateTime<Utc>>,
}
