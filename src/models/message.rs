use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Announcement {
    pub id: i32,
    /// Display name of the admin who posted it.
    pub admin: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Suggestion {
    pub id: i32,
    pub title: String,
    pub admin: Option<String>,
    pub content: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub response: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Query {
    pub id: i32,
    pub username: String,
    pub admin: Option<String>,
    /// Numeric category, e.g. 1 = complaint, 2 = request.
    #[serde(rename = "type")]
    pub query_type: i32,
    pub matter: String,
    pub time: DateTime<Utc>,
    pub admin_response: Option<String>,
}
