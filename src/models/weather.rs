use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached weather reading, one document per username, refreshed when older
/// than 30 minutes.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Weather {
    pub id: i32,
    pub username: String,
    /// Display string, e.g. "31.4°C".
    pub temperature: String,
    #[serde(rename = "weatherCondition")]
    pub weather_condition: String,
    pub city: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}
