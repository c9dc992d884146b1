use serde::{Deserialize, Serialize};

/// One document per logical id space; `sequence_value` is the last id
/// handed out.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub sequence_value: i32,
}
