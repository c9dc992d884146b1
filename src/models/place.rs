use serde::{Deserialize, Serialize};

/// A village registered in the application; `place_name` is the tenancy
/// boundary every other lookup keys on.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Place {
    pub id: i32,
    pub place_name: String,
}
