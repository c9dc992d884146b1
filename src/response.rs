use serde::{Deserialize, Serialize};

/// JSON envelope shared by every handler.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub message: String,
    pub result: Option<T>,
}
