use mongodb::bson::Binary;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImageBlob {
    pub data: Binary,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImageDoc {
    pub id: i32,
    pub name: String,
    pub img: ImageBlob,
}
