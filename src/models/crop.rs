use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Crop {
    pub id: i32,
    pub crop_name: String,
    pub avg_price: f64,
}

/// Per-village price quote, joined to `Crop` by `crop_id` and to `Place`
/// by `place_id` through secondary queries.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Price {
    pub id: i32,
    pub place_id: i32,
    pub crop_id: i32,
    pub price: f64,
    pub month_year: String,
}

/// Row shape produced by the prices-with-crops aggregation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CropPriceInfo {
    pub id: i32,
    pub crop_name: String,
    pub price: f64,
    #[serde(default)]
    pub month_year: String,
    pub avg_price: f64,
}
