use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Sell {
    pub id: i32,
    pub sellername: String,
    pub cropname: String,
    pub quantity: i32,
    pub price: f64,
    pub date_updated: DateTime<Utc>,
    #[serde(default)]
    pub sold: bool,
}

/// Buyer-interest notification against a listing. `buy` flips false -> true
/// exactly once; a record with `buy == true` can never be deleted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Buy {
    pub id: i32,
    pub buyername: String,
    pub sell_id: i32,
    pub sellername: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub buy: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SellerDetails {
    pub username: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Listing enriched with the seller's contact details for the buy screen.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SellListing {
    #[serde(flatten)]
    pub sell: Sell,
    #[serde(rename = "sellerDetails")]
    pub seller_details: Option<SellerDetails>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SaleInfo {
    pub cropname: String,
    pub price: f64,
    pub quantity: i32,
    pub address: Option<String>,
}

/// Completed purchase joined with its listing for the history screen.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Purchase {
    #[serde(flatten)]
    pub buy: Buy,
    pub sell_info: Option<SaleInfo>,
}

/// Pending interest shown to a seller, joined with the buyer's phone and
/// the listed crop.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SellerNotification {
    #[serde(flatten)]
    pub buy: Buy,
    pub buyerphone: Option<String>,
    pub cropname: Option<String>,
}
