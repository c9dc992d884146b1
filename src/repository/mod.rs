pub mod announcement_repository;
pub mod counter_repository;
pub mod crop_repository;
pub mod image_repository;
pub mod market_repository;
pub mod place_repository;
pub mod query_repository;
pub mod suggestion_repository;
pub mod user_repository;
pub mod weather_repository;

/// All collections live in the one application database.
pub const DB_NAME: &str = "village_app";
