pub mod counter;
pub mod crop;
pub mod image;
pub mod market;
pub mod message;
pub mod place;
pub mod user;
pub mod weather;
