pub mod admin;
pub mod administrator;
pub mod auth;
pub mod image;
pub mod market;
pub mod otp;
pub mod user;
