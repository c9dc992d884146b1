pub mod mailer;
pub mod otp_store;
pub mod sms_client;
pub mod weather_client;
