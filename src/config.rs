use std::env;

/// Runtime settings, read once at startup. Every value has either a local
/// default or is optional; outbound channels (mail, SMS) simply stay
/// disabled when their credentials are absent.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub weather_key: String,
    pub email_user: Option<String>,
    pub email_pass: Option<String>,
    pub smtp_relay: String,
    pub sms_gateway_url: Option<String>,
    pub sms_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            mongo_uri: env::var("MONGO_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            weather_key: env::var("WEATHER_KEY").unwrap_or_default(),
            email_user: env::var("EMAIL_USER").ok(),
            email_pass: env::var("EMAIL_PASS").ok(),
            smtp_relay: env::var("SMTP_RELAY").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            sms_gateway_url: env::var("SMS_GATEWAY_URL").ok(),
            sms_api_key: env::var("SMS_API_KEY").ok(),
        }
    }
}
