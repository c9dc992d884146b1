use serde_json::json;
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("sms request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sms gateway returned status {0}")]
    Status(u16),
}

/// Thin client for the SMS gateway. Delivery is best-effort; without
/// SMS_GATEWAY_URL the client logs the message and reports success so the
/// OTP flow keeps working in development.
pub struct SmsClient {
    http: reqwest::Client,
    gateway_url: Option<String>,
    api_key: Option<String>,
}

impl SmsClient {
    pub fn from_config(config: &AppConfig) -> Self {
        if config.sms_gateway_url.is_none() {
            log::warn!("SMS_GATEWAY_URL not set, outbound SMS disabled");
        }
        SmsClient {
            http: reqwest::Client::new(),
            gateway_url: config.sms_gateway_url.clone(),
            api_key: config.sms_api_key.clone(),
        }
    }

    pub async fn send(&self, phone: &str, message: &str) -> Result<(), SmsError> {
        let Some(url) = &self.gateway_url else {
            log::info!("sms disabled, skipping message to {}", phone);
            return Ok(());
        };
        let payload = json!({
            "to": phone,
            "message": message,
            "api_key": self.api_key,
        });
        let response = self.http.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(SmsError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}
