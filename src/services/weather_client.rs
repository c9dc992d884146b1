use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Cached readings older than this are refreshed from the provider.
pub const CACHE_TTL_MINUTES: i64 = 30;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather provider returned status {0}")]
    Status(u16),
}

#[derive(Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Deserialize)]
struct OwmCondition {
    main: String,
}

#[derive(Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmCondition>,
    name: String,
}

/// One current-weather observation, already formatted for storage.
#[derive(Debug, Clone)]
pub struct WeatherReading {
    pub temperature: String,
    pub condition: String,
    pub city: String,
}

pub struct WeatherClient {
    http: reqwest::Client,
    api_key: String,
}

impl WeatherClient {
    pub fn new(api_key: String) -> Self {
        WeatherClient {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherReading, WeatherError> {
        let url = format!(
            "https://api.openweathermap.org/data/2.5/weather?lat={}&lon={}&units=metric&appid={}",
            lat, lon, self.api_key
        );
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }
        let body: OwmResponse = response.json().await?;
        let condition = body
            .weather
            .first()
            .map(|c| c.main.clone())
            .unwrap_or_default();
        Ok(WeatherReading {
            temperature: format!("{:.1}°C", body.main.temp),
            condition,
            city: body.name,
        })
    }
}

/// Whether a cached reading is still fresh enough to serve.
pub fn is_fresh(last_updated: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - last_updated < Duration::minutes(CACHE_TTL_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_under_thirty_minutes_is_fresh() {
        let now = Utc::now();
        assert!(is_fresh(now - Duration::minutes(29), now));
    }

    #[test]
    fn reading_at_or_past_thirty_minutes_is_stale() {
        let now = Utc::now();
        assert!(!is_fresh(now - Duration::minutes(30), now));
        assert!(!is_fresh(now - Duration::hours(5), now));
    }

    #[test]
    fn provider_response_parses() {
        let json = r#"{
            "main": { "temp": 31.42 },
            "weather": [{ "main": "Clouds", "description": "scattered clouds" }],
            "name": "Kottayam"
        }"#;
        let parsed: OwmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.name, "Kottayam");
        assert_eq!(parsed.weather[0].main, "Clouds");
        assert_eq!(format!("{:.1}°C", parsed.main.temp), "31.4°C");
    }
}
