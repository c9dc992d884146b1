use chrono::{DateTime, Utc};
use mongodb::bson::doc;
use mongodb::error::Result;
use mongodb::{Client, Collection};

use crate::models::weather::Weather;
use crate::repository::DB_NAME;

pub struct WeatherRepository {
    collection: Collection<Weather>,
}

impl WeatherRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Weather>("weathers");
        WeatherRepository { collection }
    }

    pub async fn insert(&self, weather: &Weather) -> Result<()> {
        self.collection.insert_one(weather, None).await.map(|_| ())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Weather>> {
        self.collection
            .find_one(doc! { "username": username }, None)
            .await
    }

    pub async fn update_reading(
        &self,
        username: &str,
        temperature: &str,
        weather_condition: &str,
        city: &str,
        last_updated: DateTime<Utc>,
    ) -> Result<u64> {
        let update = doc! {
            "$set": {
                "temperature": temperature,
                "weatherCondition": weather_condition,
                "city": city,
                "lastUpdated": last_updated.to_rfc3339(),
            }
        };
        let result = self
            .collection
            .update_one(doc! { "username": username }, update, None)
            .await?;
        Ok(result.matched_count)
    }
}
