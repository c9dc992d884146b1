use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::Result;
use mongodb::{Client, Collection};

use crate::models::place::Place;
use crate::repository::DB_NAME;

pub struct PlaceRepository {
    collection: Collection<Place>,
}

impl PlaceRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Place>("places");
        PlaceRepository { collection }
    }

    pub async fn insert(&self, place: &Place) -> Result<()> {
        self.collection.insert_one(place, None).await.map(|_| ())
    }

    pub async fn find_all(&self) -> Result<Vec<Place>> {
        let mut cursor = self.collection.find(None, None).await?;
        let mut places = Vec::new();
        while let Some(place) = cursor.try_next().await? {
            places.push(place);
        }
        Ok(places)
    }

    pub async fn find_by_name(&self, place_name: &str) -> Result<Option<Place>> {
        self.collection
            .find_one(doc! { "place_name": place_name }, None)
            .await
    }
}
