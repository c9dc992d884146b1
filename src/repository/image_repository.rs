use mongodb::bson::doc;
use mongodb::error::Result;
use mongodb::{Client, Collection};

use crate::models::image::ImageDoc;
use crate::repository::DB_NAME;

pub struct ImageRepository {
    collection: Collection<ImageDoc>,
}

impl ImageRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<ImageDoc>("images");
        ImageRepository { collection }
    }

    pub async fn insert(&self, image: &ImageDoc) -> Result<()> {
        self.collection.insert_one(image, None).await.map(|_| ())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<ImageDoc>> {
        self.collection.find_one(doc! { "id": id }, None).await
    }
}
