use futures::stream::TryStreamExt;
use mongodb::bson::{doc, from_document};
use mongodb::error::Result;
use mongodb::{Client, Collection};

use crate::models::crop::{Crop, CropPriceInfo, Price};
use crate::repository::DB_NAME;

pub struct CropRepository {
    collection: Collection<Crop>,
}

impl CropRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Crop>("crops");
        CropRepository { collection }
    }

    pub async fn insert(&self, crop: &Crop) -> Result<()> {
        self.collection.insert_one(crop, None).await.map(|_| ())
    }

    pub async fn find_all(&self) -> Result<Vec<Crop>> {
        let mut cursor = self.collection.find(None, None).await?;
        let mut crops = Vec::new();
        while let Some(crop) = cursor.try_next().await? {
            crops.push(crop);
        }
        Ok(crops)
    }

    pub async fn find_by_name(&self, crop_name: &str) -> Result<Option<Crop>> {
        self.collection
            .find_one(doc! { "crop_name": crop_name }, None)
            .await
    }

    pub async fn set_avg_price(&self, crop_id: i32, avg_price: f64) -> Result<u64> {
        let update = doc! { "$set": { "avg_price": avg_price } };
        let result = self
            .collection
            .update_one(doc! { "id": crop_id }, update, None)
            .await?;
        Ok(result.modified_count)
    }
}

pub struct PriceRepository {
    collection: Collection<Price>,
}

impl PriceRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Price>("prices");
        PriceRepository { collection }
    }

    pub async fn insert(&self, price: &Price) -> Result<()> {
        self.collection.insert_one(price, None).await.map(|_| ())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Price>> {
        self.collection.find_one(doc! { "id": id }, None).await
    }

    /// Uniqueness guard for one quote per crop per village.
    pub async fn find_by_place_and_crop(
        &self,
        place_id: i32,
        crop_id: i32,
    ) -> Result<Option<Price>> {
        self.collection
            .find_one(doc! { "place_id": place_id, "crop_id": crop_id }, None)
            .await
    }

    pub async fn update_price(&self, id: i32, price: f64, month_year: &str) -> Result<u64> {
        let update = doc! { "$set": { "price": price, "month_year": month_year } };
        let result = self
            .collection
            .update_one(doc! { "id": id }, update, None)
            .await?;
        Ok(result.modified_count)
    }

    /// Quotes of a village joined with their crop catalog entries. Quotes
    /// whose crop no longer exists surface as "Unknown" with avg_price 0.
    pub async fn crops_for_place(&self, place_id: i32) -> Result<Vec<CropPriceInfo>> {
        let pipeline = vec![
            doc! { "$match": { "place_id": place_id } },
            doc! { "$lookup": {
                "from": "crops",
                "localField": "crop_id",
                "foreignField": "id",
                "as": "cropDetails",
            }},
            doc! { "$unwind": {
                "path": "$cropDetails",
                "preserveNullAndEmptyArrays": true,
            }},
            doc! { "$project": {
                "_id": 0,
                "crop_name": { "$ifNull": ["$cropDetails.crop_name", "Unknown"] },
                "price": 1,
                "month_year": 1,
                "id": 1,
                "avg_price": { "$ifNull": ["$cropDetails.avg_price", 0.0] },
            }},
        ];
        let mut cursor = self.collection.aggregate(pipeline, None).await?;
        let mut rows = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            rows.push(from_document(document)?);
        }
        Ok(rows)
    }
}
