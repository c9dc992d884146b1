use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::Result;
use mongodb::{Client, Collection};

use crate::models::market::{Buy, Sell};
use crate::repository::DB_NAME;

pub struct SellRepository {
    collection: Collection<Sell>,
}

impl SellRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Sell>("sells");
        SellRepository { collection }
    }

    pub async fn insert(&self, sell: &Sell) -> Result<()> {
        self.collection.insert_one(sell, None).await.map(|_| ())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Sell>> {
        self.collection.find_one(doc! { "id": id }, None).await
    }

    pub async fn find_by_seller(&self, sellername: &str, sold: Option<bool>) -> Result<Vec<Sell>> {
        let mut filter = doc! { "sellername": sellername };
        if let Some(sold) = sold {
            filter.insert("sold", sold);
        }
        let mut cursor = self.collection.find(filter, None).await?;
        let mut sells = Vec::new();
        while let Some(sell) = cursor.try_next().await? {
            sells.push(sell);
        }
        Ok(sells)
    }

    pub async fn find_unsold(&self) -> Result<Vec<Sell>> {
        let mut cursor = self.collection.find(doc! { "sold": false }, None).await?;
        let mut sells = Vec::new();
        while let Some(sell) = cursor.try_next().await? {
            sells.push(sell);
        }
        Ok(sells)
    }

    pub async fn find_unsold_by_sellers(&self, sellers: &[String]) -> Result<Vec<Sell>> {
        let filter = doc! { "sold": false, "sellername": { "$in": sellers } };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut sells = Vec::new();
        while let Some(sell) = cursor.try_next().await? {
            sells.push(sell);
        }
        Ok(sells)
    }

    pub async fn mark_sold(&self, id: i32) -> Result<u64> {
        let update = doc! { "$set": { "sold": true } };
        let result = self
            .collection
            .update_one(doc! { "id": id }, update, None)
            .await?;
        Ok(result.matched_count)
    }
}

pub struct BuyRepository {
    collection: Collection<Buy>,
}

impl BuyRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Buy>("buys");
        BuyRepository { collection }
    }

    pub async fn insert(&self, buy: &Buy) -> Result<()> {
        self.collection.insert_one(buy, None).await.map(|_| ())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Buy>> {
        self.collection.find_one(doc! { "id": id }, None).await
    }

    /// Duplicate guard: one notification per buyer/seller/listing triple.
    pub async fn find_duplicate(
        &self,
        buyername: &str,
        sellername: &str,
        sell_id: i32,
    ) -> Result<Option<Buy>> {
        let filter = doc! {
            "buyername": buyername,
            "sellername": sellername,
            "sell_id": sell_id,
        };
        self.collection.find_one(filter, None).await
    }

    /// Completed purchases of a buyer.
    pub async fn find_completed_by_buyer(&self, buyername: &str) -> Result<Vec<Buy>> {
        let filter = doc! { "buyername": buyername, "buy": true };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut buys = Vec::new();
        while let Some(buy) = cursor.try_next().await? {
            buys.push(buy);
        }
        Ok(buys)
    }

    /// Interest not yet confirmed by the seller.
    pub async fn find_pending_by_seller(&self, sellername: &str) -> Result<Vec<Buy>> {
        let filter = doc! { "sellername": sellername, "buy": false };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut buys = Vec::new();
        while let Some(buy) = cursor.try_next().await? {
            buys.push(buy);
        }
        Ok(buys)
    }

    pub async fn mark_bought(&self, id: i32) -> Result<u64> {
        let update = doc! { "$set": { "buy": true } };
        let result = self
            .collection
            .update_one(doc! { "id": id }, update, None)
            .await?;
        Ok(result.matched_count)
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<u64> {
        let result = self.collection.delete_one(doc! { "id": id }, None).await?;
        Ok(result.deleted_count)
    }
}
