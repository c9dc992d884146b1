use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::Result;
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};

use crate::models::message::Query;
use crate::repository::DB_NAME;

pub struct QueryRepository {
    collection: Collection<Query>,
}

impl QueryRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Query>("queries");
        QueryRepository { collection }
    }

    pub async fn insert(&self, query: &Query) -> Result<()> {
        self.collection.insert_one(query, None).await.map(|_| ())
    }

    pub async fn find_by_username_and_type(
        &self,
        username: &str,
        query_type: i32,
    ) -> Result<Vec<Query>> {
        let filter = doc! { "username": username, "type": query_type };
        let options = FindOptions::builder().sort(doc! { "time": -1 }).build();
        let mut cursor = self.collection.find(filter, options).await?;
        let mut queries = Vec::new();
        while let Some(query) = cursor.try_next().await? {
            queries.push(query);
        }
        Ok(queries)
    }

    /// Queries of one type raised by any of the given usernames, newest first.
    pub async fn find_by_usernames_and_type(
        &self,
        usernames: &[String],
        query_type: i32,
    ) -> Result<Vec<Query>> {
        let filter = doc! { "username": { "$in": usernames }, "type": query_type };
        let options = FindOptions::builder().sort(doc! { "time": -1 }).build();
        let mut cursor = self.collection.find(filter, options).await?;
        let mut queries = Vec::new();
        while let Some(query) = cursor.try_next().await? {
            queries.push(query);
        }
        Ok(queries)
    }

    pub async fn set_response(&self, id: i32, response: &str) -> Result<u64> {
        let update = doc! { "$set": { "admin_response": response } };
        let result = self
            .collection
            .update_one(doc! { "id": id }, update, None)
            .await?;
        Ok(result.matched_count)
    }
}
