use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::Result;
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};

use crate::models::message::Suggestion;
use crate::repository::DB_NAME;

pub struct SuggestionRepository {
    collection: Collection<Suggestion>,
}

impl SuggestionRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Suggestion>("suggestions");
        SuggestionRepository { collection }
    }

    pub async fn insert(&self, suggestion: &Suggestion) -> Result<()> {
        self.collection
            .insert_one(suggestion, None)
            .await
            .map(|_| ())
    }

    /// Suggestions raised by any of the given usernames, newest first.
    pub async fn find_by_usernames(&self, usernames: &[String]) -> Result<Vec<Suggestion>> {
        let filter = doc! { "username": { "$in": usernames } };
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let mut cursor = self.collection.find(filter, options).await?;
        let mut suggestions = Vec::new();
        while let Some(suggestion) = cursor.try_next().await? {
            suggestions.push(suggestion);
        }
        Ok(suggestions)
    }

    pub async fn set_response(&self, id: i32, response: &str) -> Result<u64> {
        let update = doc! { "$set": { "response": response } };
        let result = self
            .collection
            .update_one(doc! { "id": id }, update, None)
            .await?;
        Ok(result.matched_count)
    }
}
