use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::Result;
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};

use crate::models::message::Announcement;
use crate::repository::DB_NAME;

pub struct AnnouncementRepository {
    collection: Collection<Announcement>,
}

impl AnnouncementRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Announcement>("announcements");
        AnnouncementRepository { collection }
    }

    pub async fn insert(&self, announcement: &Announcement) -> Result<()> {
        self.collection
            .insert_one(announcement, None)
            .await
            .map(|_| ())
    }

    /// Announcements authored by any of the given admin names, newest first.
    pub async fn find_by_admins(&self, admin_names: &[String]) -> Result<Vec<Announcement>> {
        let filter = doc! { "admin": { "$in": admin_names } };
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let mut cursor = self.collection.find(filter, options).await?;
        let mut announcements = Vec::new();
        while let Some(announcement) = cursor.try_next().await? {
            announcements.push(announcement);
        }
        Ok(announcements)
    }

    pub async fn update_by_id(
        &self,
        id: i32,
        admin: &str,
        title: &str,
        content: &str,
    ) -> Result<u64> {
        let update = doc! { "$set": { "admin": admin, "title": title, "content": content } };
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
