use futures::stream::TryStreamExt;
use mongodb::bson::{doc, from_document, Bson};
use mongodb::error::Result;
use mongodb::{Client, Collection};

use crate::models::user::{AdminContact, PresidentRow, User};
use crate::repository::DB_NAME;

pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<User>("users");
        UserRepository { collection }
    }

    pub async fn insert(&self, user: &User) -> Result<()> {
        self.collection.insert_one(user, None).await.map(|_| ())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.collection
            .find_one(doc! { "username": username }, None)
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        self.collection.find_one(doc! { "id": id }, None).await
    }

    pub async fn find_by_ra_id(&self, ra_id: &str) -> Result<Option<User>> {
        self.collection.find_one(doc! { "raID": ra_id }, None).await
    }

    pub async fn find_by_id_and_type(&self, id: i32, user_type: &str) -> Result<Option<User>> {
        self.collection
            .find_one(doc! { "id": id, "user_type": user_type }, None)
            .await
    }

    pub async fn find_by_type(&self, user_type: &str) -> Result<Vec<User>> {
        let mut cursor = self
            .collection
            .find(doc! { "user_type": user_type }, None)
            .await?;
        let mut users = Vec::new();
        while let Some(user) = cursor.try_next().await? {
            users.push(user);
        }
        Ok(users)
    }

    pub async fn find_by_address(&self, address: &str) -> Result<Vec<User>> {
        let mut cursor = self
            .collection
            .find(doc! { "address": address }, None)
            .await?;
        let mut users = Vec::new();
        while let Some(user) = cursor.try_next().await? {
            users.push(user);
        }
        Ok(users)
    }

    /// Users of a village still waiting for activation.
    pub async fn find_pending_by_address(&self, address: &str) -> Result<Vec<User>> {
        let mut cursor = self
            .collection
            .find(doc! { "activation": 0, "address": address }, None)
            .await?;
        let mut users = Vec::new();
        while let Some(user) = cursor.try_next().await? {
            users.push(user);
        }
        Ok(users)
    }

    /// Activated plain users of a village.
    pub async fn find_activated_villagers(&self, address: &str) -> Result<Vec<User>> {
        let filter = doc! { "user_type": "user", "activation": 1, "address": address };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut users = Vec::new();
        while let Some(user) = cursor.try_next().await? {
            users.push(user);
        }
        Ok(users)
    }

    pub async fn find_villagers_by_address(&self, address: &str) -> Result<Vec<User>> {
        let filter = doc! { "address": address, "user_type": "user" };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut users = Vec::new();
        while let Some(user) = cursor.try_next().await? {
            users.push(user);
        }
        Ok(users)
    }

    /// Fellow admins of a village, the requester excluded.
    pub async fn find_admins_excluding(&self, address: &str, username: &str) -> Result<Vec<User>> {
        let filter = doc! {
            "user_type": "admin",
            "address": address,
            "username": { "$ne": username },
        };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut users = Vec::new();
        while let Some(user) = cursor.try_next().await? {
            users.push(user);
        }
        Ok(users)
    }

    pub async fn find_by_usernames(&self, usernames: &[String]) -> Result<Vec<User>> {
        let filter = doc! { "username": { "$in": usernames } };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut users = Vec::new();
        while let Some(user) = cursor.try_next().await? {
            users.push(user);
        }
        Ok(users)
    }

    pub async fn set_activation(&self, id: i32, activation: i32) -> Result<u64> {
        let update = doc! { "$set": { "activation": activation } };
        let result = self
            .collection
            .update_one(doc! { "id": id }, update, None)
            .await?;
        Ok(result.matched_count)
    }

    pub async fn update_profile(
        &self,
        username: &str,
        name: &str,
        phone: &str,
        address: &str,
        job_title: &str,
        email: &str,
    ) -> Result<u64> {
        let update = doc! {
            "$set": {
                "name": name,
                "phone": phone,
                "address": address,
                "job_title": job_title,
                "email": email,
            }
        };
        let result = self
            .collection
            .update_one(doc! { "username": username }, update, None)
            .await?;
        Ok(result.matched_count)
    }

    pub async fn update_details(
        &self,
        id: i32,
        name: &str,
        phone: &str,
        email: &str,
        ra_id: &str,
        job_title: &str,
    ) -> Result<u64> {
        let update = doc! {
            "$set": {
                "name": name,
                "phone": phone,
                "email": email,
                "raID": ra_id,
                "job_title": job_title,
            }
        };
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

    pub async fn delete_by_id_and_type(&self, id: i32, user_type: &str) -> Result<u64> {
        let result = self
            .collection
            .delete_one(doc! { "id": id, "user_type": user_type }, None)
            .await?;
        Ok(result.deleted_count)
    }

    /// Presidents of every registered village, joined against `places` on
    /// the user's address.
    pub async fn presidents_with_places(&self) -> Result<Vec<PresidentRow>> {
        let pipeline = vec![
            doc! { "$match": { "user_type": "admin", "job_title": "President" } },
            doc! { "$lookup": {
                "from": "places",
                "localField": "address",
                "foreignField": "place_name",
                "as": "matchedPlace",
            }},
            doc! { "$unwind": "$matchedPlace" },
            doc! { "$project": {
                "name": 1,
                "photoID": 1,
                "place_name": "$matchedPlace.place_name",
            }},
        ];
        let mut cursor = self.collection.aggregate(pipeline, None).await?;
        let mut rows = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            rows.push(from_document(document)?);
        }
        Ok(rows)
    }

    pub async fn count_villagers_in_place(&self, place_name: &str) -> Result<i64> {
        let pipeline = vec![
            doc! { "$match": { "user_type": "user" } },
            doc! { "$lookup": {
                "from": "places",
                "localField": "address",
                "foreignField": "place_name",
                "as": "matchedPlace",
            }},
            doc! { "$unwind": "$matchedPlace" },
            doc! { "$match": { "matchedPlace.place_name": place_name } },
            doc! { "$count": "userCount" },
        ];
        let mut cursor = self.collection.aggregate(pipeline, None).await?;
        if let Some(document) = cursor.try_next().await? {
            let count = match document.get("userCount") {
                Some(Bson::Int32(n)) => i64::from(*n),
                Some(Bson::Int64(n)) => *n,
                _ => 0,
            };
            return Ok(count);
        }
        Ok(0)
    }

    pub async fn admins_in_place(&self, place_name: &str) -> Result<Vec<AdminContact>> {
        let pipeline = vec![
            doc! { "$match": { "user_type": "admin" } },
            doc! { "$lookup": {
                "from": "places",
                "localField": "address",
                "foreignField": "place_name",
                "as": "matchedPlace",
            }},
            doc! { "$unwind": "$matchedPlace" },
            doc! { "$match": { "matchedPlace.place_name": place_name } },
            doc! { "$project": {
                "name": 1,
                "phone": 1,
                "email": 1,
                "job_title": 1,
                "photoID": 1,
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
