use mongodb::bson::{doc, Document};
use mongodb::error::Result;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Client, Collection};

use crate::models::counter::Counter;
use crate::repository::DB_NAME;

pub struct CounterRepository {
    collection: Collection<Counter>,
}

fn increment_update() -> Document {
    doc! { "$inc": { "sequence_value": 1 } }
}

impl CounterRepository {
    pub fn new(client: &Client) -> Self {
        let db = client.database(DB_NAME);
        let collection = db.collection::<Counter>("counters");
        CounterRepository { collection }
    }

    /// Draws the next id for a sequence with a single atomic increment.
    /// Counters are seeded out of band; a missing document is `Ok(None)`
    /// and the caller reports it as a server error.
    pub async fn next_sequence(&self, sequence_name: &str) -> Result<Option<i32>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": sequence_name }, increment_update(), options)
            .await?;
        Ok(updated.map(|counter| counter.sequence_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_bumps_sequence_value_by_one() {
        let update = increment_update();
        let inc = update.get_document("$inc").unwrap();
        assert_eq!(inc.get_i32("sequence_value").unwrap(), 1);
        assert_eq!(update.len(), 1);
    }
}
