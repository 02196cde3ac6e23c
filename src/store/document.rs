//! User records in MongoDB, collection `users`.

use crate::config::{DocumentConfig, DEFAULT_DOCUMENT_DATABASE};
use crate::error::StoreError;
use crate::model::{User, UserInput};
use crate::store::UserStore;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

const USERS_COLLECTION: &str = "users";

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: doc.name,
            email: doc.email,
        }
    }
}

pub struct MongoUserStore {
    database: Database,
    users: Collection<UserDocument>,
}

impl MongoUserStore {
    /// Parse the URI and build the client. The driver connects in the background, so an
    /// unreachable server only shows up on the first operation (or [`Self::ping`]).
    pub async fn connect(config: &DocumentConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.uri).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DOCUMENT_DATABASE));
        Ok(Self::from_database(database))
    }

    pub fn from_database(database: Database) -> Self {
        let users = database.collection(USERS_COLLECTION);
        MongoUserStore { database, users }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_by_id(&self, oid: ObjectId) -> Result<Option<User>, StoreError> {
        let found = self.users.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(User::from))
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn probe(&self) -> Result<bool, StoreError> {
        let any = self
            .users
            .clone_with_type::<Document>()
            .find_one(doc! {})
            .await?;
        Ok(any.is_some())
    }

    async fn create(&self, input: UserInput) -> Result<User, StoreError> {
        let mut document = UserDocument {
            id: None,
            name: input.name,
            email: input.email,
        };
        let result = self.users.insert_one(&document).await?;
        document.id = result.inserted_id.as_object_id();
        Ok(document.into())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self.users.find(doc! {}).await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<User>, StoreError> {
        match parse_object_id(id) {
            Some(oid) => self.find_by_id(oid).await,
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, input: UserInput) -> Result<Option<User>, StoreError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        let set = set_document(input);
        if set.is_empty() {
            return self.find_by_id(oid).await;
        }
        let updated = self
            .users
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(User::from))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(false);
        };
        let result = self.users.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }
}

/// `None` for anything that is not a 24-char hex ObjectId; such ids can never match a record.
fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn set_document(input: UserInput) -> Document {
    let mut set = Document::new();
    if let Some(name) = input.name {
        set.insert("name", name);
    }
    if let Some(email) = input.email {
        set.insert("email", email);
    }
    set
}
