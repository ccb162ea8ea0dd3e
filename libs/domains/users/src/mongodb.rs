//! MongoDB implementations of UserRepository and NoteRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc},
    options::{CountOptions, FindOneOptions, FindOptions},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserView};
use crate::repository::{NoteRepository, UserRepository};

/// Stored shape of a user. Ids are kept as hyphenated UUID strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    password: String,
    roles: Vec<String>,
    active: bool,
}

/// A user document read with the password projected out.
#[derive(Debug, Deserialize)]
struct UserViewDocument {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    roles: Vec<String>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

fn parse_id(raw: &str) -> UserResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| UserError::Database(format!("malformed user id '{raw}': {e}")))
}

fn id_filter(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

fn without_password() -> Document {
    doc! { "password": 0 }
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            password: user.password.clone(),
            roles: user.roles.clone(),
            active: user.active,
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = UserError;

    fn try_from(doc: UserDocument) -> UserResult<Self> {
        Ok(User {
            id: parse_id(&doc.id)?,
            username: doc.username,
            password: doc.password,
            roles: doc.roles,
            active: doc.active,
        })
    }
}

impl TryFrom<UserViewDocument> for UserView {
    type Error = UserError;

    fn try_from(doc: UserViewDocument) -> UserResult<Self> {
        Ok(UserView {
            id: parse_id(&doc.id)?,
            username: doc.username,
            roles: doc.roles,
            active: doc.active,
        })
    }
}

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Uses the `users` collection.
    ///
    /// ```ignore
    /// let client = database::mongodb::connect("mongodb://localhost:27017").await?;
    /// let repo = MongoUserRepository::new(client.database("users"));
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, "users")
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }

    fn views(&self) -> Collection<UserViewDocument> {
        self.collection.clone_with_type()
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn list_views(&self) -> UserResult<Vec<UserView>> {
        let options = FindOptions::builder().projection(without_password()).build();

        let docs: Vec<UserViewDocument> = self
            .views()
            .find(doc! {})
            .with_options(options)
            .await?
            .try_collect()
            .await?;

        docs.into_iter().map(UserView::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> UserResult<Option<UserView>> {
        let options = FindOneOptions::builder()
            .projection(without_password())
            .build();

        self.views()
            .find_one(doc! { "username": username })
            .with_options(options)
            .await?
            .map(UserView::try_from)
            .transpose()
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<Option<UserView>> {
        let document = UserDocument::from(&user);
        let result = self.collection.insert_one(&document).await?;

        if result.inserted_id != Bson::String(document.id) {
            tracing::warn!(inserted_id = %result.inserted_id, "Insert not acknowledged for user");
            return Ok(None);
        }

        tracing::info!("User created successfully");
        Ok(Some(user.view()))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn save(&self, user: User) -> UserResult<UserView> {
        let result = self
            .collection
            .replace_one(id_filter(user.id), UserDocument::from(&user))
            .await?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        tracing::info!("User updated successfully");
        Ok(user.view())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

/// Reads the `notes` collection; notes reference their owner in the `user` field.
pub struct MongoNoteRepository {
    collection: Collection<Document>,
}

impl MongoNoteRepository {
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, "notes")
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }
}

#[async_trait]
impl NoteRepository for MongoNoteRepository {
    #[instrument(skip(self))]
    async fn exists_for_user(&self, user_id: Uuid) -> UserResult<bool> {
        let options = CountOptions::builder().limit(1).build();
        let count = self
            .collection
            .count_documents(doc! { "user": user_id.to_string() })
            .with_options(options)
            .await?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip_keeps_string_id() {
        let user = User::new("dave".into(), "hash".into(), vec!["Employee".into()]);
        let document = UserDocument::from(&user);
        assert_eq!(document.id, user.id.to_string());

        let bson = mongodb::bson::to_document(&document).unwrap();
        assert_eq!(bson.get_str("_id").unwrap(), user.id.to_string());

        assert_eq!(User::try_from(document).unwrap(), user);
    }

    #[test]
    fn test_malformed_stored_id_is_database_error() {
        let document = UserViewDocument {
            id: "not-a-uuid".into(),
            username: "dave".into(),
            roles: vec![],
            active: true,
        };
        assert!(matches!(
            UserView::try_from(document),
            Err(UserError::Database(_))
        ));
    }
}
