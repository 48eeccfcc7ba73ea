use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, DateTime, Document},
    options::{ClientOptions, IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};
use std::time::Duration;

use super::{CampusStore, APPOINTMENTS_COLLECTION, USERS_COLLECTION};
use crate::{
    models::{
        Appointment, AppointmentScope, CreateAppointmentRequest, UpdateAppointmentRequest,
        UserChanges, UserProfile,
    },
    utils::AppError,
};

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, database_name: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some("campus-scheduler".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(database_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Creates the indexes the queries below rely on.
    ///
    /// The unique index on `users.uid` makes concurrent first upserts of one uid
    /// collapse into a single document.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS_COLLECTION);
        let uid_index = IndexModel::builder()
            .keys(doc! { "uid": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(uid_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(uid) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create unique index users(uid): {}", e),
        }

        let appointments = self.collection::<Document>(APPOINTMENTS_COLLECTION);

        for field in ["facultyId", "studentId"] {
            let mut keys = Document::new();
            keys.insert(field, 1);
            keys.insert("createdAt", -1);

            match appointments.create_index(IndexModel::builder().keys(keys).build()).await {
                Ok(_) => log::info!("   ✅ Index created: appointments({}, createdAt)", field),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn users(&self) -> Collection<UserProfile> {
        self.collection(USERS_COLLECTION)
    }

    fn appointments(&self) -> Collection<Appointment> {
        self.collection(APPOINTMENTS_COLLECTION)
    }
}

/// `$setOnInsert` body for a user upsert: every default not already being `$set`.
fn insert_defaults(uid: &str, set: &Document) -> Result<Document, bson::ser::Error> {
    let mut defaults = bson::to_document(&UserProfile::new(uid, DateTime::now()))?;
    // the upsert copies uid from the filter
    defaults.remove("uid");
    for key in set.keys() {
        defaults.remove(key);
    }
    Ok(defaults)
}

#[async_trait]
impl CampusStore for MongoDB {
    async fn upsert_user(&self, uid: &str, changes: UserChanges) -> Result<UserProfile, AppError> {
        let set = changes.to_set_document()?;
        let on_insert = insert_defaults(uid, &set)?;

        let mut update = Document::new();
        if !set.is_empty() {
            update.insert("$set", set);
        }
        update.insert("$setOnInsert", on_insert);

        self.users()
            .find_one_and_update(doc! { "uid": uid }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::DatabaseError(format!("Upsert returned no document for uid {}", uid)))
    }

    async fn find_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.users().find_one(doc! { "uid": uid }).await?)
    }

    async fn list_faculty(&self) -> Result<Vec<UserProfile>, AppError> {
        let cursor = self
            .users()
            .find(doc! { "role": { "$regex": "^Faculty$", "$options": "i" } })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn insert_appointment(&self, request: CreateAppointmentRequest) -> Result<Appointment, AppError> {
        let mut appointment = Appointment::create(request, DateTime::now());

        let result = self.appointments().insert_one(&appointment).await?;
        appointment.id = result.inserted_id.as_object_id();

        Ok(appointment)
    }

    async fn list_appointments(&self, scope: &AppointmentScope) -> Result<Vec<Appointment>, AppError> {
        let cursor = self
            .appointments()
            .find(scope.filter_document())
            .sort(doc! { "createdAt": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_appointment(&self, id: &ObjectId) -> Result<Option<Appointment>, AppError> {
        Ok(self.appointments().find_one(doc! { "_id": *id }).await?)
    }

    async fn update_appointment(
        &self,
        id: &ObjectId,
        changes: UpdateAppointmentRequest,
    ) -> Result<Option<Appointment>, AppError> {
        let set = changes.to_set_document()?;

        // MongoDB rejects an empty $set
        if set.is_empty() {
            return self.find_appointment(id).await;
        }

        Ok(self
            .appointments()
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_appointment(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.appointments().delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}
