mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoDB;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::{
    models::{
        Appointment, AppointmentScope, CreateAppointmentRequest, UpdateAppointmentRequest,
        UserChanges, UserProfile,
    },
    utils::AppError,
};

pub const USERS_COLLECTION: &str = "users";
pub const APPOINTMENTS_COLLECTION: &str = "appointments";

/// Data-access object for users and appointments.
///
/// Every method is a single independent store call; nothing spans documents.
#[async_trait]
pub trait CampusStore: Send + Sync {
    /// Finds-or-creates the profile keyed by `uid`, defaults applied on insert.
    async fn upsert_user(&self, uid: &str, changes: UserChanges) -> Result<UserProfile, AppError>;

    async fn find_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError>;

    /// All users whose role is "Faculty" in any letter case.
    async fn list_faculty(&self) -> Result<Vec<UserProfile>, AppError>;

    async fn insert_appointment(&self, request: CreateAppointmentRequest) -> Result<Appointment, AppError>;

    /// Newest first.
    async fn list_appointments(&self, scope: &AppointmentScope) -> Result<Vec<Appointment>, AppError>;

    async fn find_appointment(&self, id: &ObjectId) -> Result<Option<Appointment>, AppError>;

    /// `Ok(None)` when no appointment has this id.
    async fn update_appointment(
        &self,
        id: &ObjectId,
        changes: UpdateAppointmentRequest,
    ) -> Result<Option<Appointment>, AppError>;

    /// Returns whether a document was removed.
    async fn delete_appointment(&self, id: &ObjectId) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    fn backend_name(&self) -> &'static str;
}
