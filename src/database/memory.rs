use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};
use tokio::sync::RwLock;

use super::CampusStore;
use crate::{
    models::{
        Appointment, AppointmentScope, CreateAppointmentRequest, UpdateAppointmentRequest,
        UserChanges, UserProfile,
    },
    utils::AppError,
};

/// In-process store with the same semantics as [`super::MongoDB`].
///
/// Documents live in insertion order; upserts run under the write lock, so one uid
/// never yields two profiles.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserProfile>>,
    appointments: RwLock<Vec<Appointment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CampusStore for MemoryStore {
    async fn upsert_user(&self, uid: &str, changes: UserChanges) -> Result<UserProfile, AppError> {
        let mut users = self.users.write().await;

        if let Some(user) = users.iter_mut().find(|u| u.uid == uid) {
            changes.apply(user);
            return Ok(user.clone());
        }

        let mut user = UserProfile::new(uid, DateTime::now());
        user.id = Some(ObjectId::new());
        changes.apply(&mut user);
        users.push(user.clone());

        Ok(user)
    }

    async fn find_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.uid == uid).cloned())
    }

    async fn list_faculty(&self) -> Result<Vec<UserProfile>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| u.is_faculty()).cloned().collect())
    }

    async fn insert_appointment(&self, request: CreateAppointmentRequest) -> Result<Appointment, AppError> {
        let mut appointment = Appointment::create(request, DateTime::now());
        appointment.id = Some(ObjectId::new());

        self.appointments.write().await.push(appointment.clone());

        Ok(appointment)
    }

    async fn list_appointments(&self, scope: &AppointmentScope) -> Result<Vec<Appointment>, AppError> {
        let appointments = self.appointments.read().await;

        // Reverse first so that equal timestamps keep newest-inserted first
        let mut matching: Vec<Appointment> = appointments
            .iter()
            .rev()
            .filter(|a| scope.matches(a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching)
    }

    async fn find_appointment(&self, id: &ObjectId) -> Result<Option<Appointment>, AppError> {
        let appointments = self.appointments.read().await;
        Ok(appointments.iter().find(|a| a.id.as_ref() == Some(id)).cloned())
    }

    async fn update_appointment(
        &self,
        id: &ObjectId,
        changes: UpdateAppointmentRequest,
    ) -> Result<Option<Appointment>, AppError> {
        let mut appointments = self.appointments.write().await;

        Ok(appointments
            .iter_mut()
            .find(|a| a.id.as_ref() == Some(id))
            .map(|appointment| {
                changes.apply(appointment);
                appointment.clone()
            }))
    }

    async fn delete_appointment(&self, id: &ObjectId) -> Result<bool, AppError> {
        let mut appointments = self.appointments.write().await;
        let before = appointments.len();
        appointments.retain(|a| a.id.as_ref() != Some(id));
        Ok(appointments.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(student: &str, faculty: &str, subject: &str) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            student_id: Some(student.into()),
            student_name: Some(format!("Student {}", student)),
            faculty_id: Some(faculty.into()),
            faculty_name: Some(format!("Prof {}", faculty)),
            subject: Some(subject.into()),
            date: Some("2026-10-20".into()),
            time: Some("10:00".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_document() {
        let store = MemoryStore::new();

        let first = store
            .upsert_user("u1", UserChanges { name: Some("Alice".into()), ..Default::default() })
            .await
            .unwrap();
        let second = store
            .upsert_user("u1", UserChanges { name: Some("Alicia".into()), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(store.users.read().await.len(), 1);

        let stored = store.find_user("u1").await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("Alicia"));
    }

    #[tokio::test]
    async fn test_find_user_missing() {
        let store = MemoryStore::new();
        assert!(store.find_user("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_faculty_ignores_case() {
        let store = MemoryStore::new();
        for (uid, role) in [("f1", "faculty"), ("f2", "FACULTY"), ("f3", "Faculty"), ("s1", "Student")] {
            store
                .upsert_user(uid, UserChanges { role: Some(role.into()), ..Default::default() })
                .await
                .unwrap();
        }
        store.upsert_user("x1", UserChanges::default()).await.unwrap();

        let faculty: Vec<String> = store
            .list_faculty()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.uid)
            .collect();
        assert_eq!(faculty, vec!["f1", "f2", "f3"]);
    }

    #[tokio::test]
    async fn test_list_appointments_by_scope_newest_first() {
        let store = MemoryStore::new();
        store.insert_appointment(booking("s1", "f1", "first")).await.unwrap();
        store.insert_appointment(booking("s2", "f1", "second")).await.unwrap();
        store.insert_appointment(booking("s1", "f2", "third")).await.unwrap();

        let for_faculty = store
            .list_appointments(&AppointmentScope::Faculty("f1".into()))
            .await
            .unwrap();
        let subjects: Vec<_> = for_faculty.iter().filter_map(|a| a.subject.as_deref()).collect();
        assert_eq!(subjects, vec!["second", "first"]);

        let for_student = store
            .list_appointments(&AppointmentScope::Student("s1".into()))
            .await
            .unwrap();
        let subjects: Vec<_> = for_student.iter().filter_map(|a| a.subject.as_deref()).collect();
        assert_eq!(subjects, vec!["third", "first"]);
        assert!(for_student.iter().all(|a| a.student_id.as_deref() == Some("s1")));
    }

    #[tokio::test]
    async fn test_create_then_find_round_trip() {
        let store = MemoryStore::new();
        let created = store.insert_appointment(booking("s1", "f1", "Lab")).await.unwrap();
        let id = created.id.unwrap();

        let found = store.find_appointment(&id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.status, "Pending");
        assert_eq!(found.rejection_reason, "");
    }

    #[tokio::test]
    async fn test_update_missing_appointment_returns_none() {
        let store = MemoryStore::new();
        let result = store
            .update_appointment(
                &ObjectId::new(),
                UpdateAppointmentRequest { status: Some("Approved".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let created = store.insert_appointment(booking("s1", "f1", "Lab")).await.unwrap();
        let id = created.id.unwrap();

        assert!(store.delete_appointment(&id).await.unwrap());
        assert!(store.find_appointment(&id).await.unwrap().is_none());
        assert!(!store.delete_appointment(&id).await.unwrap());
    }
}
