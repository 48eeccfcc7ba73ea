use mongodb::bson::oid::ObjectId;

use crate::{
    database::CampusStore,
    models::{Appointment, AppointmentListQuery, AppointmentScope, CreateAppointmentRequest, UpdateAppointmentRequest},
    utils::AppError,
};

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidRequest(format!("Invalid appointment ID: {}", id)))
}

pub async fn create_appointment(
    store: &dyn CampusStore,
    request: CreateAppointmentRequest,
) -> Result<Appointment, AppError> {
    let appointment = store.insert_appointment(request).await?;

    log::info!(
        "📅 Appointment created: {} | student: {} | faculty: {}",
        appointment.id.map(|id| id.to_hex()).unwrap_or_default(),
        appointment.student_id.as_deref().unwrap_or("-"),
        appointment.faculty_id.as_deref().unwrap_or("-")
    );

    Ok(appointment)
}

/// GET /appointments - "Faculty" lista por facultyId, qualquer outro papel por studentId
pub async fn list_appointments(
    store: &dyn CampusStore,
    query: AppointmentListQuery,
) -> Result<Vec<Appointment>, AppError> {
    let uid = query
        .uid
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("uid query parameter is required".to_string()))?;

    let scope = AppointmentScope::for_role(query.role.as_deref(), &uid);
    store.list_appointments(&scope).await
}

pub async fn get_appointment(store: &dyn CampusStore, id: &str) -> Result<Appointment, AppError> {
    let object_id = parse_id(id)?;

    store
        .find_appointment(&object_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))
}

pub async fn update_appointment(
    store: &dyn CampusStore,
    id: &str,
    changes: UpdateAppointmentRequest,
) -> Result<Appointment, AppError> {
    let object_id = parse_id(id)?;

    let updated = store
        .update_appointment(&object_id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    log::info!(
        "✅ Appointment updated. Status: {} | Reason: {}",
        updated.status,
        if updated.rejection_reason.is_empty() { "N/A" } else { updated.rejection_reason.as_str() }
    );

    Ok(updated)
}

/// Deleting an unknown id is not an error.
pub async fn delete_appointment(store: &dyn CampusStore, id: &str) -> Result<(), AppError> {
    let object_id = parse_id(id)?;

    if store.delete_appointment(&object_id).await? {
        log::info!("🗑️  Appointment deleted: {}", id);
    } else {
        log::debug!("Appointment {} was already absent", id);
    }

    Ok(())
}
