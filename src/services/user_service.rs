use crate::{
    database::CampusStore,
    models::{UpsertUserRequest, UserProfile},
    utils::AppError,
};

/// POST /users - Cria ou atualiza o perfil identificado por `uid`
pub async fn sync_user(store: &dyn CampusStore, request: UpsertUserRequest) -> Result<UserProfile, AppError> {
    let (uid, changes) = request.into_parts();

    // uid is the lookup key as sent; only a blank one is refused
    let uid = match uid {
        Some(uid) if !uid.trim().is_empty() => uid,
        _ => return Err(AppError::InvalidRequest("UID is required".to_string())),
    };

    let user = store.upsert_user(&uid, changes).await?;

    log::info!(
        "✅ User synced: {} | ID: {} | Role: {}",
        user.name.as_deref().unwrap_or("-"),
        user.id_number,
        user.role.as_deref().unwrap_or("-")
    );

    Ok(user)
}

pub async fn get_user(store: &dyn CampusStore, uid: &str) -> Result<UserProfile, AppError> {
    store
        .find_user(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn list_faculty(store: &dyn CampusStore) -> Result<Vec<UserProfile>, AppError> {
    let faculty = store.list_faculty().await?;
    log::info!("👩‍🏫 Found faculty count: {}", faculty.len());
    Ok(faculty)
}
