use actix_web::{web, HttpResponse};

use crate::{
    database::CampusStore,
    models::{UpsertUserRequest, UserResponse},
    services::user_service,
    utils::AppError,
};

/// POST /users - Cria ou atualiza usuário pelo `uid`
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = UpsertUserRequest,
    responses(
        (status = 200, description = "Profile created or updated", body = UserResponse),
        (status = 400, description = "Missing uid or malformed body"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn upsert_user(
    store: web::Data<dyn CampusStore>,
    request: web::Json<UpsertUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 POST /users - body: {:?}", &*request);

    let user = user_service::sync_user(store.get_ref(), request.into_inner())
        .await
        .map_err(|e| {
            log::error!("❌ Error syncing user: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// GET /users/{uid} - Perfil do usuário
#[utoipa::path(
    get,
    path = "/users/{uid}",
    tag = "Users",
    params(("uid" = String, Path, description = "External user id")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    store: web::Data<dyn CampusStore>,
    uid: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = user_service::get_user(store.get_ref(), &uid).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
