use actix_web::{web, HttpResponse};

use crate::{database::CampusStore, models::UserResponse, services::user_service, utils::AppError};

/// GET /faculty - Lista professores (papel "Faculty" sem diferenciar maiúsculas)
#[utoipa::path(
    get,
    path = "/faculty",
    tag = "Users",
    responses(
        (status = 200, description = "All faculty profiles", body = [UserResponse])
    )
)]
pub async fn list_faculty(store: web::Data<dyn CampusStore>) -> Result<HttpResponse, AppError> {
    log::info!("👩‍🏫 GET /faculty - fetching all faculty...");

    let faculty = user_service::list_faculty(store.get_ref()).await?;
    let response: Vec<UserResponse> = faculty.into_iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}
