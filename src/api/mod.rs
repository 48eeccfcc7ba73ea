pub mod appointments;
pub mod faculty;
pub mod health;
pub mod metrics;
pub mod swagger;
pub mod users;

use actix_web::{error, web, HttpResponse};

/// Malformed, mistyped or unknown body fields become `400 {"error": ...}`.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::warn!("⚠️  Rejected request body: {}", message);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}

/// Registers every route; the store is expected as `web::Data<dyn CampusStore>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Users: upsert by uid + profile lookup
        .service(
            web::scope("/users")
                .route("", web::post().to(users::upsert_user))
                .route("/{uid}", web::get().to(users::get_user)),
        )
        // Appointments CRUD
        .service(
            web::scope("/appointments")
                .route("", web::post().to(appointments::create_appointment))
                .route("", web::get().to(appointments::list_appointments))
                .route("/single/{id}", web::get().to(appointments::get_appointment))
                .route("/{id}", web::put().to(appointments::update_appointment))
                .route("/{id}", web::delete().to(appointments::delete_appointment)),
        )
        .route("/faculty", web::get().to(faculty::list_faculty));
}
