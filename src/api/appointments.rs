use actix_web::{web, HttpResponse};

use crate::{
    database::CampusStore,
    models::{AppointmentListQuery, AppointmentResponse, CreateAppointmentRequest, UpdateAppointmentRequest},
    services::appointment_service,
    utils::AppError,
};

/// POST /appointments - Cria agendamento
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "Appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentResponse),
        (status = 400, description = "Malformed body")
    )
)]
pub async fn create_appointment(
    store: web::Data<dyn CampusStore>,
    request: web::Json<CreateAppointmentRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /appointments - body: {:?}", &*request);

    let appointment = appointment_service::create_appointment(store.get_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Created().json(AppointmentResponse::from(appointment)))
}

/// GET /appointments?role=&uid= - Lista agendamentos do aluno ou professor (mais recentes primeiro)
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "Appointments",
    params(AppointmentListQuery),
    responses(
        (status = 200, description = "Appointments, newest first", body = [AppointmentResponse]),
        (status = 400, description = "Missing uid")
    )
)]
pub async fn list_appointments(
    store: web::Data<dyn CampusStore>,
    query: web::Query<AppointmentListQuery>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📋 GET /appointments - role: {:?} uid: {:?}",
        query.role.as_deref(),
        query.uid.as_deref()
    );

    let appointments = appointment_service::list_appointments(store.get_ref(), query.into_inner()).await?;
    let response: Vec<AppointmentResponse> = appointments.into_iter().map(AppointmentResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /appointments/single/{id}
#[utoipa::path(
    get,
    path = "/appointments/single/{id}",
    tag = "Appointments",
    params(("id" = String, Path, description = "Appointment ObjectId (hex)")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_appointment(
    store: web::Data<dyn CampusStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let appointment = appointment_service::get_appointment(store.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(AppointmentResponse::from(appointment)))
}

/// PUT /appointments/{id} - Atualiza status ou detalhes (merge campo a campo)
#[utoipa::path(
    put,
    path = "/appointments/{id}",
    tag = "Appointments",
    params(("id" = String, Path, description = "Appointment ObjectId (hex)")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Updated appointment", body = AppointmentResponse),
        (status = 400, description = "Malformed id or body"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_appointment(
    store: web::Data<dyn CampusStore>,
    id: web::Path<String>,
    request: web::Json<UpdateAppointmentRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📡 PUT /appointments/{} - data: {:?}", id, &*request);

    let appointment = appointment_service::update_appointment(store.get_ref(), &id, request.into_inner())
        .await
        .map_err(|e| {
            log::error!("❌ Update error: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(AppointmentResponse::from(appointment)))
}

/// DELETE /appointments/{id}
#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "Appointments",
    params(("id" = String, Path, description = "Appointment ObjectId (hex)")),
    responses(
        (status = 200, description = "Deleted (also when the id did not exist)"),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_appointment(
    store: web::Data<dyn CampusStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️  DELETE /appointments - id: {}", id);

    appointment_service::delete_appointment(store.get_ref(), &id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::{body::MessageBody, dev::ServiceResponse, http::StatusCode, test, App};
    use mongodb::bson::oid::ObjectId;
    use serde_json::{json, Value};

    use crate::api::{configure, test_support::memory_store};
    use crate::models::AppointmentResponse;

    fn booking(student: &str, faculty: &str, subject: &str) -> Value {
        json!({
            "studentId": student,
            "studentName": "Riya",
            "facultyId": faculty,
            "facultyName": "Dr. Mehta",
            "subject": subject,
            "date": "2026-10-20",
            "time": "10:30 AM"
        })
    }

    async fn error_message<B: MessageBody>(resp: ServiceResponse<B>) -> String {
        let body: Value = test::read_body_json(resp).await;
        body["error"].as_str().unwrap_or_default().to_string()
    }

    #[actix_web::test]
    async fn test_create_then_get_returns_defaults() {
        let app = test::init_service(App::new().app_data(memory_store()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/appointments")
            .set_json(booking("s1", "f1", "Project review"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: AppointmentResponse = test::read_body_json(resp).await;
        assert_eq!(created.status, "Pending");
        assert_eq!(created.rejection_reason, "");
        assert!(!created.created_at.is_empty());

        let req = test::TestRequest::get()
            .uri(&format!("/appointments/single/{}", created.id))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["_id"], created.id.as_str());
        assert_eq!(fetched["studentId"], "s1");
        assert_eq!(fetched["studentName"], "Riya");
        assert_eq!(fetched["facultyId"], "f1");
        assert_eq!(fetched["facultyName"], "Dr. Mehta");
        assert_eq!(fetched["subject"], "Project review");
        assert_eq!(fetched["date"], "2026-10-20");
        assert_eq!(fetched["time"], "10:30 AM");
        assert_eq!(fetched["status"], "Pending");
        assert_eq!(fetched["rejectionReason"], "");
        assert_eq!(fetched["createdAt"], created.created_at.as_str());
    }

    #[actix_web::test]
    async fn test_create_rejects_mistyped_fields() {
        let app = test::init_service(App::new().app_data(memory_store()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/appointments")
            .set_json(json!({ "studentId": 42 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!error_message(resp).await.is_empty());
    }

    #[actix_web::test]
    async fn test_list_filters_by_role() {
        let app = test::init_service(App::new().app_data(memory_store()).configure(configure)).await;

        for (student, faculty, subject) in [("s1", "f1", "a"), ("s2", "f1", "b"), ("s1", "f2", "c")] {
            let req = test::TestRequest::post()
                .uri("/appointments")
                .set_json(booking(student, faculty, subject))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/appointments?role=Faculty&uid=f1").to_request();
        let list: Vec<AppointmentResponse> = test::call_and_read_body_json(&app, req).await;
        let subjects: Vec<_> = list.iter().filter_map(|a| a.subject.as_deref()).collect();
        assert_eq!(subjects, vec!["b", "a"]);

        let req = test::TestRequest::get().uri("/appointments?role=Student&uid=s1").to_request();
        let list: Vec<AppointmentResponse> = test::call_and_read_body_json(&app, req).await;
        let subjects: Vec<_> = list.iter().filter_map(|a| a.subject.as_deref()).collect();
        assert_eq!(subjects, vec!["c", "a"]);

        let req = test::TestRequest::get().uri("/appointments?uid=f1").to_request();
        let list: Vec<AppointmentResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(list.is_empty());

        let req = test::TestRequest::get().uri("/appointments?role=Faculty").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_update_merges_and_unknown_id_is_not_found() {
        let app = test::init_service(App::new().app_data(memory_store()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/appointments")
            .set_json(booking("s1", "f1", "Lab"))
            .to_request();
        let created: AppointmentResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/appointments/{}", created.id))
            .set_json(json!({ "status": "Rejected", "rejectionReason": "Conference travel" }))
            .to_request();
        let updated: AppointmentResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.status, "Rejected");
        assert_eq!(updated.rejection_reason, "Conference travel");
        assert_eq!(updated.subject.as_deref(), Some("Lab"));
        assert_eq!(updated.created_at, created.created_at);

        let req = test::TestRequest::put()
            .uri(&format!("/appointments/{}", ObjectId::new().to_hex()))
            .set_json(json!({ "status": "Approved" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(resp).await, "Not found");

        let req = test::TestRequest::put()
            .uri(&format!("/appointments/{}", created.id))
            .set_json(json!({ "createdAt": "yesterday" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_empty_update_returns_current_document() {
        let app = test::init_service(App::new().app_data(memory_store()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/appointments")
            .set_json(booking("s1", "f1", "Thesis"))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["_id"].as_str().unwrap_or_default().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/appointments/{}", id))
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let unchanged: Value = test::read_body_json(resp).await;
        assert_eq!(unchanged, created);

        let req = test::TestRequest::get()
            .uri(&format!("/appointments/single/{}", id))
            .to_request();
        let stored: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stored, created);

        let req = test::TestRequest::put()
            .uri(&format!("/appointments/{}", ObjectId::new().to_hex()))
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(resp).await, "Not found");
    }

    #[actix_web::test]
    async fn test_delete_then_get_is_not_found() {
        let app = test::init_service(App::new().app_data(memory_store()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/appointments")
            .set_json(booking("s1", "f1", "Lab"))
            .to_request();
        let created: AppointmentResponse = test::call_and_read_body_json(&app, req).await;

        for _ in 0..2 {
            let req = test::TestRequest::delete()
                .uri(&format!("/appointments/{}", created.id))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Deleted successfully");
        }

        let req = test::TestRequest::get()
            .uri(&format!("/appointments/single/{}", created.id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_malformed_id_is_bad_request() {
        let app = test::init_service(App::new().app_data(memory_store()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/appointments/single/xyz").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.starts_with("Invalid appointment ID"));
    }
}
