use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus Scheduler API",
        version = "1.0.0",
        description = "Appointment booking backend for students and faculty.\n\n**Authentication:** none.\n\n**Features:**\n- Profile upsert by external uid\n- Appointment CRUD with status tracking\n- Faculty directory\n- Health monitoring and metrics"
    ),
    paths(
        // Users
        crate::api::users::upsert_user,
        crate::api::users::get_user,
        crate::api::faculty::list_faculty,

        // Appointments
        crate::api::appointments::create_appointment,
        crate::api::appointments::list_appointments,
        crate::api::appointments::get_appointment,
        crate::api::appointments::update_appointment,
        crate::api::appointments::delete_appointment,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UpsertUserRequest,
            crate::models::AvailabilityInput,
            crate::models::Availability,
            crate::models::UserResponse,
            crate::models::CreateAppointmentRequest,
            crate::models::UpdateAppointmentRequest,
            crate::models::AppointmentResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Student and faculty profiles, upserted by uid."),
        (name = "Appointments", description = "Appointment records between students and faculty."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    )
)]
pub struct ApiDoc;
