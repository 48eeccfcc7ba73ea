use mongodb::bson::{self, doc, oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::format_timestamp;

pub const DEFAULT_STATUS: &str = "Pending";

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

/// Agendamento entre aluno e professor (armazenado no MongoDB, coleção `appointments`)
///
/// Nomes e ids são cópias desnormalizadas; nada garante que os usuários existam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Texto livre, sem normalização
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Texto livre, sem normalização
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// "Pending", "Approved", "Rejected", ... (não enumerado)
    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default)]
    pub rejection_reason: String,

    pub created_at: DateTime,
}

impl Appointment {
    pub fn create(request: CreateAppointmentRequest, now: DateTime) -> Self {
        Appointment {
            id: None,
            student_id: request.student_id,
            student_name: request.student_name,
            faculty_id: request.faculty_id,
            faculty_name: request.faculty_name,
            subject: request.subject,
            date: request.date,
            time: request.time,
            status: request.status.unwrap_or_else(default_status),
            rejection_reason: request.rejection_reason.unwrap_or_default(),
            created_at: now,
        }
    }
}

/// Request para criar agendamento (POST /appointments)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAppointmentRequest {
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub faculty_id: Option<String>,
    pub faculty_name: Option<String>,
    pub subject: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
    pub rejection_reason: Option<String>,
}

/// Request para atualizar agendamento (PUT /appointments/{id})
///
/// Serialized as-is into the `$set` stage, so unset fields never reach the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAppointmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn to_set_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }

    pub fn apply(self, appointment: &mut Appointment) {
        if self.student_id.is_some() {
            appointment.student_id = self.student_id;
        }
        if self.student_name.is_some() {
            appointment.student_name = self.student_name;
        }
        if self.faculty_id.is_some() {
            appointment.faculty_id = self.faculty_id;
        }
        if self.faculty_name.is_some() {
            appointment.faculty_name = self.faculty_name;
        }
        if self.subject.is_some() {
            appointment.subject = self.subject;
        }
        if self.date.is_some() {
            appointment.date = self.date;
        }
        if self.time.is_some() {
            appointment.time = self.time;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(reason) = self.rejection_reason {
            appointment.rejection_reason = reason;
        }
    }
}

/// Query de GET /appointments
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentListQuery {
    /// "Faculty" filtra por facultyId; qualquer outro valor por studentId
    pub role: Option<String>,
    /// Id do ator (aluno ou professor)
    pub uid: Option<String>,
}

/// Whose appointments a list query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentScope {
    Faculty(String),
    Student(String),
}

impl AppointmentScope {
    /// Only the exact role "Faculty" selects the faculty side.
    pub fn for_role(role: Option<&str>, actor_id: &str) -> Self {
        match role {
            Some("Faculty") => AppointmentScope::Faculty(actor_id.to_string()),
            _ => AppointmentScope::Student(actor_id.to_string()),
        }
    }

    pub fn filter_document(&self) -> Document {
        match self {
            AppointmentScope::Faculty(id) => doc! { "facultyId": id.as_str() },
            AppointmentScope::Student(id) => doc! { "studentId": id.as_str() },
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        match self {
            AppointmentScope::Faculty(id) => appointment.faculty_id.as_deref() == Some(id.as_str()),
            AppointmentScope::Student(id) => appointment.student_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// Response de agendamento
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub status: String,
    pub rejection_reason: String,
    pub created_at: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(a: Appointment) -> Self {
        AppointmentResponse {
            id: a.id.map(|id| id.to_hex()).unwrap_or_default(),
            student_id: a.student_id,
            student_name: a.student_name,
            faculty_id: a.faculty_id,
            faculty_name: a.faculty_name,
            subject: a.subject,
            date: a.date,
            time: a.time,
            status: a.status,
            rejection_reason: a.rejection_reason,
            created_at: format_timestamp(a.created_at),
        }
    }
}
