use mongodb::bson::{self, oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::format_timestamp;

pub const DEFAULT_DEPARTMENT: &str = "Computer Science";
pub const DEFAULT_PHONE: &str = "+91 98765 43210";
pub const DEFAULT_ID_NUMBER: &str = "CF2024001";

/// Papel comparado (sem diferenciar maiúsculas) pela listagem de professores
pub const FACULTY_ROLE: &str = "Faculty";

/// Janela de atendimento do usuário. Apenas informativa, nunca validada contra agendamentos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// Hora de início (0-23)
    pub start_hour: i32,
    /// Hora de término (0-23)
    pub end_hour: i32,
    /// Dias da semana (0 = domingo)
    pub days: Vec<i32>,
    pub enabled: bool,
}

impl Default for Availability {
    fn default() -> Self {
        Availability {
            start_hour: 9,
            end_hour: 17,
            days: vec![1, 2, 3, 4, 5],
            enabled: true,
        }
    }
}

/// Availability as sent by clients; unset sub-fields fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AvailabilityInput {
    pub start_hour: Option<i32>,
    pub end_hour: Option<i32>,
    pub days: Option<Vec<i32>>,
    pub enabled: Option<bool>,
}

impl AvailabilityInput {
    pub fn resolve(self) -> Availability {
        let defaults = Availability::default();
        Availability {
            start_hour: self.start_hour.unwrap_or(defaults.start_hour),
            end_hour: self.end_hour.unwrap_or(defaults.end_hour),
            days: self.days.unwrap_or(defaults.days),
            enabled: self.enabled.unwrap_or(defaults.enabled),
        }
    }
}

fn default_department() -> String {
    DEFAULT_DEPARTMENT.to_string()
}

fn default_phone() -> String {
    DEFAULT_PHONE.to_string()
}

fn default_id_number() -> String {
    DEFAULT_ID_NUMBER.to_string()
}

fn default_true() -> bool {
    true
}

/// Perfil de aluno ou professor (armazenado no MongoDB, coleção `users`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Identificador externo (chave natural do upsert)
    pub uid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Texto livre ("Student", "Faculty", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default = "default_department")]
    pub department: String,

    #[serde(default = "default_phone")]
    pub phone: String,

    #[serde(default = "default_id_number")]
    pub id_number: String,

    #[serde(default)]
    pub availability: Availability,

    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_study: Option<String>,

    /// Definido uma única vez, na inserção
    pub created_at: DateTime,
}

impl UserProfile {
    /// A fresh profile for `uid` with every default applied.
    pub fn new(uid: &str, now: DateTime) -> Self {
        UserProfile {
            id: None,
            uid: uid.to_string(),
            name: None,
            email: None,
            role: None,
            department: default_department(),
            phone: default_phone(),
            id_number: default_id_number(),
            availability: Availability::default(),
            notifications_enabled: true,
            year_of_study: None,
            created_at: now,
        }
    }

    /// Same test as the `^Faculty$` / `i` regex used against MongoDB, where `$` also
    /// matches before one trailing newline.
    pub fn is_faculty(&self) -> bool {
        self.role
            .as_deref()
            .map(|role| {
                let role = role.strip_suffix('\n').unwrap_or(role);
                role.eq_ignore_ascii_case(FACULTY_ROLE)
            })
            .unwrap_or(false)
    }
}

/// Fields an upsert overwrites. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing)]
    pub availability: Option<AvailabilityInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_study: Option<String>,
}

impl UserChanges {
    /// Overwrites every provided field; availability is replaced as a whole.
    pub fn apply(self, user: &mut UserProfile) {
        if let Some(name) = self.name {
            user.name = Some(name);
        }
        if let Some(email) = self.email {
            user.email = Some(email);
        }
        if let Some(role) = self.role {
            user.role = Some(role);
        }
        if let Some(department) = self.department {
            user.department = department;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(id_number) = self.id_number {
            user.id_number = id_number;
        }
        if let Some(availability) = self.availability {
            user.availability = availability.resolve();
        }
        if let Some(enabled) = self.notifications_enabled {
            user.notifications_enabled = enabled;
        }
        if let Some(year) = self.year_of_study {
            user.year_of_study = Some(year);
        }
    }

    /// Body of the `$set` stage for an upsert.
    pub fn to_set_document(&self) -> Result<Document, bson::ser::Error> {
        let mut set = bson::to_document(self)?;
        if let Some(availability) = &self.availability {
            set.insert("availability", bson::to_bson(&availability.clone().resolve())?);
        }
        Ok(set)
    }
}

/// Request para criar/atualizar usuário (POST /users)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertUserRequest {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub id_number: Option<String>,
    pub availability: Option<AvailabilityInput>,
    pub notifications_enabled: Option<bool>,
    pub year_of_study: Option<String>,
}

impl UpsertUserRequest {
    pub fn into_parts(self) -> (Option<String>, UserChanges) {
        let changes = UserChanges {
            name: self.name,
            email: self.email,
            role: self.role,
            department: self.department,
            phone: self.phone,
            id_number: self.id_number,
            availability: self.availability,
            notifications_enabled: self.notifications_enabled,
            year_of_study: self.year_of_study,
        };
        (self.uid, changes)
    }
}

/// Response de usuário
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub department: String,
    pub phone: String,
    pub id_number: String,
    pub availability: Availability,
    pub notifications_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_study: Option<String>,
    pub created_at: String,
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            uid: user.uid,
            name: user.name,
            email: user.email,
            role: user.role,
            department: user.department,
            phone: user.phone,
            id_number: user.id_number,
            availability: user.availability,
            notifications_enabled: user.notifications_enabled,
            year_of_study: user.year_of_study,
            created_at: format_timestamp(user.created_at),
        }
    }
}
