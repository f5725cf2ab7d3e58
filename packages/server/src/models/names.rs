use chrono::{DateTime, Utc};
use common::FlowerName;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const MSG_EMPTY_NAME: &str = "please enter a name";
pub const MSG_EMPTY_NAMES: &str = "please provide a list of names";
pub const MSG_MISSING_PASSWORD: &str = "please enter the password";
pub const MSG_AVAILABLE: &str = "name is available";
pub const MSG_TAKEN: &str = "name is already taken, please choose another";
pub const MSG_ADDED: &str = "name added";
pub const MSG_EXISTS: &str = "name already exists";

/// Request body for an availability check.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CheckRequest {
    /// Name to check. Letter case and surrounding whitespace are ignored.
    #[serde(default)]
    #[schema(example = "Rose")]
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CheckResponse {
    #[schema(example = true)]
    pub success: bool,
    /// Whether the name is still free.
    #[schema(example = true)]
    pub available: bool,
    #[schema(example = "name is available")]
    pub message: String,
}

/// Request body for reserving a single name.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddRequest {
    #[serde(default)]
    #[schema(example = "Rose")]
    pub name: String,
    /// Shared admin secret. Required unless `auth.protect_add` is off.
    #[schema(example = "s3cret")]
    pub password: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AddResponse {
    /// `false` when the name was already taken.
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "name added")]
    pub message: String,
}

/// Request body for reserving several names at once.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct BatchAddRequest {
    /// Shared admin secret.
    #[schema(example = "s3cret")]
    pub password: Option<String>,
    /// Names to reserve, processed in order. Blank entries are ignored.
    #[serde(default)]
    #[schema(example = json!(["Rose", "rose", "Lily"]))]
    pub names: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BatchAddResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "added 2, 1 already existed")]
    pub message: String,
    /// Names reserved by this request, in input order.
    #[schema(example = json!(["Rose", "Lily"]))]
    pub added: Vec<String>,
    /// Names that were already taken.
    #[schema(example = json!(["rose"]))]
    pub skipped: Vec<String>,
}

/// One reserved name.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FlowerNameResponse {
    #[schema(example = "Rose")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<FlowerName> for FlowerNameResponse {
    fn from(record: FlowerName) -> Self {
        Self {
            name: record.name,
            created_at: record.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ListResponse {
    #[schema(example = true)]
    pub success: bool,
    /// Reserved names, newest first.
    pub names: Vec<FlowerNameResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    /// Active storage backend.
    #[schema(example = "sqlite")]
    pub backend: &'static str,
}

/// Return the trimmed name, or a validation error if nothing is left.
pub fn validate_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(MSG_EMPTY_NAME.into()));
    }
    Ok(name)
}

/// A batch must contain at least one non-blank name.
pub fn validate_names(names: &[String]) -> Result<(), AppError> {
    if names.iter().all(|n| n.trim().is_empty()) {
        return Err(AppError::Validation(MSG_EMPTY_NAMES.into()));
    }
    Ok(())
}

pub fn batch_message(added: usize, skipped: usize) -> String {
    format!("added {added}, {skipped} already existed")
}
