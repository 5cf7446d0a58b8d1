use serde::{Deserialize, Serialize};

/// A note (`tarea`) as owned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    /// May contain markup; strip it before previewing
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "completada")]
    pub completed: bool,
}

/// Body of a create call; the server assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "completada")]
    pub completed: bool,
}

/// Partial update; absent fields are left untouched by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "completada", skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Fields of `edited` that differ from `original`
    pub fn diff(original: &Note, edited: &NewNote) -> Self {
        Self {
            title: (original.title != edited.title).then(|| edited.title.clone()),
            description: (original.description != edited.description)
                .then(|| edited.description.clone()),
            completed: (original.completed != edited.completed).then_some(edited.completed),
        }
    }
}

/// Login and register request body
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Outcome of a registration call
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterResponse {
    pub success: bool,
    /// Raw user payload returned by the server
    pub user: Option<serde_json::Value>,
}

impl RegisterResponse {
    /// An explicit boolean `success` field wins; otherwise a server-assigned
    /// `id` is taken as confirmation. `0`, `""`, `false` and `null` are not ids.
    pub fn from_body(body: serde_json::Value) -> Self {
        let success = match body.get("success").and_then(|v| v.as_bool()) {
            Some(flag) => flag,
            None => body.get("id").is_some_and(is_assigned_id),
        };

        Self {
            success,
            user: Some(body),
        }
    }
}

fn is_assigned_id(id: &serde_json::Value) -> bool {
    match id {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
