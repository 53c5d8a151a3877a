//! Types for authentication and user management

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// User data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user ID; numeric ids are kept as strings
    #[serde(default, deserialize_with = "id_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The document-store ID, when the backend sends `_id`
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub object_id: Option<String>,

    /// The user's email address
    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// The user's role string, the only input to permission derivation
    #[serde(default)]
    pub role: String,

    /// Everything else the backend sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// The identifier, whichever of `id`/`_id` the backend used
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.object_id.as_deref())
    }

    /// The typed role, if the role string is a known one
    pub fn role_kind(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    /// "First Last", falling back to the email
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// The three roles the console knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Warehouse,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Warehouse => "warehouse",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "warehouse" => Ok(Role::Warehouse),
            other => Err(Error::general(format!("unknown role: {}", other))),
        }
    }
}

/// Email/password pair submitted by the login form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// Payload for `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Payload for `PUT /auth/change-password`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Payload for `POST /auth/reset-password`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// `data` of a login/register answer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthData {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthData {
    /// Read `{token?, user}` or a bare user object out of an envelope's `data`
    pub fn from_data(data: &Value) -> Self {
        let mut parsed: AuthData = serde_json::from_value(data.clone()).unwrap_or_default();
        if parsed.user.is_none() && data.get("email").is_some() {
            parsed.user = serde_json::from_value(data.clone()).ok();
        }
        parsed
    }
}

/// Outcome of a session operation.
///
/// Failures are reported here instead of as an `Err` so callers can render an
/// inline message.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResult {
    pub success: bool,
    pub message: Option<String>,
    pub user: Option<User>,
}

impl AuthResult {
    pub fn ok(user: Option<User>, message: Option<String>) -> Self {
        Self {
            success: true,
            message,
            user,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            user: None,
        }
    }
}
