// ================
// common/src/lib.rs
// ================
//! Wire types shared between the Embrace Your Journey clients and the
//! backend: request bodies, response views, and the JSON envelope every
//! endpoint wraps its payload in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Self-reported menopause stage. Stored verbatim on the account and echoed
/// back in every profile view.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MenopauseStage {
    Premenopausal,
    Perimenopausal,
    Menopausal,
    Postmenopausal,
    #[default]
    NotSure,
}

impl MenopauseStage {
    pub const ALL: [&'static str; 5] = [
        "premenopausal",
        "perimenopausal",
        "menopausal",
        "postmenopausal",
        "not-sure",
    ];
}

impl FromStr for MenopauseStage {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "premenopausal" => Ok(Self::Premenopausal),
            "perimenopausal" => Ok(Self::Perimenopausal),
            "menopausal" => Ok(Self::Menopausal),
            "postmenopausal" => Ok(Self::Postmenopausal),
            "not-sure" => Ok(Self::NotSure),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MenopauseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Premenopausal => "premenopausal",
            Self::Perimenopausal => "perimenopausal",
            Self::Menopausal => "menopausal",
            Self::Postmenopausal => "postmenopausal",
            Self::NotSure => "not-sure",
        };
        f.write_str(s)
    }
}

/// Body of `POST /api/auth/register`.
///
/// String fields default to empty and the age to zero so that a missing
/// field surfaces as a field-level validation error rather than a
/// deserialization rejection.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i64,
    pub password: String,
    pub confirm_password: String,
    pub menopause_stage: Option<String>,
    pub newsletter: Option<bool>,
}

/// Body of `POST /api/auth/login`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember_me: Option<bool>,
}

/// Body of `PUT /api/auth/profile`. Absent fields are left untouched;
/// email and password are deliberately not updatable here.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i64>,
    pub menopause_stage: Option<String>,
    pub newsletter: Option<bool>,
}

/// Body of `PUT /api/auth/change-password`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Body of `DELETE /api/auth/account`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteAccountRequest {
    pub password: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i64,
    pub menopause_stage: MenopauseStage,
    pub newsletter: bool,
}

/// Profile view: the account view merged with its tracking counters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: UserView,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub days_tracked: u32,
    pub symptoms_logged: u32,
    pub medications_taken: u32,
    pub goals_achieved: u32,
}

/// Payload returned by register and login.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: UserView,
    pub token: String,
    pub expires_in: String,
}

/// Payload of `GET /api/auth/session` (guest-or-signed-in probe).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
}

/// One field-level validation failure inside a 400 response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The `{success, message, data}` envelope every endpoint responds with.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}
