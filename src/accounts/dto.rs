use serde::{Deserialize, Serialize};

/// Request body for `POST /register`.
///
/// Every field is optional at the JSON level so that absent keys and `null`
/// values reach field validation instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub security_question: Option<String>,
    #[serde(default)]
    pub security_answer: Option<String>,
}

/// Response returned after a successful registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
