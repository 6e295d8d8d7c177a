use serde::{Deserialize, Serialize};
use validator::Validate;

/// Credentials collected by the login view. Both fields are checked
/// before any network call goes out.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
