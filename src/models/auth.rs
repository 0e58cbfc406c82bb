use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Body returned by both `/auth/login` and `/auth/registrar`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token scheme, always "Bearer" when present.
    #[allow(dead_code)]
    #[serde(default, rename = "tipo")]
    pub scheme: Option<String>,
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    pub email: String,
    #[serde(rename = "nome")]
    pub name: String,
}

impl LoginResponse {
    pub fn user(&self) -> User {
        User {
            id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Identity record persisted next to the token under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "usuarioId")]
    pub id: i64,
    pub email: String,
    #[serde(rename = "nome")]
    pub name: String,
}

impl User {
    /// Name shown in the header; falls back to the email when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}
