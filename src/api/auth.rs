//! Public endpoints: login and registration.

use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest};

#[tracing::instrument(skip(client, password))]
pub(crate) async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    tracing::info!("Attempting login");
    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    client
        .send_json(Method::POST, "/auth/login", &request)
        .await
}

#[tracing::instrument(skip(client, password))]
pub(crate) async fn register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    tracing::info!("Attempting registration");
    let request = RegisterRequest {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    client
        .send_json(Method::POST, "/auth/registrar", &request)
        .await
}
