use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{Category, CategoryRequest};

pub(crate) async fn list(client: &ApiClient) -> Result<Vec<Category>, ApiError> {
    client.get_json("/categorias", &[]).await
}

#[tracing::instrument(skip(client))]
pub(crate) async fn create(
    client: &ApiClient,
    request: &CategoryRequest,
) -> Result<Category, ApiError> {
    client.send_json(Method::POST, "/categorias", request).await
}

#[tracing::instrument(skip(client))]
pub(crate) async fn update(
    client: &ApiClient,
    id: i64,
    request: &CategoryRequest,
) -> Result<Category, ApiError> {
    client
        .send_json(Method::PUT, &format!("/categorias/{id}"), request)
        .await
}

#[tracing::instrument(skip(client))]
pub(crate) async fn delete(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/categorias/{id}")).await
}
