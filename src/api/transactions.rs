use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{Transaction, TransactionRequest};

pub(crate) async fn list(client: &ApiClient) -> Result<Vec<Transaction>, ApiError> {
    client.get_json("/transacoes", &[]).await
}

#[tracing::instrument(skip(client))]
pub(crate) async fn create(
    client: &ApiClient,
    request: &TransactionRequest,
) -> Result<Transaction, ApiError> {
    client.send_json(Method::POST, "/transacoes", request).await
}

#[tracing::instrument(skip(client))]
pub(crate) async fn update(
    client: &ApiClient,
    id: i64,
    request: &TransactionRequest,
) -> Result<Transaction, ApiError> {
    client
        .send_json(Method::PUT, &format!("/transacoes/{id}"), request)
        .await
}

#[tracing::instrument(skip(client))]
pub(crate) async fn delete(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/transacoes/{id}")).await
}
