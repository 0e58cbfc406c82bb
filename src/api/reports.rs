use super::{ApiClient, ApiError};
use crate::models::{ExportFormat, MonthlyReport};

/// A binary export ready to be written to disk.
#[derive(Debug, Clone)]
pub(crate) struct Download {
    pub(crate) filename: String,
    pub(crate) bytes: Vec<u8>,
}

fn period(year: i32, month: u32) -> [(&'static str, String); 2] {
    [("ano", year.to_string()), ("mes", month.to_string())]
}

#[tracing::instrument(skip(client))]
pub(crate) async fn monthly(
    client: &ApiClient,
    year: i32,
    month: u32,
) -> Result<MonthlyReport, ApiError> {
    client.get_json("/relatorios/mensal", &period(year, month)).await
}

#[tracing::instrument(skip(client))]
pub(crate) async fn export(
    client: &ApiClient,
    year: i32,
    month: u32,
    format: ExportFormat,
) -> Result<Download, ApiError> {
    let path = format!("/relatorios/mensal/export/{}", format.endpoint());
    let (filename, bytes) = client.get_bytes(&path, &period(year, month)).await?;
    tracing::info!(size = bytes.len(), "Export received");
    Ok(Download {
        filename: filename.unwrap_or_else(|| format.default_filename(year, month)),
        bytes,
    })
}
