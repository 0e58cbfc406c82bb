//! Typed client for the finance REST API.
//!
//! [`ApiClient`] is the single configured HTTP client: it attaches the bearer
//! token and turns auth failures into a forced logout. The endpoint modules
//! are thin typed wrappers around it.

pub(crate) mod auth;
pub(crate) mod categories;
mod client;
mod error;
pub(crate) mod reports;
pub(crate) mod transactions;

pub(crate) use client::ApiClient;
pub(crate) use error::ApiError;
