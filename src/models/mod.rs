mod auth;
mod category;
mod report;
mod transaction;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, User};
pub use category::{Category, CategoryRequest};
pub use report::{ExportFormat, MonthlyReport};
pub use transaction::{Direction, Transaction, TransactionRequest};

#[cfg(test)]
mod tests;
