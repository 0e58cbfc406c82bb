//! Client-side validation for the login, register, category and
//! transaction forms. A form that fails here never reaches the network.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use crate::models::{
    Category, CategoryRequest, Direction, LoginRequest, RegisterRequest, Transaction,
    TransactionRequest,
};

pub(crate) const NAME_MIN: usize = 2;
pub(crate) const NAME_MAX: usize = 100;
pub(crate) const PASSWORD_MIN: usize = 6;
pub(crate) const CATEGORY_NAME_MAX: usize = 80;
pub(crate) const CATEGORY_DESCRIPTION_MAX: usize = 200;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").ok());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Amount must be a number, e.g. 1234.56")]
    InvalidAmount,
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Date must be YYYY-MM-DD")]
    InvalidDate,
    #[error("Select a category")]
    MissingCategory,
}

fn is_valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ValidationError::Required(field));
    }
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Accepts `1234.56`, `1234,56`, `1.234,56`, `1,234.56` and a leading
/// currency marker. When both separators appear, the last one is the
/// decimal mark.
pub(crate) fn parse_amount(input: &str) -> Result<Decimal, ValidationError> {
    let cleaned = input
        .trim()
        .trim_start_matches("R$")
        .trim_start_matches('$')
        .trim();
    if cleaned.is_empty() {
        return Err(ValidationError::Required("Amount"));
    }
    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned.to_string(),
    };
    let amount = Decimal::from_str(&normalized)
        .map_err(|_| ValidationError::InvalidAmount)?
        .round_dp(2);
    // Anything under a cent rounds to zero.
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LoginForm {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl LoginForm {
    pub(crate) fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::Required("Email"));
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        Ok(LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RegisterForm {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl RegisterForm {
    pub(crate) fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let name = self.name.trim();
        check_length("Name", name, NAME_MIN, NAME_MAX)?;
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::Required("Email"));
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        check_length("Password", &self.password, PASSWORD_MIN, usize::MAX)?;
        Ok(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CategoryForm {
    pub(crate) name: String,
    pub(crate) description: String,
}

impl CategoryForm {
    pub(crate) fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
        }
    }

    pub(crate) fn validate(&self) -> Result<CategoryRequest, ValidationError> {
        let name = self.name.trim();
        check_length("Name", name, 1, CATEGORY_NAME_MAX)?;
        let description = optional(&self.description);
        if description
            .as_deref()
            .is_some_and(|d| d.chars().count() > CATEGORY_DESCRIPTION_MAX)
        {
            return Err(ValidationError::TooLong {
                field: "Description",
                max: CATEGORY_DESCRIPTION_MAX,
            });
        }
        Ok(CategoryRequest {
            name: name.to_string(),
            description,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TransactionForm {
    pub(crate) date: String,
    pub(crate) amount: String,
    pub(crate) direction: Direction,
    pub(crate) description: String,
    pub(crate) category_id: Option<i64>,
}

impl TransactionForm {
    /// Blank form dated `today`, defaulting to an outflow.
    pub(crate) fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            amount: String::new(),
            direction: Direction::Outflow,
            description: String::new(),
            category_id: None,
        }
    }

    pub(crate) fn from_transaction(txn: &Transaction) -> Self {
        let seed = txn.to_request();
        Self {
            date: seed.date.format("%Y-%m-%d").to_string(),
            amount: format!("{:.2}", seed.amount),
            direction: seed.direction,
            description: seed.description.unwrap_or_default(),
            category_id: Some(seed.category_id),
        }
    }

    pub(crate) fn validate(&self) -> Result<TransactionRequest, ValidationError> {
        let date_str = self.date.trim();
        if date_str.is_empty() {
            return Err(ValidationError::Required("Date"));
        }
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate)?;
        let amount = parse_amount(&self.amount)?;
        let category_id = self.category_id.ok_or(ValidationError::MissingCategory)?;
        Ok(TransactionRequest {
            date,
            amount,
            direction: self.direction,
            description: optional(&self.description),
            category_id,
        })
    }
}

#[cfg(test)]
mod tests;
