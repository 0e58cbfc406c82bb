use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Money direction. The server only knows these two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "ENTRADA")]
    Inflow,
    #[serde(rename = "SAIDA")]
    Outflow,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inflow => "Inflow",
            Self::Outflow => "Outflow",
        }
    }

    pub fn sign(&self) -> &'static str {
        match self {
            Self::Inflow => "+",
            Self::Outflow => "-",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in" | "inflow" | "income" | "entrada" | "+" => Some(Self::Inflow),
            "out" | "outflow" | "expense" | "saida" | "saída" | "-" => Some(Self::Outflow),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Inflow => Self::Outflow,
            Self::Outflow => Self::Inflow,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "tipo")]
    pub direction: Direction,
    #[serde(default, rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "categoriaId")]
    pub category_id: i64,
    #[serde(default, rename = "categoriaNome")]
    pub category_name: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.direction == Direction::Inflow
    }

    pub fn is_expense(&self) -> bool {
        self.direction == Direction::Outflow
    }

    /// Amount with the direction applied: positive for inflows, negative for outflows.
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Inflow => self.amount,
            Direction::Outflow => -self.amount,
        }
    }

    pub fn description_or_dash(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => "—",
        }
    }

    /// Request body that reproduces this transaction, used as the starting
    /// point of an edit.
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest {
            date: self.date,
            amount: self.amount,
            direction: self.direction,
            description: self.description.clone(),
            category_id: self.category_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRequest {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "tipo")]
    pub direction: Direction,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "categoriaId")]
    pub category_id: i64,
}
