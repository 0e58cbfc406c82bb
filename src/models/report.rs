use rust_decimal::Decimal;
use serde::Deserialize;

use super::{Direction, Transaction};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "categoriaId")]
    pub category_id: i64,
    #[serde(rename = "categoriaNome")]
    pub category_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "tipo")]
    pub direction: Direction,
}

/// Server-computed aggregate for one calendar month. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlyReport {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "totalEntradas", with = "rust_decimal::serde::float")]
    pub total_inflow: Decimal,
    #[serde(rename = "totalSaidas", with = "rust_decimal::serde::float")]
    pub total_outflow: Decimal,
    #[serde(rename = "saldo", with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(default, rename = "porCategoria")]
    pub by_category: Vec<CategorySummary>,
    #[serde(default, rename = "transacoes")]
    pub transactions: Vec<Transaction>,
}

impl MonthlyReport {
    /// True when the month has nothing to chart or list.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.by_category.is_empty()
    }

    pub fn summaries(&self, direction: Direction) -> impl Iterator<Item = &CategorySummary> {
        self.by_category
            .iter()
            .filter(move |s| s.direction == direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    /// Path segment of the export endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }

    pub fn default_filename(&self, year: i32, month: u32) -> String {
        format!("relatorio_{year}_{month}.{}", self.extension())
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "excel" | "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "PDF"),
            Self::Excel => write!(f, "Excel"),
        }
    }
}
