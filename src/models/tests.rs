#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use super::*;

// ── Transaction ───────────────────────────────────────────────

fn make_txn(amount: Decimal, direction: Direction) -> Transaction {
    Transaction {
        id: 1,
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        amount,
        direction,
        description: None,
        category_id: 3,
        category_name: "Mercado".into(),
    }
}

#[test]
fn test_income() {
    let txn = make_txn(dec!(100.00), Direction::Inflow);
    assert!(txn.is_income());
    assert!(!txn.is_expense());
    assert_eq!(txn.signed_amount(), dec!(100.00));
}

#[test]
fn test_expense() {
    let txn = make_txn(dec!(50.00), Direction::Outflow);
    assert!(!txn.is_income());
    assert!(txn.is_expense());
    assert_eq!(txn.signed_amount(), dec!(-50.00));
}

#[test]
fn test_description_or_dash() {
    let mut txn = make_txn(dec!(1), Direction::Inflow);
    assert_eq!(txn.description_or_dash(), "—");
    txn.description = Some("   ".into());
    assert_eq!(txn.description_or_dash(), "—");
    txn.description = Some("Salário".into());
    assert_eq!(txn.description_or_dash(), "Salário");
}

#[test]
fn test_transaction_from_wire() {
    let txn: Transaction = serde_json::from_value(json!({
        "id": 7,
        "data": "2024-03-02",
        "valor": 1250.5,
        "tipo": "SAIDA",
        "descricao": null,
        "categoriaId": 2,
        "categoriaNome": "Aluguel"
    }))
    .unwrap();
    assert_eq!(txn.id, 7);
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    assert_eq!(txn.amount, dec!(1250.5));
    assert_eq!(txn.direction, Direction::Outflow);
    assert_eq!(txn.description, None);
    assert_eq!(txn.category_name, "Aluguel");
}

#[test]
fn test_transaction_request_wire_shape() {
    let req = TransactionRequest {
        date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        amount: dec!(19.90),
        direction: Direction::Inflow,
        description: None,
        category_id: 4,
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["data"], "2024-03-02");
    assert_eq!(value["valor"], 19.9);
    assert_eq!(value["tipo"], "ENTRADA");
    assert_eq!(value["categoriaId"], 4);
    assert!(value.get("descricao").is_none());
}

#[test]
fn test_to_request_keeps_fields() {
    let mut txn = make_txn(dec!(12.34), Direction::Outflow);
    txn.description = Some("Café".into());
    let req = txn.to_request();
    assert_eq!(req.amount, dec!(12.34));
    assert_eq!(req.direction, Direction::Outflow);
    assert_eq!(req.description.as_deref(), Some("Café"));
    assert_eq!(req.category_id, 3);
}

// ── Direction ─────────────────────────────────────────────────

#[test]
fn test_direction_parse() {
    assert_eq!(Direction::parse("in"), Some(Direction::Inflow));
    assert_eq!(Direction::parse("ENTRADA"), Some(Direction::Inflow));
    assert_eq!(Direction::parse("out"), Some(Direction::Outflow));
    assert_eq!(Direction::parse("Saída"), Some(Direction::Outflow));
    assert_eq!(Direction::parse("sideways"), None);
}

#[test]
fn test_direction_toggle() {
    assert_eq!(Direction::Inflow.toggle(), Direction::Outflow);
    assert_eq!(Direction::Outflow.toggle(), Direction::Inflow);
}

// ── Auth ──────────────────────────────────────────────────────

#[test]
fn test_login_response_ignores_scheme() {
    let resp: LoginResponse = serde_json::from_value(json!({
        "token": "abc.def",
        "tipo": "Bearer",
        "usuarioId": 42,
        "email": "ana@example.com",
        "nome": "Ana"
    }))
    .unwrap();
    let user = resp.user();
    assert_eq!(resp.token, "abc.def");
    assert_eq!(user.id, 42);
    assert_eq!(user.name, "Ana");
}

#[test]
fn test_login_request_uses_senha() {
    let value = serde_json::to_value(LoginRequest {
        email: "a@b.co".into(),
        password: "secret1".into(),
    })
    .unwrap();
    assert_eq!(value, json!({"email": "a@b.co", "senha": "secret1"}));
}

#[test]
fn test_user_display_name_falls_back_to_email() {
    let user = User {
        id: 1,
        email: "ana@example.com".into(),
        name: " ".into(),
    };
    assert_eq!(user.display_name(), "ana@example.com");
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_lookup() {
    let cats = vec![
        Category {
            id: 1,
            name: "Mercado".into(),
            description: None,
        },
        Category {
            id: 2,
            name: "Salário".into(),
            description: Some("CLT".into()),
        },
    ];
    assert_eq!(Category::find_by_name(&cats, "mercado").map(|c| c.id), Some(1));
    assert_eq!(Category::find_by_name(&cats, " SALÁRIO ").map(|c| c.id), Some(2));
    assert!(Category::find_by_name(&cats, "Lazer").is_none());
    assert_eq!(Category::find_by_id(&cats, 2).map(|c| c.name.as_str()), Some("Salário"));
}

#[test]
fn test_category_request_omits_missing_description() {
    let value = serde_json::to_value(CategoryRequest {
        name: "Lazer".into(),
        description: None,
    })
    .unwrap();
    assert_eq!(value, json!({"nome": "Lazer"}));
}

// ── Report ────────────────────────────────────────────────────

#[test]
fn test_empty_report() {
    let report: MonthlyReport = serde_json::from_value(json!({
        "ano": 2024,
        "mes": 5,
        "totalEntradas": 0,
        "totalSaidas": 0,
        "saldo": 0,
        "porCategoria": [],
        "transacoes": []
    }))
    .unwrap();
    assert!(report.is_empty());
    assert_eq!(report.balance, Decimal::ZERO);
}

#[test]
fn test_report_summaries_by_direction() {
    let report: MonthlyReport = serde_json::from_value(json!({
        "ano": 2024,
        "mes": 5,
        "totalEntradas": 5000,
        "totalSaidas": 1200.75,
        "saldo": 3799.25,
        "porCategoria": [
            {"categoriaId": 1, "categoriaNome": "Salário", "total": 5000, "tipo": "ENTRADA"},
            {"categoriaId": 2, "categoriaNome": "Aluguel", "total": 1000, "tipo": "SAIDA"},
            {"categoriaId": 3, "categoriaNome": "Mercado", "total": 200.75, "tipo": "SAIDA"}
        ]
    }))
    .unwrap();
    assert!(!report.is_empty());
    assert_eq!(report.summaries(Direction::Outflow).count(), 2);
    assert_eq!(report.summaries(Direction::Inflow).count(), 1);
    assert_eq!(report.total_outflow, dec!(1200.75));
    assert!(report.transactions.is_empty());
}

#[test]
fn test_export_format_filenames() {
    assert_eq!(ExportFormat::Pdf.default_filename(2024, 3), "relatorio_2024_3.pdf");
    assert_eq!(ExportFormat::Excel.default_filename(2024, 12), "relatorio_2024_12.xlsx");
    assert_eq!(ExportFormat::parse("XLSX"), Some(ExportFormat::Excel));
    assert_eq!(ExportFormat::Excel.endpoint(), "excel");
}
