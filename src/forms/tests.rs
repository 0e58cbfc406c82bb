#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_login_requires_valid_email() {
    let form = LoginForm {
        email: "ana".into(),
        password: "x".into(),
    };
    assert_eq!(form.validate().unwrap_err(), ValidationError::InvalidEmail);

    let form = LoginForm {
        email: "".into(),
        password: "x".into(),
    };
    assert_eq!(form.validate().unwrap_err(), ValidationError::Required("Email"));
}

#[test]
fn test_login_requires_password() {
    let form = LoginForm {
        email: "ana@example.com".into(),
        password: String::new(),
    };
    assert_eq!(
        form.validate().unwrap_err(),
        ValidationError::Required("Password")
    );
}

#[test]
fn test_login_trims_email() {
    let form = LoginForm {
        email: "  ana@example.com ".into(),
        password: "segredo".into(),
    };
    let req = form.validate().unwrap();
    assert_eq!(req.email, "ana@example.com");
    assert_eq!(req.password, "segredo");
}

#[test]
fn test_register_name_bounds() {
    let mut form = RegisterForm {
        name: "A".into(),
        email: "ana@example.com".into(),
        password: "segredo".into(),
    };
    assert_eq!(
        form.validate().unwrap_err(),
        ValidationError::TooShort {
            field: "Name",
            min: 2
        }
    );

    form.name = "a".repeat(101);
    assert_eq!(
        form.validate().unwrap_err(),
        ValidationError::TooLong {
            field: "Name",
            max: 100
        }
    );

    form.name = "Ana".into();
    assert!(form.validate().is_ok());
}

#[test]
fn test_register_password_minimum() {
    let form = RegisterForm {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        password: "12345".into(),
    };
    assert_eq!(
        form.validate().unwrap_err(),
        ValidationError::TooShort {
            field: "Password",
            min: 6
        }
    );
}

#[test]
fn test_category_empty_name_rejected() {
    let form = CategoryForm {
        name: "   ".into(),
        description: "whatever".into(),
    };
    assert_eq!(form.validate().unwrap_err(), ValidationError::Required("Name"));
}

#[test]
fn test_category_limits() {
    let form = CategoryForm {
        name: "x".repeat(81),
        description: String::new(),
    };
    assert!(matches!(
        form.validate(),
        Err(ValidationError::TooLong { field: "Name", .. })
    ));

    let form = CategoryForm {
        name: "Lazer".into(),
        description: "y".repeat(201),
    };
    assert!(matches!(
        form.validate(),
        Err(ValidationError::TooLong {
            field: "Description",
            ..
        })
    ));
}

#[test]
fn test_category_blank_description_omitted() {
    let form = CategoryForm {
        name: " Lazer ".into(),
        description: "  ".into(),
    };
    let req = form.validate().unwrap();
    assert_eq!(req.name, "Lazer");
    assert_eq!(req.description, None);
}

#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount("12.50").unwrap(), dec!(12.50));
    assert_eq!(parse_amount("12,5").unwrap(), dec!(12.5));
    assert_eq!(parse_amount("R$ 1,234.56").unwrap(), dec!(1234.56));
    assert_eq!(parse_amount("$3").unwrap(), dec!(3));
    assert_eq!(parse_amount("abc").unwrap_err(), ValidationError::InvalidAmount);
    assert_eq!(parse_amount("").unwrap_err(), ValidationError::Required("Amount"));
}

#[test]
fn test_parse_amount_thousands_separators() {
    assert_eq!(parse_amount("1.234,56").unwrap(), dec!(1234.56));
    assert_eq!(parse_amount("R$ 1.234,56").unwrap(), dec!(1234.56));
    assert_eq!(parse_amount("1,234.56").unwrap(), dec!(1234.56));
    assert_eq!(parse_amount("1.234.567,89").unwrap(), dec!(1234567.89));
    assert_eq!(parse_amount("1,2,3").unwrap_err(), ValidationError::InvalidAmount);
}

#[test]
fn test_sub_cent_amount_rejected() {
    assert_eq!(
        parse_amount("0.004").unwrap_err(),
        ValidationError::NonPositiveAmount
    );
    assert_eq!(
        parse_amount("0,001").unwrap_err(),
        ValidationError::NonPositiveAmount
    );
    assert_eq!(parse_amount("0.006").unwrap(), dec!(0.01));

    let mut form = TransactionForm::new(date(2024, 3, 1));
    form.category_id = Some(1);
    form.amount = "0.004".into();
    assert_eq!(
        form.validate().unwrap_err(),
        ValidationError::NonPositiveAmount
    );
}

#[test]
fn test_transaction_amount_must_be_positive() {
    let mut form = TransactionForm::new(date(2024, 3, 1));
    form.category_id = Some(1);
    form.amount = "0".into();
    assert_eq!(
        form.validate().unwrap_err(),
        ValidationError::NonPositiveAmount
    );
    form.amount = "-5".into();
    assert_eq!(
        form.validate().unwrap_err(),
        ValidationError::NonPositiveAmount
    );
}

#[test]
fn test_transaction_requires_category() {
    let mut form = TransactionForm::new(date(2024, 3, 1));
    form.amount = "10".into();
    assert_eq!(form.validate().unwrap_err(), ValidationError::MissingCategory);
}

#[test]
fn test_transaction_bad_date() {
    let mut form = TransactionForm::new(date(2024, 3, 1));
    form.date = "03/01/2024".into();
    form.amount = "10".into();
    form.category_id = Some(2);
    assert_eq!(form.validate().unwrap_err(), ValidationError::InvalidDate);
}

#[test]
fn test_transaction_valid_request() {
    let mut form = TransactionForm::new(date(2024, 3, 15));
    form.amount = "89.9".into();
    form.direction = Direction::Inflow;
    form.description = " Reembolso ".into();
    form.category_id = Some(4);

    let req = form.validate().unwrap();
    assert_eq!(req.date, date(2024, 3, 15));
    assert_eq!(req.amount, dec!(89.9));
    assert_eq!(req.direction, Direction::Inflow);
    assert_eq!(req.description.as_deref(), Some("Reembolso"));
    assert_eq!(req.category_id, 4);
}

#[test]
fn test_transaction_form_from_existing() {
    let txn = Transaction {
        id: 9,
        date: date(2024, 2, 29),
        amount: dec!(42),
        direction: Direction::Outflow,
        description: None,
        category_id: 3,
        category_name: "Mercado".into(),
    };
    let form = TransactionForm::from_transaction(&txn);
    assert_eq!(form.date, "2024-02-29");
    assert_eq!(form.amount, "42.00");
    assert_eq!(form.validate().unwrap(), txn.to_request());
}
