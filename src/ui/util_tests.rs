#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;
use crate::models::Direction;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_fits() {
    assert_eq!(truncate("Mercado", 10), "Mercado");
    assert_eq!(truncate("Mercado", 7), "Mercado");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Supermercado Extra", 8), "Superme…");
}

#[test]
fn test_truncate_edges() {
    assert_eq!(truncate("", 5), "");
    assert_eq!(truncate("abc", 0), "");
    assert_eq!(truncate("abc", 1), "…");
}

#[test]
fn test_truncate_accented() {
    assert_eq!(truncate("Alimentação", 6), "Alime…");
}

// ── format_amount ──────────────────────────────────────────

#[test]
fn test_format_amount_groups_thousands() {
    assert_eq!(format_amount(dec!(1234.56)), "R$ 1,234.56");
    assert_eq!(format_amount(dec!(1234567.89)), "R$ 1,234,567.89");
    assert_eq!(format_amount(dec!(999.99)), "R$ 999.99");
}

#[test]
fn test_format_amount_pads_decimals() {
    assert_eq!(format_amount(dec!(0)), "R$ 0.00");
    assert_eq!(format_amount(dec!(1.5)), "R$ 1.50");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-R$ 42.50");
    assert_eq!(format_amount(dec!(-99999.01)), "-R$ 99,999.01");
}

#[test]
fn test_format_signed_by_direction() {
    assert_eq!(format_signed(dec!(5000), Direction::Inflow), "+R$ 5,000.00");
    assert_eq!(format_signed(dec!(89.9), Direction::Outflow), "-R$ 89.90");
}

#[test]
fn test_month_name() {
    assert_eq!(month_name(1), "January");
    assert_eq!(month_name(12), "December");
    assert_eq!(month_name(0), "?");
    assert_eq!(month_name(13), "?");
}

// ── scrolling ──────────────────────────────────────────────

#[test]
fn test_scroll_down_follows_cursor() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 10);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_pulls_viewport() {
    let (mut index, mut scroll) = (4, 4);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (3, 3));
}

#[test]
fn test_scroll_to_bounds() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 20, 5);
    assert_eq!((index, scroll), (19, 15));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}
