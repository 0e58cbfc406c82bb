use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::{loaded_or_placeholder, titled_block};
use crate::ui::app::App;
use crate::ui::theme;
use rust_decimal::Decimal;

use crate::ui::util::{format_amount, format_signed, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(transactions) = loaded_or_placeholder(f, area, "Transactions", &app.transactions)
    else {
        return;
    };

    if transactions.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No transactions yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press a or use :txn-add to record one",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(titled_block("Transactions (0)"));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(["Date", "Description", "Category", "Type", "Amount"])
        .style(theme::header_style())
        .height(1);

    let rows: Vec<Row> = transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let amount_style = if txn.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(txn.date.format("%Y-%m-%d").to_string()),
                Cell::from(truncate(txn.description_or_dash(), 40)),
                Cell::from(truncate(&txn.category_name, 18)),
                Cell::from(txn.direction.as_str()),
                Cell::from(Span::styled(
                    format_signed(txn.amount, txn.direction),
                    amount_style,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Min(20),
        Constraint::Length(19),
        Constraint::Length(8),
        Constraint::Length(16),
    ];

    let net: Decimal = transactions.iter().map(|t| t.signed_amount()).sum();
    let title = format!(
        "Transactions ({}) · net {}",
        transactions.len(),
        format_amount(net)
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(title));
    f.render_widget(table, area);
}
