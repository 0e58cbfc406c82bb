use ratatui::{
    layout::{Constraint, Direction as Axis, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::dashboard::render_summary_cards;
use super::{loaded_or_placeholder, titled_block};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_signed, month_name, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Axis::Vertical)
        .constraints([
            Constraint::Length(1), // Period selector
            Constraint::Min(5),
        ])
        .split(area);

    render_period(f, chunks[0], app);

    let title = format!(
        "Monthly Report · {} {}",
        month_name(app.report_month),
        app.report_year
    );
    let Some(report) = loaded_or_placeholder(f, chunks[1], &title, &app.report) else {
        return;
    };

    let body = Layout::default()
        .direction(Axis::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(4)])
        .split(chunks[1]);
    render_summary_cards(f, body[0], report);

    let tables = Layout::default()
        .direction(Axis::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body[1]);

    let category_rows: Vec<Row> = report
        .by_category
        .iter()
        .map(|s| {
            let style = if s.direction == crate::models::Direction::Inflow {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            Row::new(vec![
                Cell::from(truncate(&s.category_name, 22)),
                Cell::from(s.direction.as_str()),
                Cell::from(Span::styled(format_signed(s.total, s.direction), style)),
            ])
        })
        .collect();
    let category_table = Table::new(
        category_rows,
        [
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(16),
        ],
    )
    .header(Row::new(["Category", "Type", "Total"]).style(theme::header_style()))
    .block(titled_block("By Category"));
    f.render_widget(category_table, tables[0]);

    let page = tables[1].height.saturating_sub(3) as usize;
    let txn_rows: Vec<Row> = report
        .transactions
        .iter()
        .skip(app.report_scroll)
        .take(page)
        .map(|t| {
            let style = if t.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            Row::new(vec![
                Cell::from(t.date.format("%Y-%m-%d").to_string()),
                Cell::from(truncate(t.description_or_dash(), 30)),
                Cell::from(truncate(&t.category_name, 14)),
                Cell::from(Span::styled(format_signed(t.amount, t.direction), style)),
            ])
        })
        .collect();
    let txn_table = Table::new(
        txn_rows,
        [
            Constraint::Length(11),
            Constraint::Min(12),
            Constraint::Length(15),
            Constraint::Length(16),
        ],
    )
    .header(Row::new(["Date", "Description", "Category", "Amount"]).style(theme::header_style()))
    .block(titled_block(format!(
        "Transactions ({})",
        report.transactions.len()
    )));
    f.render_widget(txn_table, tables[1]);
}

fn render_period(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(" Year: ", theme::dim_style())];
    for year in app.year_range() {
        let style = if year == app.report_year {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        spans.push(Span::styled(format!("{year} "), style));
    }
    spans.push(Span::styled(" Month: ", theme::dim_style()));
    spans.push(Span::styled(
        month_name(app.report_month),
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    ));
    if app.exporting {
        spans.push(Span::styled("   exporting…", Style::default().fg(theme::YELLOW)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
