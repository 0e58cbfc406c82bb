use ratatui::{
    layout::{Constraint, Direction as Axis, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{loaded_or_placeholder, titled_block};
use crate::models::{Direction, MonthlyReport};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_signed, month_name, truncate};

pub(crate) const EMPTY_STATE: &str = "No transactions this month.";
const RECENT_LIMIT: usize = 10;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        "Dashboard · {} {}",
        month_name(app.today.month()),
        app.today.year()
    );
    let Some(report) = loaded_or_placeholder(f, area, &title, &app.dashboard) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Axis::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(8),    // Charts
            Constraint::Min(6),    // Lists
        ])
        .split(area);

    render_summary_cards(f, chunks[0], report);

    if report.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(EMPTY_STATE, theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one from the Transactions tab (2, then a)",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(titled_block(title));
        let rest = Rect::new(
            chunks[1].x,
            chunks[1].y,
            chunks[1].width,
            chunks[1].height + chunks[2].height,
        );
        f.render_widget(msg, rest);
        return;
    }

    let charts = Layout::default()
        .direction(Axis::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(chunks[1]);
    render_flow_chart(f, charts[0], report);
    render_category_chart(f, charts[1], report, Direction::Outflow);
    render_category_chart(f, charts[2], report, Direction::Inflow);

    let lists = Layout::default()
        .direction(Axis::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    render_category_summary(f, lists[0], report);
    render_recent(f, lists[1], report);
}

pub(crate) fn render_summary_cards(f: &mut Frame, area: Rect, report: &MonthlyReport) {
    let cards = Layout::default()
        .direction(Axis::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let inflows = report.transactions.iter().filter(|t| t.is_income()).count();
    let outflows = report.transactions.iter().filter(|t| t.is_expense()).count();

    render_card(
        f,
        cards[0],
        "Income",
        report.total_inflow,
        theme::GREEN,
        format!("{inflows} txns"),
    );
    render_card(
        f,
        cards[1],
        "Expenses",
        report.total_outflow,
        theme::RED,
        format!("{outflows} txns"),
    );
    render_card(
        f,
        cards[2],
        "Balance",
        report.balance,
        if report.balance >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
        String::new(),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    color: Color,
    sub: String,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn bar(label: &str, value: Decimal, color: Color) -> Bar<'static> {
    Bar::default()
        .value(value.abs().round().to_u64().unwrap_or(0))
        .label(Line::from(truncate(label, 10)))
        .style(Style::default().fg(color))
        .value_style(
            Style::default()
                .fg(theme::HEADER_BG)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
}

fn render_flow_chart(f: &mut Frame, area: Rect, report: &MonthlyReport) {
    let bars = [
        bar("Income", report.total_inflow, theme::GREEN),
        bar("Expenses", report.total_outflow, theme::RED),
    ];
    let chart = BarChart::default()
        .block(titled_block("Income vs Expenses"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(2);
    f.render_widget(chart, area);
}

fn render_category_chart(
    f: &mut Frame,
    area: Rect,
    report: &MonthlyReport,
    direction: Direction,
) {
    let (title, color) = match direction {
        Direction::Outflow => ("Expenses by Category", theme::RED),
        Direction::Inflow => ("Income by Category", theme::GREEN),
    };
    let bars: Vec<Bar> = report
        .summaries(direction)
        .take(8)
        .map(|s| bar(&s.category_name, s.total, color))
        .collect();

    if bars.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled("Nothing yet", theme::dim_style())))
            .centered()
            .block(titled_block(title));
        f.render_widget(msg, area);
        return;
    }

    let chart = BarChart::default()
        .block(titled_block(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(1);
    f.render_widget(chart, area);
}

fn render_category_summary(f: &mut Frame, area: Rect, report: &MonthlyReport) {
    let rows: Vec<Row> = report
        .by_category
        .iter()
        .map(|s| {
            let style = match s.direction {
                Direction::Inflow => theme::income_style(),
                Direction::Outflow => theme::expense_style(),
            };
            Row::new(vec![
                Cell::from(truncate(&s.category_name, 24)),
                Cell::from(Span::styled(format_signed(s.total, s.direction), style)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(12), Constraint::Length(16)])
        .block(titled_block("By Category"));
    f.render_widget(table, area);
}

fn render_recent(f: &mut Frame, area: Rect, report: &MonthlyReport) {
    let rows: Vec<Row> = report
        .transactions
        .iter()
        .take(RECENT_LIMIT)
        .map(|t| {
            let style = if t.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            Row::new(vec![
                Cell::from(t.date.format("%d/%m").to_string()),
                Cell::from(truncate(t.description_or_dash(), 30)),
                Cell::from(truncate(&t.category_name, 14)),
                Cell::from(Span::styled(format_signed(t.amount, t.direction), style)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(12),
            Constraint::Length(15),
            Constraint::Length(16),
        ],
    )
    .header(
        Row::new(["Date", "Description", "Category", "Amount"]).style(theme::header_style()),
    )
    .block(titled_block("Recent Transactions"));
    f.render_widget(table, area);
}
