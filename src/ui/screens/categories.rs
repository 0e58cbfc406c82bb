use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::{loaded_or_placeholder, titled_block};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(categories) = loaded_or_placeholder(f, area, "Categories", &app.categories) else {
        return;
    };

    if categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No categories yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press a or use :cat-add <name> to create one",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(titled_block("Categories (0)"));
        f.render_widget(msg, area);
        return;
    }

    let rows: Vec<Row> = categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, cat)| {
            let style = if i == app.category_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(&cat.name, 30)),
                Cell::from(truncate(cat.description.as_deref().unwrap_or("—"), 60)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(32), Constraint::Min(20)])
        .header(Row::new(["Name", "Description"]).style(theme::header_style()))
        .block(titled_block(format!("Categories ({})", categories.len())));
    f.render_widget(table, area);
}
