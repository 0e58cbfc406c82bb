pub(crate) mod auth;
pub(crate) mod categories;
pub(crate) mod dashboard;
pub(crate) mod form;
pub(crate) mod reports;
pub(crate) mod transactions;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::ViewState;
use super::theme;

pub(crate) fn titled_block(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {} ", title.into()),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}

/// Draws the loading or failure placeholder for a view that has no data
/// yet. Returns the data when there is some to draw.
pub(crate) fn loaded_or_placeholder<'a, T>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    state: &'a ViewState<T>,
) -> Option<&'a T> {
    let (text, style) = match state {
        ViewState::Loaded(data) => return Some(data),
        ViewState::Loading => ("Loading…", theme::dim_style()),
        ViewState::Failed(msg) => (*msg, theme::expense_style()),
    };
    let msg = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, style))])
        .centered()
        .block(titled_block(title));
    f.render_widget(msg, area);
    None
}
