use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::form::{FieldKind, FormState};
use crate::ui::theme;

const LABEL_WIDTH: usize = 13;

/// Height the form needs, borders included.
pub(crate) fn height(form: &FormState) -> u16 {
    form.fields.len() as u16 + 6
}

pub(crate) fn render(f: &mut Frame, area: Rect, form: &FormState) {
    let mut lines = vec![Line::from("")];
    let mut cursor = None;

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        let value = form.display_value(i);
        let value_style = match field.kind {
            FieldKind::Direction | FieldKind::Category if focused => {
                Style::default().fg(theme::YELLOW)
            }
            _ => theme::normal_style(),
        };
        if focused && matches!(field.kind, FieldKind::Text | FieldKind::Secret) {
            cursor = Some((
                area.x + 2 + LABEL_WIDTH as u16 + value.chars().count() as u16,
                area.y + 1 + lines.len() as u16,
            ));
        }
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<width$}", field.label, width = LABEL_WIDTH), label_style),
            Span::styled(value, value_style),
        ]));
    }

    lines.push(Line::from(""));
    match (&form.error, form.submitting) {
        (_, true) => lines.push(Line::from(Span::styled(" Sending…", theme::dim_style()))),
        (Some(err), false) => {
            lines.push(Line::from(Span::styled(format!(" {err}"), theme::expense_style())))
        }
        (None, false) => lines.push(Line::from(Span::styled(
            " Tab next field · ←/→ choose · Enter submit",
            theme::dim_style(),
        ))),
    }

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .style(Style::default().bg(theme::HEADER_BG))
        .title(Span::styled(
            format!(" {} ", form.kind.title()),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);

    if let Some(pos) = cursor {
        f.set_cursor_position(pos);
    }
}

/// Centers a popup of the given size inside `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
