use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::form;
use crate::ui::app::App;
use crate::ui::form::FormKind;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(state) = app.form.as_ref().filter(|s| s.kind.is_auth()) else {
        return;
    };

    let height = form::height(state);
    let popup = form::centered(area, 60, height + 3);
    let form_area = Rect::new(
        popup.x,
        popup.y + 3,
        popup.width,
        height.min(popup.height.saturating_sub(3)),
    );

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            "FinanTUI",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Personal finances, from the terminal",
            theme::dim_style(),
        )),
    ])
    .centered();
    f.render_widget(
        banner,
        Rect::new(popup.x, popup.y, popup.width, 2.min(popup.height)),
    );

    form::render(f, form_area, state);

    let hint = match state.kind {
        FormKind::Register => " Esc back to login · Ctrl-c quit",
        _ => " Ctrl-r create an account · Ctrl-c quit",
    };
    let hint_y = form_area.y + form_area.height;
    if hint_y < area.y + area.height {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(hint, theme::dim_style()))).centered(),
            Rect::new(popup.x, hint_y, popup.width, 1),
        );
    }
}
