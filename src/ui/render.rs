use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode};
use super::commands;
use super::screens;
use super::theme;
use crate::routes::{Guard, Route};

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if let Some(form) = app.form.as_ref().filter(|form| !form.kind.is_auth()) {
        let popup = screens::form::centered(chunks[1], 64, screens::form::height(form));
        screens::form::render(f, popup, form);
    }

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let bar_style = Style::default().bg(theme::HEADER_BG);
    if app.route.is_public_only() || app.guard == Guard::Loading {
        f.render_widget(
            Paragraph::new(Span::styled(" FinanTUI", theme::header_style())).style(bar_style),
            area,
        );
        return;
    }

    let titles: Vec<Line> = Route::protected()
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let num = i + 1;
            if *route == app.route {
                Line::from(vec![
                    Span::styled(format!("{num}:"), theme::dim_style()),
                    Span::styled(
                        route.to_string(),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(format!("{num}:{route}"), theme::dim_style()))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(bar_style);
    f.render_widget(tabs, area);

    if let Some(user) = &app.user {
        let name = format!("{} ", user.display_name());
        let width = (name.chars().count() as u16).min(area.width);
        let right = Rect::new(area.x + area.width - width, area.y, width, 1);
        f.render_widget(
            Paragraph::new(Span::styled(name, Style::default().fg(theme::GREEN))).style(bar_style),
            right,
        );
    }
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.guard {
        Guard::Loading | Guard::Redirect(_) => {
            let msg = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("Loading…", theme::dim_style())),
            ])
            .centered();
            f.render_widget(msg, area);
        }
        Guard::Render(route) => match route {
            Route::Login | Route::Register => screens::auth::render(f, area, app),
            Route::Dashboard => screens::dashboard::render(f, area, app),
            Route::Transactions => screens::transactions::render(f, area, app),
            Route::Categories => screens::categories::render(f, area, app),
            Route::Reports => screens::reports::render(f, area, app),
        },
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_color = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Form => theme::GREEN,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_color)
        .add_modifier(Modifier::BOLD);

    let info = format!(" {} | {}", app.route, app.route.path());

    let right = match app.route {
        Route::Login | Route::Register => " Enter submit | Tab next field ",
        Route::Dashboard => " 1-4 tabs | :logout | ? help ",
        Route::Transactions => " a add | e edit | D delete | ? help ",
        Route::Categories => " a add | e edit | D delete | ? help ",
        Route::Reports => " H/L month | p PDF | x Excel | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.len() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal | InputMode::Form => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {title}"),
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    ))
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " FinanTUI Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Navigation"),
        Line::from(Span::styled(
            "  j/k or Up/Down   Move cursor           1-4        Switch tabs",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Tab/Shift-Tab    Cycle tabs            g/G        Top/Bottom",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  H/L (Reports)    Prev/Next month       Ctrl-q     Quit",
            theme::normal_style(),
        )),
        Line::from(""),
        section("Actions"),
        Line::from(Span::styled(
            "  a               Add                    e          Edit selected",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  D               Delete selected        R          Reload screen",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  p / x (Reports) Export PDF / Excel     Esc        Cancel/Back",
            theme::normal_style(),
        )),
        Line::from(""),
        section("Commands"),
    ];

    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<14} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_area = screens::form::centered(area, 72, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
