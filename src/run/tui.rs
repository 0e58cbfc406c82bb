use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::ApiClient;
use crate::routes::Route;
use crate::ui::app::{App, InputMode};
use crate::ui::commands;
use crate::ui::form::FormKind;
use crate::ui::tasks::{AppEvent, Tasks};
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

const TICK: Duration = Duration::from_millis(100);
const SESSION_EXPIRED: &str = "Your session expired. Please log in again.";

pub(crate) fn as_tui(
    handle: Handle,
    client: Arc<ApiClient>,
    mut redirects: UnboundedReceiver<Route>,
    download_dir: PathBuf,
) -> Result<()> {
    let (mut tasks, mut events) = Tasks::new(handle, client, download_dir);
    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &mut app,
        &mut tasks,
        &mut events,
        &mut redirects,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "TUI exited with an error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tasks: &mut Tasks,
    events: &mut UnboundedReceiver<AppEvent>,
    redirects: &mut UnboundedReceiver<Route>,
) -> Result<()> {
    // First frame shows the loading placeholder while the session hydrates.
    app.navigate(tasks, Route::Dashboard);
    draw(terminal, app)?;
    if tasks.session().is_loading() {
        if let Err(e) = tasks.session().hydrate() {
            tracing::error!(error = %e, "Failed to read the saved session");
            tasks.session().logout()?;
        }
    }
    tracing::info!(
        signed_in = tasks.session().is_authenticated(),
        "Session ready"
    );
    app.navigate(tasks, Route::Dashboard);

    while app.running {
        while let Ok(route) = redirects.try_recv() {
            app.navigate(tasks, route);
            app.set_status(SESSION_EXPIRED);
        }
        while let Ok(event) = events.try_recv() {
            app.apply(tasks, event);
        }

        draw(terminal, app)?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(key, app, tasks)?;
        }
    }
    Ok(())
}

fn draw(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|f| {
        // tab + status + command bars, table borders and header
        let content_height = f.area().height.saturating_sub(6) as usize;
        app.visible_rows = content_height.max(1);
        crate::ui::render::render(f, app);
    })?;
    Ok(())
}

pub(crate) fn handle_key(key: KeyEvent, app: &mut App, tasks: &mut Tasks) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        app.running = false;
        return Ok(());
    }
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, tasks),
        InputMode::Command => handle_command_input(key, app, tasks),
        InputMode::Form => {
            handle_form_input(key, app, tasks);
            Ok(())
        }
        InputMode::Confirm => {
            handle_confirm_input(key, app, tasks);
            Ok(())
        }
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, tasks: &mut Tasks) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = (c as usize) - ('1' as usize);
            if let Some(&route) = Route::protected().get(idx) {
                app.navigate(tasks, route);
            }
        }
        KeyCode::Tab => cycle_route(app, tasks, 1),
        KeyCode::BackTab => cycle_route(app, tasks, -1),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('R') => app.refresh(tasks),
        KeyCode::Char('a') => app.open_new(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit(),
        KeyCode::Char('D') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('H') if app.route == Route::Reports => {
            commands::handle_command("prev-month", app, tasks)?;
        }
        KeyCode::Char('L') if app.route == Route::Reports => {
            commands::handle_command("next-month", app, tasks)?;
        }
        KeyCode::Char('p') if app.route == Route::Reports => {
            commands::handle_command("export pdf", app, tasks)?;
        }
        KeyCode::Char('x') if app.route == Route::Reports => {
            commands::handle_command("export excel", app, tasks)?;
        }
        KeyCode::Esc => app.set_status(""),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, tasks: &mut Tasks) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, tasks)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_form_input(key: KeyEvent, app: &mut App, tasks: &mut Tasks) {
    let Some(kind) = app.form.as_ref().map(|f| f.kind) else {
        app.input_mode = InputMode::Normal;
        return;
    };

    match key.code {
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if kind == FormKind::Login {
                app.navigate(tasks, Route::Register);
            }
        }
        KeyCode::Esc => match kind {
            FormKind::Register => app.navigate(tasks, Route::Login),
            FormKind::Login => {}
            _ => {
                app.close_form();
                app.set_status("Cancelled");
            }
        },
        KeyCode::Enter => app.submit_form(tasks),
        _ => {
            let Some(form) = app.form.as_mut() else {
                return;
            };
            match key.code {
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                KeyCode::Left => form.cycle(-1),
                KeyCode::Right => form.cycle(1),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.insert_char(c),
                _ => {}
            }
        }
    }
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, tasks: &mut Tasks) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm(tasks),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
        _ => {}
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn cycle_route(app: &mut App, tasks: &mut Tasks, delta: isize) {
    let routes = Route::protected();
    let idx = routes.iter().position(|r| *r == app.route).unwrap_or(0) as isize;
    let next = (idx + delta).rem_euclid(routes.len() as isize) as usize;
    app.navigate(tasks, routes[next]);
}

fn list_len(app: &App) -> usize {
    match app.route {
        Route::Transactions => app.transactions.loaded().map_or(0, Vec::len),
        Route::Categories => app.categories.loaded().map_or(0, Vec::len),
        Route::Reports => app.report.loaded().map_or(0, |r| r.transactions.len()),
        _ => 0,
    }
}

fn handle_move_down(app: &mut App) {
    let len = list_len(app);
    let page = app.visible_rows;
    match app.route {
        Route::Transactions => scroll_down(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            len,
            page,
        ),
        Route::Categories => {
            scroll_down(&mut app.category_index, &mut app.category_scroll, len, page)
        }
        Route::Reports => {
            if app.report_scroll + 1 < len {
                app.report_scroll += 1;
            }
        }
        _ => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.route {
        Route::Transactions => scroll_up(&mut app.transaction_index, &mut app.transaction_scroll),
        Route::Categories => scroll_up(&mut app.category_index, &mut app.category_scroll),
        Route::Reports => app.report_scroll = app.report_scroll.saturating_sub(1),
        _ => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.route {
        Route::Transactions => {
            scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll)
        }
        Route::Categories => scroll_to_top(&mut app.category_index, &mut app.category_scroll),
        Route::Reports => app.report_scroll = 0,
        _ => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let len = list_len(app);
    let page = app.visible_rows;
    match app.route {
        Route::Transactions => scroll_to_bottom(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            len,
            page,
        ),
        Route::Categories => {
            scroll_to_bottom(&mut app.category_index, &mut app.category_scroll, len, page)
        }
        Route::Reports => app.report_scroll = len.saturating_sub(1),
        _ => {}
    }
}
