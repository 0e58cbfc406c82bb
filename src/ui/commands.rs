use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::App;
use super::form::FormState;
use super::tasks::Tasks;
use crate::models::ExportFormat;
use crate::routes::Route;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Tasks) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit FinanTUI", cmd_quit, r);
    register_command!("quit", "Quit FinanTUI", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("r", "Go to Reports", cmd_reports, r);
    register_command!("reports", "Go to Reports", cmd_reports, r);
    register_command!(
        "go",
        "Open a screen by path (e.g. :go /relatorios)",
        cmd_go,
        r
    );
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("logout", "Log out and clear the saved session", cmd_logout, r);
    register_command!("refresh", "Reload the current screen", cmd_refresh, r);
    register_command!(
        "cat-add",
        "New category (e.g. :cat-add Groceries)",
        cmd_cat_add,
        r
    );
    register_command!(
        "txn-add",
        "New transaction (e.g. :txn-add 42.50)",
        cmd_txn_add,
        r
    );
    register_command!("edit", "Edit the selected row", cmd_edit, r);
    register_command!("delete", "Delete the selected row", cmd_delete, r);
    register_command!(
        "month",
        "Report month (e.g. :month 2024-03 or :month 3)",
        cmd_month,
        r
    );
    register_command!("m", "Report month (e.g. :m 3)", cmd_month, r);
    register_command!("year", "Report year (e.g. :year 2025)", cmd_year, r);
    register_command!("next-month", "Go to next report month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous report month", cmd_prev_month, r);
    register_command!(
        "export",
        "Export the report (e.g. :export pdf, :export excel)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, tasks)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _tasks: &mut Tasks) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    app.navigate(tasks, Route::Dashboard);
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    app.navigate(tasks, Route::Transactions);
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    app.navigate(tasks, Route::Categories);
    Ok(())
}

fn cmd_reports(_args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    app.navigate(tasks, Route::Reports);
    Ok(())
}

fn cmd_go(args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    app.navigate(tasks, Route::from_path(args));
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _tasks: &mut Tasks) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_logout(_args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    tasks.session().logout()?;
    app.navigate(tasks, Route::Login);
    app.set_status("Logged out");
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    app.refresh(tasks);
    Ok(())
}

fn cmd_cat_add(args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    if app.route != Route::Categories {
        app.navigate(tasks, Route::Categories);
    }
    let mut form = FormState::category(None);
    if let Some(name) = form.fields.first_mut() {
        name.value = args.to_string();
    }
    app.open_form(form);
    Ok(())
}

fn cmd_txn_add(args: &str, app: &mut App, _tasks: &mut Tasks) -> anyhow::Result<()> {
    if app.route != Route::Transactions {
        app.set_status("Navigate to Transactions first");
        return Ok(());
    }
    app.open_new();
    if let Some(form) = app.form.as_mut() {
        if let Some(amount) = form.fields.iter_mut().find(|f| f.label == "Amount") {
            amount.value = args.to_string();
        }
    }
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, _tasks: &mut Tasks) -> anyhow::Result<()> {
    app.open_edit();
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _tasks: &mut Tasks) -> anyhow::Result<()> {
    app.request_delete();
    Ok(())
}

/// Accepts "2024-03", "2024-3", "03" or "3".
pub(crate) fn parse_period(args: &str, current_year: i32) -> Option<(i32, u32)> {
    let args = args.trim();
    let (year, month) = match args.split_once('-') {
        Some((y, m)) => (y.parse().ok()?, m.parse().ok()?),
        None => (current_year, args.parse().ok()?),
    };
    (1..=12).contains(&month).then_some((year, month))
}

fn show_period(app: &mut App, tasks: &mut Tasks) {
    app.navigate(tasks, Route::Reports);
    app.set_status(format!(
        "Report: {} {}",
        super::util::month_name(app.report_month),
        app.report_year
    ));
}

fn out_of_range(app: &mut App) {
    let range = app.year_range();
    app.set_status(format!(
        "Pick a month between {} and {}",
        range.start(),
        range.end()
    ));
}

fn cmd_month(args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    let Some((year, month)) = parse_period(args, app.report_year) else {
        app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-03)");
        return Ok(());
    };
    if app.set_period(year, month) {
        show_period(app, tasks);
    } else {
        out_of_range(app);
    }
    Ok(())
}

fn cmd_year(args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    let Ok(year) = args.trim().parse::<i32>() else {
        app.set_status("Usage: :year <YYYY>");
        return Ok(());
    };
    if app.set_period(year, app.report_month) {
        show_period(app, tasks);
    } else {
        out_of_range(app);
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    if app.shift_month(1) {
        show_period(app, tasks);
    } else {
        out_of_range(app);
    }
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    if app.shift_month(-1) {
        show_period(app, tasks);
    } else {
        out_of_range(app);
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, tasks: &mut Tasks) -> anyhow::Result<()> {
    match ExportFormat::parse(args.trim()) {
        Some(format) => app.export(tasks, format),
        None => app.set_status("Usage: :export pdf|excel"),
    }
    Ok(())
}
