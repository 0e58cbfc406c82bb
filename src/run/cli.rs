use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::api::{self, ApiClient};
use crate::config::{paths, Config};
use crate::export;
use crate::forms::{CategoryForm, LoginForm, RegisterForm, TransactionForm};
use crate::models::{Category, Direction, ExportFormat, MonthlyReport, Transaction};
use crate::routes::{self, Guard, Route};
use crate::ui::util::{format_amount, format_signed, month_name, truncate};

const PASSWORD_ENV: &str = "FINANTUI_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "finantui")]
#[command(version)]
#[command(about = "FinanTUI - terminal client for the Gestão Financeira API")]
#[command(after_help = "Run without a command to launch the interactive TUI.")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Log in and save the session
    Login {
        email: String,
        /// Prompted for when omitted
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        name: String,
        email: String,
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Clear the saved session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage categories
    #[command(alias = "c")]
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Manage transactions
    #[command(alias = "t")]
    Transactions {
        #[command(subcommand)]
        command: TransactionCommands,
    },

    /// Print the monthly report (default: current month)
    #[command(alias = "r")]
    Report {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Download the monthly report as PDF or Excel
    Export {
        /// pdf or excel
        #[arg(value_parser = parse_format)]
        format: ExportFormat,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Directory to save into (default: download_dir from config)
        #[arg(long, value_name = "DIR")]
        out: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum CategoryCommands {
    /// List categories
    #[command(alias = "ls")]
    List,
    /// Create a category
    Add {
        name: String,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Rename or re-describe a category
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Delete a category
    Rm { id: i64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum TransactionCommands {
    /// List transactions
    #[command(alias = "ls")]
    List,
    /// Record a transaction
    Add {
        amount: String,
        /// Category name or id
        #[arg(long, short)]
        category: String,
        /// in or out
        #[arg(long = "type", value_parser = parse_direction, default_value = "out")]
        direction: Direction,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Change fields of a transaction
    Edit {
        id: i64,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long, short)]
        category: Option<String>,
        #[arg(long = "type", value_parser = parse_direction)]
        direction: Option<Direction>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Delete a transaction
    Rm { id: i64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Write a default config file (if not present)
    Init,
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    Direction::parse(s).ok_or_else(|| format!("expected 'in' or 'out', got '{s}'"))
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    ExportFormat::parse(s).ok_or_else(|| format!("expected 'pdf' or 'excel', got '{s}'"))
}

/// Config commands run before anything else is set up, so a broken
/// config file can still be located and replaced.
pub(crate) fn as_config(command: &ConfigCommands) -> Result<()> {
    let path = paths::config_path()?;
    match command {
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init => {
            Config::init(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

pub(crate) async fn as_cli(command: Commands, client: &ApiClient, config: &Config) -> Result<()> {
    match command {
        Commands::Login { email, password } => cli_login(client, email, password).await,
        Commands::Register {
            name,
            email,
            password,
        } => cli_register(client, name, email, password).await,
        Commands::Logout => {
            client.session().logout()?;
            println!("Logged out");
            Ok(())
        }
        Commands::Whoami => {
            let user = client
                .session()
                .user()
                .ok_or_else(|| anyhow::anyhow!("Not logged in"))?;
            println!("{} <{}> (id {})", user.display_name(), user.email, user.id);
            Ok(())
        }
        Commands::Categories { command } => {
            ensure_signed_in(client, Route::Categories)?;
            cli_categories(client, command).await
        }
        Commands::Transactions { command } => {
            ensure_signed_in(client, Route::Transactions)?;
            cli_transactions(client, command).await
        }
        Commands::Report { year, month } => {
            ensure_signed_in(client, Route::Reports)?;
            let (year, month) = period_or_today(year, month);
            let report = api::reports::monthly(client, year, month)
                .await
                .map_err(|e| request_failed(e, "Could not load the report"))?;
            print_report(&report);
            Ok(())
        }
        Commands::Export {
            format,
            year,
            month,
            out,
        } => {
            ensure_signed_in(client, Route::Reports)?;
            let (year, month) = period_or_today(year, month);
            let dir = out
                .map(|o| PathBuf::from(shellexpand(&o)))
                .unwrap_or_else(|| config.download_dir());
            let download = api::reports::export(client, year, month, format)
                .await
                .map_err(|e| request_failed(e, "Export failed"))?;
            let path = export::save(&download, &dir)?;
            println!("Saved {}", path.display());
            Ok(())
        }
        Commands::Config { command } => as_config(&command),
    }
}

/// Same rule the TUI applies before showing a protected screen.
fn ensure_signed_in(client: &ApiClient, route: Route) -> Result<()> {
    match routes::protected(route, &client.session().state()) {
        Guard::Render(_) => Ok(()),
        Guard::Loading | Guard::Redirect(_) => {
            anyhow::bail!("Not logged in. Run `finantui login <email>` first.")
        }
    }
}

fn request_failed(err: api::ApiError, what: &str) -> anyhow::Error {
    tracing::warn!(status = ?err.status(), error = %err, "{what}");
    if err.is_unauthorized() {
        anyhow::anyhow!("Session expired. Run `finantui login <email>` again.")
    } else {
        let detail = err.server_message().map(str::to_string).unwrap_or_else(|| err.to_string());
        anyhow::anyhow!("{what}: {detail}")
    }
}

fn period_or_today(year: Option<i32>, month: Option<u32>) -> (i32, u32) {
    let today = Local::now().date_naive();
    (year.unwrap_or(today.year()), month.unwrap_or(today.month()))
}

fn read_password(given: Option<String>) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

// ── Auth ─────────────────────────────────────────────────────

async fn cli_login(client: &ApiClient, email: String, password: Option<String>) -> Result<()> {
    let form = LoginForm {
        email,
        password: read_password(password)?,
    };
    let request = form.validate()?;
    let session = client.session();
    let user = session
        .login(client, &request.email, &request.password)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Login failed")))?;
    println!("Logged in as {} <{}>", user.display_name(), user.email);
    Ok(())
}

async fn cli_register(
    client: &ApiClient,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let form = RegisterForm {
        name,
        email,
        password: read_password(password)?,
    };
    let request = form.validate()?;
    let user = client
        .session()
        .register(client, &request.name, &request.email, &request.password)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Registration failed")))?;
    println!("Account created. Logged in as {}", user.display_name());
    Ok(())
}

// ── Categories ───────────────────────────────────────────────

async fn cli_categories(client: &ApiClient, command: CategoryCommands) -> Result<()> {
    match command {
        CategoryCommands::List => {
            let categories = list_categories(client).await?;
            print_categories(&categories);
        }
        CategoryCommands::Add { name, description } => {
            let form = CategoryForm {
                name,
                description: description.unwrap_or_default(),
            };
            let request = form.validate()?;
            let created = api::categories::create(client, &request)
                .await
                .map_err(|e| request_failed(e, "Could not save"))?;
            println!("Created category {} ({})", created.name, created.id);
        }
        CategoryCommands::Edit {
            id,
            name,
            description,
        } => {
            let categories = list_categories(client).await?;
            let existing = Category::find_by_id(&categories, id)
                .ok_or_else(|| anyhow::anyhow!("Category {id} not found"))?;
            let mut form = CategoryForm::from_category(existing);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(description) = description {
                form.description = description;
            }
            let request = form.validate()?;
            let updated = api::categories::update(client, id, &request)
                .await
                .map_err(|e| request_failed(e, "Could not save"))?;
            println!("Updated category {} ({})", updated.name, updated.id);
        }
        CategoryCommands::Rm { id } => {
            api::categories::delete(client, id)
                .await
                .map_err(|e| request_failed(e, "Could not delete"))?;
            println!("Deleted category {id}");
        }
    }
    Ok(())
}

async fn list_categories(client: &ApiClient) -> Result<Vec<Category>> {
    api::categories::list(client)
        .await
        .map_err(|e| request_failed(e, "Could not load categories"))
}

fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories");
        return;
    }
    println!("{:<6} {:<24} Description", "ID", "Name");
    println!("{}", "─".repeat(60));
    for c in categories {
        println!(
            "{:<6} {:<24} {}",
            c.id,
            truncate(&c.name, 24),
            c.description.as_deref().unwrap_or("")
        );
    }
}

/// Accepts a category id or a case-insensitive name.
pub(crate) fn resolve_category(categories: &[Category], key: &str) -> Result<i64> {
    if let Ok(id) = key.trim().parse::<i64>() {
        if Category::find_by_id(categories, id).is_some() {
            return Ok(id);
        }
    }
    Category::find_by_name(categories, key)
        .map(|c| c.id)
        .ok_or_else(|| anyhow::anyhow!("Category '{key}' not found. See `finantui categories list`."))
}

// ── Transactions ─────────────────────────────────────────────

async fn cli_transactions(client: &ApiClient, command: TransactionCommands) -> Result<()> {
    match command {
        TransactionCommands::List => {
            let transactions = api::transactions::list(client)
                .await
                .map_err(|e| request_failed(e, "Could not load transactions"))?;
            print_transactions(&transactions);
        }
        TransactionCommands::Add {
            amount,
            category,
            direction,
            date,
            description,
        } => {
            let categories = list_categories(client).await?;
            let mut form = TransactionForm::new(Local::now().date_naive());
            form.amount = amount;
            form.direction = direction;
            form.category_id = Some(resolve_category(&categories, &category)?);
            if let Some(date) = date {
                form.date = date;
            }
            form.description = description.unwrap_or_default();
            let request = form.validate()?;
            let created = api::transactions::create(client, &request)
                .await
                .map_err(|e| request_failed(e, "Could not save"))?;
            println!(
                "Added transaction {}: {} on {}",
                created.id,
                format_signed(created.amount, created.direction),
                created.date
            );
        }
        TransactionCommands::Edit {
            id,
            amount,
            category,
            direction,
            date,
            description,
        } => {
            let (transactions, categories) = tokio::try_join!(
                api::transactions::list(client),
                api::categories::list(client)
            )
            .map_err(|e| request_failed(e, "Could not load transactions"))?;
            let existing = transactions
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| anyhow::anyhow!("Transaction {id} not found"))?;
            let mut form = TransactionForm::from_transaction(existing);
            if let Some(amount) = amount {
                form.amount = amount;
            }
            if let Some(category) = category {
                form.category_id = Some(resolve_category(&categories, &category)?);
            }
            if let Some(direction) = direction {
                form.direction = direction;
            }
            if let Some(date) = date {
                form.date = date;
            }
            if let Some(description) = description {
                form.description = description;
            }
            let request = form.validate()?;
            api::transactions::update(client, id, &request)
                .await
                .map_err(|e| request_failed(e, "Could not save"))?;
            println!("Updated transaction {id}");
        }
        TransactionCommands::Rm { id } => {
            api::transactions::delete(client, id)
                .await
                .map_err(|e| request_failed(e, "Could not delete"))?;
            println!("Deleted transaction {id}");
        }
    }
    Ok(())
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions");
        return;
    }
    println!(
        "{:<6} {:<10} {:>16} {:<18} Description",
        "ID", "Date", "Amount", "Category"
    );
    println!("{}", "─".repeat(72));
    for t in transactions {
        println!(
            "{:<6} {:<10} {:>16} {:<18} {}",
            t.id,
            t.date.format("%Y-%m-%d"),
            format_signed(t.amount, t.direction),
            truncate(&t.category_name, 18),
            t.description_or_dash()
        );
    }
}

// ── Reports ──────────────────────────────────────────────────

fn print_report(report: &MonthlyReport) {
    println!("FinanTUI · {} {}", month_name(report.month), report.year);
    println!("{}", "─".repeat(40));
    println!("  Income:    {}", format_amount(report.total_inflow));
    println!("  Expenses:  {}", format_amount(report.total_outflow));
    println!("  Balance:   {}", format_amount(report.balance));

    if report.is_empty() {
        println!();
        println!("No transactions this month.");
        return;
    }

    for direction in [Direction::Inflow, Direction::Outflow] {
        let mut summaries = report.summaries(direction).peekable();
        if summaries.peek().is_none() {
            continue;
        }
        println!();
        println!("{direction} by category:");
        for s in summaries {
            println!(
                "  {:<24} {}",
                truncate(&s.category_name, 24),
                format_amount(s.total)
            );
        }
    }

    if !report.transactions.is_empty() {
        println!();
        print_transactions(&report.transactions);
    }
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
