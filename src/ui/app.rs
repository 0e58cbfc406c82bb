use chrono::{Datelike, Local, NaiveDate};

use super::form::{FormKind, FormState};
use super::tasks::{AppEvent, Payload, Tasks};
use crate::api::{self, ApiError};
use crate::models::*;
use crate::routes::{self, Guard, Route};

pub(crate) const DASHBOARD_FAILED: &str = "Could not load the dashboard.";
pub(crate) const TRANSACTIONS_FAILED: &str = "Could not load transactions.";
pub(crate) const CATEGORIES_FAILED: &str = "Could not load categories.";
pub(crate) const REPORT_FAILED: &str = "Could not load the report.";
const SAVE_FAILED: &str = "Could not save. Please try again.";
const DELETE_FAILED: &str = "Could not delete. Please try again.";
const EXPORT_FAILED: &str = "Export failed. Please try again.";
const LOGIN_FAILED: &str = "Login failed. Check your email and password.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Years selectable around the current one on the reports screen.
pub(crate) const YEAR_SPAN: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Form => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, description: String },
    DeleteCategory { id: i64, name: String },
}

/// Remote data owned by one view.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewState<T> {
    Loading,
    Loaded(T),
    Failed(&'static str),
}

impl<T> ViewState<T> {
    pub(crate) fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            _ => None,
        }
    }
}

fn settle<T>(result: Result<T, ApiError>, failure: &'static str) -> ViewState<T> {
    match result {
        Ok(v) => ViewState::Loaded(v),
        Err(e) => {
            tracing::warn!(error = %e, "{failure}");
            ViewState::Failed(failure)
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) route: Route,
    pub(crate) guard: Guard,
    pub(crate) user: Option<User>,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,

    // Dashboard
    pub(crate) dashboard: ViewState<MonthlyReport>,

    // Transactions
    pub(crate) transactions: ViewState<Vec<Transaction>>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,

    // Categories (also feeds the transaction form)
    pub(crate) categories: ViewState<Vec<Category>>,
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,

    // Reports
    pub(crate) report_year: i32,
    pub(crate) report_month: u32,
    pub(crate) report: ViewState<MonthlyReport>,
    pub(crate) report_scroll: usize,
    pub(crate) exporting: bool,

    pub(crate) form: Option<FormState>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self::with_today(Local::now().date_naive())
    }

    pub(crate) fn with_today(today: NaiveDate) -> Self {
        Self {
            running: true,
            route: Route::Dashboard,
            guard: Guard::Loading,
            user: None,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today,

            dashboard: ViewState::Loading,

            transactions: ViewState::Loading,
            transaction_index: 0,
            transaction_scroll: 0,

            categories: ViewState::Loading,
            category_index: 0,
            category_scroll: 0,

            report_year: today.year(),
            report_month: today.month(),
            report: ViewState::Loading,
            report_scroll: 0,
            exporting: false,

            form: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    // ── Navigation ───────────────────────────────────────────

    /// Runs the guard for `route`, follows a redirect if there is one, and
    /// mounts whatever ends up on screen. The previous view's guard is
    /// cancelled either way.
    pub(crate) fn navigate(&mut self, tasks: &mut Tasks, route: Route) {
        let state = tasks.session().state();
        let (target, guard) = match routes::resolve(route, &state) {
            Guard::Redirect(to) => (to, routes::resolve(to, &state)),
            guard => (route, guard),
        };
        if target != route {
            tracing::debug!(from = route.path(), to = target.path(), "Guard redirect");
        }

        tasks.remount();
        self.route = target;
        self.guard = guard;
        self.user = tasks.session().user();
        self.form = None;
        self.pending_action = None;
        self.confirm_message.clear();
        self.exporting = false;
        self.input_mode = InputMode::Normal;

        if let Guard::Render(route) = guard {
            match route {
                Route::Login => {
                    self.form = Some(FormState::login());
                    self.input_mode = InputMode::Form;
                }
                Route::Register => {
                    self.form = Some(FormState::register());
                    self.input_mode = InputMode::Form;
                }
                Route::Dashboard => {
                    self.dashboard = ViewState::Loading;
                }
                Route::Transactions => {
                    self.transactions = ViewState::Loading;
                    self.transaction_index = 0;
                    self.transaction_scroll = 0;
                }
                Route::Categories => {
                    self.categories = ViewState::Loading;
                    self.category_index = 0;
                    self.category_scroll = 0;
                }
                Route::Reports => {
                    self.report = ViewState::Loading;
                    self.report_scroll = 0;
                }
            }
            self.load(tasks);
        }
    }

    /// Fetches the data of the mounted view under its current guard.
    pub(crate) fn load(&self, tasks: &Tasks) {
        match self.route {
            Route::Login | Route::Register => {}
            Route::Dashboard => {
                let (year, month) = (self.today.year(), self.today.month());
                tasks.fetch(move |client| async move {
                    Payload::Dashboard(api::reports::monthly(&client, year, month).await)
                });
            }
            Route::Transactions => {
                tasks.fetch(|client| async move {
                    Payload::Transactions(tokio::try_join!(
                        api::transactions::list(&client),
                        api::categories::list(&client)
                    ))
                });
            }
            Route::Categories => {
                tasks.fetch(|client| async move {
                    Payload::Categories(api::categories::list(&client).await)
                });
            }
            Route::Reports => {
                let (year, month) = (self.report_year, self.report_month);
                tasks.fetch(move |client| async move {
                    Payload::Report(api::reports::monthly(&client, year, month).await)
                });
            }
        }
    }

    /// Same view, fresh data.
    pub(crate) fn refresh(&mut self, tasks: &mut Tasks) {
        self.navigate(tasks, self.route);
    }

    // ── Background results ───────────────────────────────────

    pub(crate) fn apply(&mut self, tasks: &mut Tasks, event: AppEvent) {
        if !tasks.is_current(&event) {
            tracing::debug!(
                mount = event.mount,
                current = tasks.mount_id(),
                "Discarding result for a view that is gone"
            );
            return;
        }

        match event.payload {
            Payload::Dashboard(result) => {
                self.dashboard = settle(result, DASHBOARD_FAILED);
            }
            Payload::Transactions(result) => match settle(result, TRANSACTIONS_FAILED) {
                ViewState::Loaded((transactions, categories)) => {
                    self.clamp_transaction_cursor(transactions.len());
                    self.transactions = ViewState::Loaded(transactions);
                    self.categories = ViewState::Loaded(categories);
                }
                ViewState::Failed(msg) => self.transactions = ViewState::Failed(msg),
                ViewState::Loading => {}
            },
            Payload::Categories(result) => {
                self.categories = settle(result, CATEGORIES_FAILED);
                let len = self.categories.loaded().map_or(0, Vec::len);
                if self.category_index >= len {
                    self.category_index = len.saturating_sub(1);
                }
            }
            Payload::Report(result) => {
                self.report = settle(result, REPORT_FAILED);
            }
            Payload::Saved { message, result } => match result {
                Ok(()) => {
                    self.close_form();
                    self.set_status(message);
                    self.load(tasks);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Save failed");
                    if let Some(form) = self.form.as_mut() {
                        form.submitting = false;
                        form.error = Some(SAVE_FAILED.into());
                    }
                }
            },
            Payload::Deleted { message, result } => match result {
                Ok(()) => {
                    self.set_status(message);
                    self.load(tasks);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Delete failed");
                    self.set_status(DELETE_FAILED);
                }
            },
            Payload::Exported(result) => {
                self.exporting = false;
                match result {
                    Ok(path) => self.set_status(format!("Saved {}", path.display())),
                    Err(e) => {
                        tracing::warn!(error = %e, "Export failed");
                        self.set_status(EXPORT_FAILED);
                    }
                }
            }
            Payload::Authenticated(result) => match result {
                Ok(user) => {
                    self.navigate(tasks, Route::Dashboard);
                    self.set_status(format!("Welcome, {}", user.display_name()));
                }
                Err(msg) => {
                    if let Some(form) = self.form.as_mut() {
                        form.submitting = false;
                        form.error = Some(msg);
                    }
                }
            },
        }
    }

    fn clamp_transaction_cursor(&mut self, len: usize) {
        if self.transaction_index >= len {
            self.transaction_index = len.saturating_sub(1);
        }
        if self.transaction_scroll > self.transaction_index {
            self.transaction_scroll = self.transaction_index;
        }
    }

    // ── Forms ────────────────────────────────────────────────

    pub(crate) fn open_form(&mut self, form: FormState) {
        self.form = Some(form);
        self.input_mode = InputMode::Form;
    }

    pub(crate) fn close_form(&mut self) {
        if self.form.as_ref().is_some_and(|f| !f.kind.is_auth()) {
            self.form = None;
            self.input_mode = InputMode::Normal;
        }
    }

    /// Opens the create form for whatever the current screen lists.
    pub(crate) fn open_new(&mut self) {
        match self.route {
            Route::Categories => self.open_form(FormState::category(None)),
            Route::Transactions => {
                let categories = self.categories.loaded().cloned().unwrap_or_default();
                if categories.is_empty() {
                    self.set_status("Create a category first (:cat-add)");
                    return;
                }
                self.open_form(FormState::transaction(None, &categories, self.today));
            }
            _ => {}
        }
    }

    /// Opens the edit form for the selected row.
    pub(crate) fn open_edit(&mut self) {
        match self.route {
            Route::Categories => {
                let selected = self.selected_category().cloned();
                if let Some(category) = selected {
                    self.open_form(FormState::category(Some(&category)));
                }
            }
            Route::Transactions => {
                let selected = self.selected_transaction().cloned();
                if let Some(txn) = selected {
                    let categories = self.categories.loaded().cloned().unwrap_or_default();
                    self.open_form(FormState::transaction(Some(&txn), &categories, self.today));
                }
            }
            _ => {}
        }
    }

    /// Validates the open form and, if it passes, sends it.
    pub(crate) fn submit_form(&mut self, tasks: &Tasks) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }

        let outcome = match form.kind {
            FormKind::Login => form.as_login().validate().map(|req| {
                tasks.submit(move |client| async move {
                    let session = std::sync::Arc::clone(client.session());
                    Payload::Authenticated(
                        session
                            .login(&client, &req.email, &req.password)
                            .await
                            .map_err(|e| e.user_message(LOGIN_FAILED)),
                    )
                });
            }),
            FormKind::Register => form.as_register().validate().map(|req| {
                tasks.submit(move |client| async move {
                    let session = std::sync::Arc::clone(client.session());
                    Payload::Authenticated(
                        session
                            .register(&client, &req.name, &req.email, &req.password)
                            .await
                            .map_err(|e| e.user_message(REGISTER_FAILED)),
                    )
                });
            }),
            FormKind::NewCategory => form.as_category().validate().map(|req| {
                tasks.submit(move |client| async move {
                    let message = format!("Created category: {}", req.name);
                    let result = api::categories::create(&client, &req).await.map(drop);
                    Payload::Saved { message, result }
                });
            }),
            FormKind::EditCategory(id) => form.as_category().validate().map(|req| {
                tasks.submit(move |client| async move {
                    let message = format!("Updated category: {}", req.name);
                    let result = api::categories::update(&client, id, &req).await.map(drop);
                    Payload::Saved { message, result }
                });
            }),
            FormKind::NewTransaction => form.as_transaction().validate().map(|req| {
                tasks.submit(move |client| async move {
                    let result = api::transactions::create(&client, &req).await.map(drop);
                    Payload::Saved {
                        message: "Transaction added".into(),
                        result,
                    }
                });
            }),
            FormKind::EditTransaction(id) => form.as_transaction().validate().map(|req| {
                tasks.submit(move |client| async move {
                    let result = api::transactions::update(&client, id, &req).await.map(drop);
                    Payload::Saved {
                        message: "Transaction updated".into(),
                        result,
                    }
                });
            }),
        };

        match outcome {
            Ok(()) => {
                form.error = None;
                form.submitting = true;
            }
            Err(e) => form.error = Some(e.to_string()),
        }
    }

    // ── Deletes ──────────────────────────────────────────────

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.transactions
            .loaded()
            .and_then(|list| list.get(self.transaction_index))
    }

    pub(crate) fn selected_category(&self) -> Option<&Category> {
        self.categories
            .loaded()
            .and_then(|list| list.get(self.category_index))
    }

    /// Asks for confirmation before deleting the selected row.
    pub(crate) fn request_delete(&mut self) {
        let action = match self.route {
            Route::Transactions => self.selected_transaction().map(|t| {
                PendingAction::DeleteTransaction {
                    id: t.id,
                    description: t.description_or_dash().to_string(),
                }
            }),
            Route::Categories => {
                self.selected_category()
                    .map(|c| PendingAction::DeleteCategory {
                        id: c.id,
                        name: c.name.clone(),
                    })
            }
            _ => None,
        };
        let Some(action) = action else {
            return;
        };
        self.confirm_message = match &action {
            PendingAction::DeleteTransaction { description, .. } => {
                format!("Delete transaction '{description}'?")
            }
            PendingAction::DeleteCategory { name, .. } => format!("Delete category '{name}'?"),
        };
        self.pending_action = Some(action);
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn confirm(&mut self, tasks: &Tasks) {
        if let Some(action) = self.pending_action.take() {
            match action {
                PendingAction::DeleteTransaction { id, description } => {
                    tasks.submit(move |client| async move {
                        Payload::Deleted {
                            message: format!("Deleted: {description}"),
                            result: api::transactions::delete(&client, id).await,
                        }
                    });
                }
                PendingAction::DeleteCategory { id, name } => {
                    tasks.submit(move |client| async move {
                        Payload::Deleted {
                            message: format!("Deleted category: {name}"),
                            result: api::categories::delete(&client, id).await,
                        }
                    });
                }
            }
        }
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
    }

    pub(crate) fn cancel_confirm(&mut self) {
        self.pending_action = None;
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        self.set_status("Cancelled");
    }

    // ── Reports ──────────────────────────────────────────────

    pub(crate) fn year_range(&self) -> std::ops::RangeInclusive<i32> {
        let year = self.today.year();
        (year - YEAR_SPAN)..=(year + YEAR_SPAN)
    }

    /// Moves the report period; returns false when it would leave the
    /// selectable range.
    pub(crate) fn set_period(&mut self, year: i32, month: u32) -> bool {
        if !self.year_range().contains(&year) || !(1..=12).contains(&month) {
            return false;
        }
        self.report_year = year;
        self.report_month = month;
        true
    }

    pub(crate) fn shift_month(&mut self, delta: i32) -> bool {
        let index = self.report_year * 12 + self.report_month as i32 - 1 + delta;
        self.set_period(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
    }

    pub(crate) fn export(&mut self, tasks: &Tasks, format: ExportFormat) {
        if self.route != Route::Reports {
            self.set_status("Exports are available on the Reports screen");
            return;
        }
        if self.exporting {
            return;
        }
        self.exporting = true;
        let (year, month) = (self.report_year, self.report_month);
        let dir = tasks.download_dir().clone();
        self.set_status(format!("Exporting {format}…"));
        tasks.submit(move |client| async move {
            let result = match api::reports::export(&client, year, month, format).await {
                Ok(download) => {
                    crate::export::save(&download, &dir).map_err(|e| format!("{e:#}"))
                }
                Err(e) => Err(e.to_string()),
            };
            Payload::Exported(result)
        });
    }
}
