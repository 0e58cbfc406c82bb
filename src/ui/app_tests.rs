#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use ratatui::{backend::TestBackend, Terminal};
use serde_json::json;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::app::*;
use super::commands::{handle_command, levenshtein, parse_period};
use super::form::FormKind;
use super::screens::dashboard::EMPTY_STATE;
use super::tasks::{AppEvent, Payload, Tasks};
use crate::api::ApiClient;
use crate::config::Config;
use crate::models::LoginResponse;
use crate::routes::{Guard, Navigator, Route};
use crate::session::{SessionState, SessionStore};
use crate::storage::MemoryStorage;

struct Harness {
    app: App,
    tasks: Tasks,
    events: UnboundedReceiver<AppEvent>,
    redirects: UnboundedReceiver<Route>,
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn harness(server: &MockServer, signed_in: bool) -> Harness {
    let session = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
    session.hydrate().unwrap();
    if signed_in {
        session
            .establish(&LoginResponse {
                token: "tok-1".into(),
                scheme: Some("Bearer".into()),
                user_id: 7,
                email: "ana@example.com".into(),
                name: "Ana".into(),
            })
            .unwrap();
    }
    let (navigator, redirects) = Navigator::channel();
    let config = Config {
        base_url: server.uri(),
        ..Config::default()
    };
    let client = Arc::new(ApiClient::new(&config, session, navigator).unwrap());
    let (tasks, events) = Tasks::new(Handle::current(), client, std::env::temp_dir());
    Harness {
        app: App::with_today(today()),
        tasks,
        events,
        redirects,
    }
}

async fn next_event(events: &mut UnboundedReceiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap()
}

fn empty_report() -> serde_json::Value {
    json!({
        "ano": 2025,
        "mes": 3,
        "totalEntradas": 0.0,
        "totalSaidas": 0.0,
        "saldo": 0.0,
        "porCategoria": [],
        "transacoes": []
    })
}

fn categories_body() -> serde_json::Value {
    json!([
        { "id": 3, "nome": "Mercado" },
        { "id": 8, "nome": "Salário", "descricao": "CLT" }
    ])
}

fn screen_text(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
    terminal.draw(|f| super::render::render(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

// ── Mounting and stale results ──────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_dashboard_empty_month_renders_empty_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/relatorios/mensal"))
        .and(query_param("ano", "2025"))
        .and(query_param("mes", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_report()))
        .expect(1)
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Dashboard);
    assert_eq!(h.app.guard, Guard::Render(Route::Dashboard));
    assert!(screen_text(&h.app).contains("Loading"));

    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);

    let report = h.app.dashboard.loaded().unwrap();
    assert!(report.is_empty());
    let text = screen_text(&h.app);
    assert!(text.contains(EMPTY_STATE));
    assert!(text.contains("Ana"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stale_result_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body()))
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Categories);
    let old_mount = h.tasks.mount_id();
    h.app.navigate(&mut h.tasks, Route::Reports);
    assert_ne!(old_mount, h.tasks.mount_id());

    h.app.apply(
        &mut h.tasks,
        AppEvent {
            mount: old_mount,
            payload: Payload::Categories(Ok(Vec::new())),
        },
    );
    assert_eq!(h.app.categories, ViewState::Loading);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_is_cancelled_when_view_changes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/relatorios/mensal"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(empty_report())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body()))
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Dashboard);
    h.app.navigate(&mut h.tasks, Route::Categories);

    let event = next_event(&mut h.events).await;
    assert!(matches!(event.payload, Payload::Categories(Ok(_))));
    h.app.apply(&mut h.tasks, event);
    assert_eq!(h.app.categories.loaded().unwrap().len(), 2);

    let late = tokio::time::timeout(Duration::from_millis(600), h.events.recv()).await;
    assert!(late.is_err(), "cancelled fetch still delivered a result");
    assert_eq!(h.app.dashboard, ViewState::Loading);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_fetch_shows_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Categories);
    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);

    assert_eq!(h.app.categories, ViewState::Failed(CATEGORIES_FAILED));
    assert!(screen_text(&h.app).contains(CATEGORIES_FAILED));
    assert!(h.redirects.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_fetch_redirects_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Categories);
    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);

    assert_eq!(h.redirects.try_recv().unwrap(), Route::Login);
    assert_eq!(h.tasks.session().state(), SessionState::Anonymous);

    h.app.navigate(&mut h.tasks, Route::Login);
    assert_eq!(h.app.route, Route::Login);
    assert_eq!(h.app.input_mode, InputMode::Form);
    assert!(h.app.user.is_none());
}

// ── Guards ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_protected_route_redirects_when_anonymous() {
    let server = MockServer::start().await;
    let mut h = harness(&server, false);

    h.app.navigate(&mut h.tasks, Route::Transactions);
    assert_eq!(h.app.route, Route::Login);
    assert_eq!(h.app.guard, Guard::Render(Route::Login));
    assert_eq!(h.app.form.as_ref().unwrap().kind, FormKind::Login);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_then_protected_route_goes_to_login() {
    let server = MockServer::start().await;
    let mut h = harness(&server, true);

    handle_command("logout", &mut h.app, &mut h.tasks).unwrap();
    assert_eq!(h.app.route, Route::Login);
    assert_eq!(h.app.status_message, "Logged out");

    h.app.navigate(&mut h.tasks, Route::Reports);
    assert_eq!(h.app.route, Route::Login);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_signed_in_user_skips_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/relatorios/mensal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_report()))
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Register);
    assert_eq!(h.app.route, Route::Dashboard);
    assert!(h.app.form.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_uninitialized_session_shows_loading() {
    let server = MockServer::start().await;
    let session = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
    let (navigator, _redirects) = Navigator::channel();
    let config = Config {
        base_url: server.uri(),
        ..Config::default()
    };
    let client = Arc::new(ApiClient::new(&config, session, navigator).unwrap());
    let (mut tasks, _events) = Tasks::new(Handle::current(), client, std::env::temp_dir());
    let mut app = App::with_today(today());

    app.navigate(&mut tasks, Route::Dashboard);
    assert_eq!(app.guard, Guard::Loading);
    assert!(screen_text(&app).contains("Loading"));
}

// ── Forms ────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_category_name_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Categories);
    h.app.open_new();
    h.app.submit_form(&h.tasks);

    let form = h.app.form.as_ref().unwrap();
    assert_eq!(form.error.as_deref(), Some("Name is required"));
    assert!(!form.submitting);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transaction_form_rejects_bad_input_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/transacoes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/transacoes"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Transactions);
    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);

    h.app.open_new();
    let form = h.app.form.as_mut().unwrap();
    assert_eq!(form.kind, FormKind::NewTransaction);
    form.fields[1].value = "0".into();
    h.app.submit_form(&h.tasks);
    assert_eq!(
        h.app.form.as_ref().unwrap().error.as_deref(),
        Some("Amount must be greater than zero")
    );

    let form = h.app.form.as_mut().unwrap();
    form.fields[1].value = "-5".into();
    h.app.submit_form(&h.tasks);
    assert_eq!(
        h.app.form.as_ref().unwrap().error.as_deref(),
        Some("Amount must be greater than zero")
    );

    let form = h.app.form.as_mut().unwrap();
    form.fields[1].value = "12.50".into();
    h.app.submit_form(&h.tasks);
    let form = h.app.form.as_ref().unwrap();
    assert_eq!(form.error.as_deref(), Some("Select a category"));
    assert!(!form.submitting);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_transaction_needs_a_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/transacoes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Transactions);
    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);

    h.app.open_new();
    assert!(h.app.form.is_none());
    assert_eq!(h.app.status_message, "Create a category first (:cat-add)");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_saved_category_closes_form_and_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/categorias"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": 9, "nome": "Lazer" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Categories);
    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);

    handle_command("cat-add Lazer", &mut h.app, &mut h.tasks).unwrap();
    h.app.submit_form(&h.tasks);
    assert!(h.app.form.as_ref().unwrap().submitting);

    // A second Enter while the request is in flight is ignored.
    h.app.submit_form(&h.tasks);

    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);
    assert!(h.app.form.is_none());
    assert_eq!(h.app.input_mode, InputMode::Normal);
    assert_eq!(h.app.status_message, "Created category: Lazer");

    let event = next_event(&mut h.events).await;
    assert!(matches!(event.payload, Payload::Categories(Ok(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_login_keeps_form_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "erro": "Credenciais inválidas" })),
        )
        .mount(&server)
        .await;

    let mut h = harness(&server, false);
    h.app.navigate(&mut h.tasks, Route::Login);
    let form = h.app.form.as_mut().unwrap();
    form.fields[0].value = "ana@example.com".into();
    form.fields[1].value = "wrong-pass".into();
    h.app.submit_form(&h.tasks);

    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);

    assert_eq!(h.app.route, Route::Login);
    let form = h.app.form.as_ref().unwrap();
    assert_eq!(form.error.as_deref(), Some("Credenciais inválidas"));
    assert!(!form.submitting);
    assert!(h.redirects.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_lands_on_dashboard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-9",
            "tipo": "Bearer",
            "usuarioId": 7,
            "email": "ana@example.com",
            "nome": "Ana"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/relatorios/mensal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_report()))
        .mount(&server)
        .await;

    let mut h = harness(&server, false);
    h.app.navigate(&mut h.tasks, Route::Login);
    let form = h.app.form.as_mut().unwrap();
    form.fields[0].value = "ana@example.com".into();
    form.fields[1].value = "secret1".into();
    h.app.submit_form(&h.tasks);

    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);

    assert_eq!(h.app.route, Route::Dashboard);
    assert_eq!(h.app.status_message, "Welcome, Ana");
    assert_eq!(h.app.user.as_ref().unwrap().id, 7);
    assert!(h.tasks.session().is_authenticated());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_asks_for_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body()))
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.app.navigate(&mut h.tasks, Route::Categories);
    let event = next_event(&mut h.events).await;
    h.app.apply(&mut h.tasks, event);

    h.app.category_index = 1;
    h.app.request_delete();
    assert_eq!(h.app.input_mode, InputMode::Confirm);
    assert_eq!(h.app.confirm_message, "Delete category 'Salário'?");
    assert_eq!(
        h.app.pending_action,
        Some(PendingAction::DeleteCategory {
            id: 8,
            name: "Salário".into()
        })
    );

    h.app.cancel_confirm();
    assert!(h.app.pending_action.is_none());
    assert_eq!(h.app.input_mode, InputMode::Normal);
}

// ── Commands and report period ───────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_command_suggests_closest() {
    let server = MockServer::start().await;
    let mut h = harness(&server, true);
    handle_command("dashbord", &mut h.app, &mut h.tasks).unwrap();
    assert_eq!(
        h.app.status_message,
        "Unknown command: :dashbord. Did you mean :dashboard?"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_go_resolves_paths_through_guards() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/relatorios/mensal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_report()))
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    handle_command("go /categorias", &mut h.app, &mut h.tasks).unwrap();
    assert_eq!(h.app.route, Route::Categories);

    handle_command("go /registrar", &mut h.app, &mut h.tasks).unwrap();
    assert_eq!(h.app.route, Route::Dashboard);
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("logout", "logout"), 0);
    assert_eq!(levenshtein("reprts", "reports"), 1);
}

#[test]
fn test_parse_period() {
    assert_eq!(parse_period("2024-03", 2025), Some((2024, 3)));
    assert_eq!(parse_period("2024-3", 2025), Some((2024, 3)));
    assert_eq!(parse_period("7", 2025), Some((2025, 7)));
    assert_eq!(parse_period("13", 2025), None);
    assert_eq!(parse_period("2024-00", 2025), None);
    assert_eq!(parse_period("march", 2025), None);
}

#[test]
fn test_period_stays_within_year_range() {
    let mut app = App::with_today(today());
    assert_eq!(app.year_range(), 2023..=2027);
    assert_eq!((app.report_year, app.report_month), (2025, 3));

    assert!(!app.set_period(2028, 1));
    assert!(!app.set_period(2025, 13));
    assert!(app.set_period(2027, 12));
    assert!(!app.shift_month(1));
    assert_eq!((app.report_year, app.report_month), (2027, 12));

    assert!(app.set_period(2023, 1));
    assert!(!app.shift_month(-1));
    assert_eq!((app.report_year, app.report_month), (2023, 1));
}

#[test]
fn test_shift_month_crosses_years() {
    let mut app = App::with_today(today());
    assert!(app.set_period(2024, 12));
    assert!(app.shift_month(1));
    assert_eq!((app.report_year, app.report_month), (2025, 1));
    assert!(app.shift_month(-1));
    assert_eq!((app.report_year, app.report_month), (2024, 12));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_only_on_reports() {
    let server = MockServer::start().await;
    let mut h = harness(&server, true);
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body()))
        .mount(&server)
        .await;
    h.app.navigate(&mut h.tasks, Route::Categories);
    handle_command("export pdf", &mut h.app, &mut h.tasks).unwrap();
    assert!(!h.app.exporting);
    assert_eq!(
        h.app.status_message,
        "Exports are available on the Reports screen"
    );
}
