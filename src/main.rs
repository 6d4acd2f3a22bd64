use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use guest_search::config::AppConfig;
use guest_search::error::AppError;
use guest_search::roster::{
    filter_table, FilterQuery, GuestListImporter, GuestTable, SessionState,
};
use guest_search::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

type SessionMap = HashMap<String, SessionState>;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    sessions: Arc<Mutex<SessionMap>>,
}

impl AppState {
    fn sessions(&self) -> MutexGuard<'_, SessionMap> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "Guest Search",
    about = "Normalize guest-list uploads and serve seat lookup",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Load a guest list from disk and run a one-shot search
    Search(SearchArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Guest list CSV file
    csv: PathBuf,
    /// Substring to match against guest names
    #[arg(long)]
    name: Option<String>,
    /// Substring to match against organizations
    #[arg(long)]
    org: Option<String>,
    /// Substring to match against seat numbers
    #[arg(long)]
    seat: Option<String>,
    /// Print the normalized column headers before the results
    #[arg(long)]
    list_columns: bool,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    columns: Vec<String>,
    canonical_fields: Vec<&'static str>,
    guests: usize,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    columns: Vec<String>,
    canonical_fields: Vec<&'static str>,
    total: usize,
    matched: usize,
    rows: Vec<Vec<String>>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Search(args) => run_search(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        sessions: Arc::new(Mutex::new(SessionMap::new())),
    };

    let app = app_router(state)
        .layer(DefaultBodyLimit::max(config.upload.max_upload_bytes))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "guest search service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/sessions/:session_id/guest-list",
            post(upload_endpoint),
        )
        .route("/api/v1/sessions/:session_id/search", post(search_endpoint))
        .route("/api/v1/sessions/:session_id", delete(reset_endpoint))
        .with_state(state)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn upload_endpoint(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<Json<UploadResponse>, AppError> {
    let table = GuestListImporter::from_reader(body.as_ref())?;
    let response = UploadResponse {
        columns: table.columns().to_vec(),
        canonical_fields: field_labels(&table),
        guests: table.len(),
    };

    info!(
        session = %session_id,
        guests = response.guests,
        columns = response.columns.len(),
        "guest list loaded"
    );

    state
        .sessions()
        .entry(session_id)
        .or_default()
        .load(table);

    Ok(Json(response))
}

async fn search_endpoint(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(query): Json<FilterQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let mut sessions = state.sessions();
    let session = sessions
        .get_mut(&session_id)
        .ok_or(AppError::SessionNotLoaded)?;

    let total = session.table().map(GuestTable::len).unwrap_or(0);
    let result = session.search(query)?;

    Ok(Json(SearchResponse {
        columns: result.columns().to_vec(),
        canonical_fields: field_labels(&result),
        total,
        matched: result.len(),
        rows: result.rows().to_vec(),
    }))
}

async fn reset_endpoint(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> StatusCode {
    state.sessions().remove(&session_id);
    StatusCode::NO_CONTENT
}

fn field_labels(table: &GuestTable) -> Vec<&'static str> {
    table
        .canonical_fields()
        .into_iter()
        .map(|field| field.label())
        .collect()
}

fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs {
        csv,
        name,
        org,
        seat,
        list_columns,
    } = args;

    let table = GuestListImporter::from_path(csv)?;
    let query = FilterQuery {
        name: name.unwrap_or_default(),
        organization: org.unwrap_or_default(),
        seat: seat.unwrap_or_default(),
    };
    let result = filter_table(&table, &query);
    render_search_results(&table, &result, list_columns);

    Ok(())
}

fn render_search_results(table: &GuestTable, result: &GuestTable, list_columns: bool) {
    println!(
        "Loaded {} guests across {} columns",
        table.len(),
        table.columns().len()
    );

    if list_columns {
        println!("Columns: {}", table.columns().join(", "));
        println!("Canonical fields: {}", field_labels(table).join(", "));
    }

    if result.is_empty() {
        println!("\nNo matches found.");
        return;
    }

    println!("\n{} of {} guests match", result.len(), table.len());
    for record in result.records() {
        println!("- {}", record.cells().join(" | "));
    }
}
