// src/server.rs

use crate::admin;
use crate::config::Settings;
use crate::db;
use crate::error::{DiaryError, Result};
use crate::listing::{Catalog, Selection};
use crate::render::{self, IndexPage};
use crate::session::SessionStore;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shared by every handler. The connection is opened once at startup.
#[derive(Clone)]
pub struct AppState {
    pub conn: Arc<Mutex<Connection>>,
    pub sessions: Arc<SessionStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(conn: Connection, settings: Settings) -> Self {
        AppState {
            conn: Arc::new(Mutex::new(conn)),
            sessions: Arc::new(SessionStore::new()),
            settings: Arc::new(settings),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/admin", get(admin::admin_page).post(admin::admin_submit))
        .route("/css/style.css", get(stylesheet))
        .route("/health", get(health))
        .with_state(state)
}

/// Open the database and serve until Ctrl-C.
pub async fn serve(settings: Settings) -> Result<()> {
    let conn = db::initialize_db(&settings.db_path)?;
    if settings.admin_password_hash.is_none() {
        warn!("no admin password hash configured; admin login is disabled");
    }

    let addr = settings.listen;
    info!("DB: {}", settings.db_path.display());
    let app = router(AppState::new(conn, settings));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DiaryError::Server(format!("cannot listen on {addr}: {e}")))?;
    info!("diary listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    id: Option<String>,
    cat: Option<String>,
    p: Option<String>,
}

async fn index(
    State(state): State<AppState>,
    Query(q): Query<IndexQuery>,
) -> Result<Html<String>> {
    let selection = Selection::from_query(q.id.as_deref(), q.cat.as_deref(), q.p.as_deref());

    let conn = state.conn.lock().await;
    let rows = db::list_entries(&conn)?;
    let listing = Catalog::build(rows, &selection.tag).paginate(state.settings.page_size, &selection);
    let active = listing.load_active(selection.id, |id| db::get_entry(&conn, id))?;
    drop(conn);

    Ok(Html(render::index_page(&IndexPage {
        listing: &listing,
        selected_tag: &selection.tag,
        active: active.as_ref(),
    })))
}

async fn stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], render::STYLESHEET)
}

#[derive(Serialize)]
struct HealthInfo {
    ok: bool,
    service: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthInfo {
        ok: true,
        service: "diary",
        version: env!("CARGO_PKG_VERSION"),
    })
}
