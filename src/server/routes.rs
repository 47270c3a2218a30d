//! Route table and request handlers.
//!
//! Each handler does its store/notify work inline and responds only after
//! it has finished; nothing is queued.

use crate::notify::Notifier;
use crate::server::error::ApiError;
use crate::server::protocol::{
    non_empty, parse_lenient, CountResponse, LogClickRequest, SourceQuery, UpdateIpRequest,
    SOURCE_HOME,
};
use crate::store::{LogStore, Record};
use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::{
        header::{CONTENT_TYPE, LOCATION, USER_AGENT},
        HeaderMap, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Page served at `/` when the public directory has no `index.html`.
pub const LANDING_PAGE: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn LogStore>,
    notifier: Notifier,
    public_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn LogStore>, notifier: Notifier, public_dir: impl AsRef<Path>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                notifier,
                public_dir: public_dir.as_ref().to_path_buf(),
            }),
        }
    }

    fn store(&self) -> &Arc<dyn LogStore> {
        &self.inner.store
    }

    fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    fn public_dir(&self) -> &Path {
        &self.inner.public_dir
    }
}

/// Build the full application router. Unknown paths fall through to the
/// static files in the public directory.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.public_dir());

    Router::new()
        .route("/", get(landing))
        .route("/home", get(home))
        .route("/update-ip", post(update_ip))
        .route("/get-count", get(get_count))
        .route("/log-click", post(log_click))
        .route("/get-data", get(get_data))
        .fallback_service(static_files)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

async fn landing(
    Extension(state): Extension<AppState>,
    Query(query): Query<SourceQuery>,
) -> Html<String> {
    tracing::debug!(
        source = query.source.as_deref().unwrap_or("direct"),
        "Landing page requested"
    );

    let custom = state.public_dir().join("index.html");
    match tokio::fs::read_to_string(&custom).await {
        Ok(page) => Html(page),
        Err(_) => Html(LANDING_PAGE.to_string()),
    }
}

async fn home() -> Response {
    (
        StatusCode::FOUND,
        [(LOCATION, format!("/?source={SOURCE_HOME}"))],
    )
        .into_response()
}

async fn update_ip(
    Extension(state): Extension<AppState>,
    Query(query): Query<SourceQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let request: UpdateIpRequest = parse_lenient(&body);
    let ip = non_empty(request.ip).ok_or(ApiError::Validation("No IP provided"))?;

    let user_agent = headers
        .get(USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    let record = Record::now(user_agent, ip);
    state
        .store()
        .append_record(&record)
        .await
        .map_err(ApiError::storage("Error logging data"))?;

    tracing::info!(
        ip = %record.ip,
        source = query.source.as_deref().unwrap_or("direct"),
        "Recorded visit"
    );

    if !query.is_home() {
        return Ok("IP updated successfully");
    }

    // The visit is already stored; a mail failure only gets logged.
    match state.notifier().notify_last().await {
        Ok(()) => Ok("IP updated successfully and email sent"),
        Err(e) => {
            tracing::error!("Error sending email: {}", e);
            Ok("IP updated successfully")
        }
    }
}

async fn get_count(Extension(state): Extension<AppState>) -> Result<Json<CountResponse>, ApiError> {
    let count = state
        .store()
        .count()
        .await
        .map_err(ApiError::storage_json("Error reading data"))?;
    Ok(Json(CountResponse { count }))
}

async fn log_click(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let request: LogClickRequest = parse_lenient(&body);
    let row = non_empty(request.csv_data).ok_or(ApiError::Validation("No data received"))?;

    state
        .store()
        .append(&row)
        .await
        .map_err(ApiError::storage("Error logging data"))?;

    tracing::debug!("Logged client-formatted row");
    Ok("Data logged successfully")
}

async fn get_data(Extension(state): Extension<AppState>) -> Result<Response, ApiError> {
    let contents = state
        .store()
        .read_all()
        .await
        .map_err(ApiError::storage("Error retrieving data"))?
        .ok_or(ApiError::NotFound("No data found"))?;

    Ok(([(CONTENT_TYPE, "text/csv; charset=utf-8")], contents).into_response())
}
