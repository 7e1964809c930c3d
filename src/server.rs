//! HTTP surface: an upload form at `/` and the analysis endpoint at `/analyze`.
//!
//! Failures carry a 4xx/5xx status, but the body is always a JSON object
//! with a single `error` key. Clients should key on that field rather than
//! on the status.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::{Config, ServerConfig};
use crate::detect::{BudgetedBackend, DetectorFactory};
use crate::error::{Error, Result};
use crate::pipeline::AnalysisResponse;
use crate::upload::{allowed_file, save_upload};

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>percent-style</title>
</head>
<body>
  <h1>Style analysis</h1>
  <form id="upload" action="/analyze" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept=".png,.jpg,.jpeg" required>
    <button type="submit">Analyze</button>
  </form>
  <pre id="result"></pre>
  <script>
    document.getElementById("upload").addEventListener("submit", async (event) => {
      event.preventDefault();
      const response = await fetch("/analyze", { method: "POST", body: new FormData(event.target) });
      document.getElementById("result").textContent = JSON.stringify(await response.json(), null, 2);
    });
  </script>
</body>
</html>
"#;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub detectors: Arc<dyn DetectorFactory>,
}

impl AppState {
    pub fn new(config: ServerConfig, detectors: Arc<dyn DetectorFactory>) -> Self {
        Self {
            config: Arc::new(config),
            detectors,
        }
    }

    /// State for the configured backend. External detector programs are
    /// killed once the analysis timeout has elapsed.
    pub fn from_config(config: &Config) -> Self {
        let detectors = BudgetedBackend {
            backend: config.detector.clone(),
            budget: config.server.analysis_timeout(),
        };
        Self::new(config.server.clone(), Arc::new(detectors))
    }
}

pub fn router(state: AppState) -> Router {
    let limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let state = AppState::from_config(&config);
    let listener = TcpListener::bind(&config.server.bind).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::InvalidUpload => StatusCode::BAD_REQUEST,
        Error::InvalidImage { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(status: StatusCode, message: impl ToString) -> Response {
    let message = message.to_string();
    warn!(%status, error = %message, "request failed");
    (status, Json(AnalysisResponse::failure(message))).into_response()
}

fn error_response(error: Error) -> Response {
    failure(status_for(&error), error)
}

/// Pull the `file` field out of the form, if present and named.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<(String, Vec<u8>)>> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                debug!(error = %e, "malformed multipart body");
                return Err(Error::InvalidUpload);
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_owned) else {
            return Ok(None);
        };
        let bytes = field.bytes().await.map_err(|e| {
            debug!(error = %e, "failed to read upload");
            Error::InvalidUpload
        })?;
        return Ok(Some((filename, bytes.to_vec())));
    }
}

async fn analyze(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let Ok(mut multipart) = multipart else {
        return error_response(Error::InvalidUpload);
    };

    let (filename, bytes) = match read_upload(&mut multipart).await {
        Ok(Some((filename, bytes))) if allowed_file(&filename) => (filename, bytes),
        Ok(_) => return error_response(Error::InvalidUpload),
        Err(e) => return error_response(e),
    };

    let analyzer = match state.detectors.analyzer() {
        Ok(analyzer) => analyzer,
        Err(e) => return error_response(e),
    };

    let upload_dir = state.config.upload_dir.clone();
    let task = tokio::task::spawn_blocking(move || {
        let path = save_upload(&upload_dir, &filename, &bytes)?;
        debug!(path = %path.display(), "saved upload");
        analyzer.analyze_bytes(&bytes)
    });

    let timeout = state.config.analysis_timeout();
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(result))) => {
            (StatusCode::OK, Json(AnalysisResponse::Success(result))).into_response()
        }
        Ok(Ok(Err(e))) => error_response(e),
        Ok(Err(join_error)) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("analysis task failed: {}", join_error),
        ),
        Err(_) => error_response(Error::Timeout(timeout)),
    }
}
