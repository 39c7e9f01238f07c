//! HTTP control surface.
//!
//! A thin layer that turns form posts into calls on the rotation store, the
//! image folder, the slide delay and the power controller.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::FormRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Configuration;
use crate::delay::SlideDelay;
use crate::error::{LibraryError, StoreError};
use crate::events::PowerAction;
use crate::store::PictureStore;
use crate::system::PowerController;
use crate::tasks::files::{ImageLibrary, is_plain_file_name};

const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Static files served alongside the API.
#[derive(Debug, Clone)]
pub struct Assets {
    pub index_html: PathBuf,
    pub stylesheet: PathBuf,
    pub logo: PathBuf,
}

impl Assets {
    pub fn from_config(cfg: &Configuration) -> Self {
        Self {
            index_html: cfg.index_html_path(),
            stylesheet: cfg.stylesheet_path(),
            logo: cfg.logo_path(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PictureStore>,
    pub library: ImageLibrary,
    pub delay: SlideDelay,
    pub power: PowerController,
    pub assets: Arc<Assets>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/bootstrap", get(stylesheet))
        .route("/logo.png", get(logo))
        .route(
            "/images",
            get(list_images).post(upload_image).delete(delete_image),
        )
        .route(
            "/frames",
            get(list_frames).post(add_frame).delete(remove_frame),
        )
        .route("/frames/time", get(get_delay).post(set_delay))
        .route("/system/stop", get(system_stop))
        .route("/system/restart", get(system_restart))
        .route("/system/shutdown", get(system_shutdown))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Serves the control surface until `cancel` fires.
pub async fn serve(state: AppState, bind_addr: SocketAddr, cancel: CancellationToken) -> Result<()> {
    let app = router(state);
    info!(%bind_addr, "starting control server");
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind control server on {bind_addr}"))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await
        .context("control server failed")?;
    info!("control server stopped");
    Ok(())
}

async fn index(State(state): State<AppState>) -> Response {
    serve_file(&state.assets.index_html, "text/html; charset=utf-8").await
}

async fn stylesheet(State(state): State<AppState>) -> Response {
    serve_file(&state.assets.stylesheet, "text/css").await
}

async fn logo(State(state): State<AppState>) -> Response {
    serve_file(&state.assets.logo, "image/png").await
}

async fn serve_file(path: &Path, content_type: &'static str) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "asset missing");
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "failed to read asset");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
struct FilenameForm {
    #[serde(default)]
    filename: String,
}

#[derive(Deserialize)]
struct IndexForm {
    #[serde(default)]
    index: String,
}

#[derive(Deserialize)]
struct DelayForm {
    #[serde(default)]
    delay: String,
}

/// Missing or malformed form bodies read as empty fields.
fn form_field<T>(form: Result<Form<T>, FormRejection>, field: fn(T) -> String) -> String {
    match form {
        Ok(Form(inner)) => field(inner),
        Err(rejection) => {
            debug!(%rejection, "unreadable form body");
            String::new()
        }
    }
}

async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<String>>, StatusCode> {
    state.library.list().await.map(Json).map_err(library_status)
}

async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> StatusCode {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            debug!(%rejection, "upload without multipart body");
            return StatusCode::BAD_REQUEST;
        }
    };
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return StatusCode::BAD_REQUEST,
            Err(err) => {
                warn!(error = %err, "malformed upload");
                return err.status();
            }
        };
        if field.name() != Some("file") {
            continue;
        }
        let Some(name) = field.file_name().map(str::to_string) else {
            return StatusCode::BAD_REQUEST;
        };
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "failed to read upload");
                return err.status();
            }
        };
        return match state.library.save(&name, &bytes).await {
            Ok(_) => StatusCode::CREATED,
            Err(err) => library_status(err),
        };
    }
}

async fn delete_image(
    State(state): State<AppState>,
    form: Result<Form<FilenameForm>, FormRejection>,
) -> StatusCode {
    let filename = form_field(form, |f| f.filename);
    if filename.is_empty() {
        return StatusCode::BAD_REQUEST;
    }
    match state.library.delete(&filename).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(err) => library_status(err),
    }
}

fn library_status(err: LibraryError) -> StatusCode {
    match err {
        LibraryError::InvalidName(_) => StatusCode::BAD_REQUEST,
        LibraryError::Protected(_) => StatusCode::FORBIDDEN,
        LibraryError::NotFound(_) => StatusCode::NOT_FOUND,
        LibraryError::Io(err) => {
            error!(error = %err, "image folder error");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn list_frames(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.snapshot())
}

async fn add_frame(
    State(state): State<AppState>,
    form: Result<Form<FilenameForm>, FormRejection>,
) -> StatusCode {
    let filename = form_field(form, |f| f.filename);
    if filename.is_empty() {
        return StatusCode::BAD_REQUEST;
    }
    // Frames resolve against the image folder; nothing may point outside it.
    if !is_plain_file_name(&filename) {
        debug!(%filename, "rejecting frame outside the image folder");
        return StatusCode::BAD_REQUEST;
    }
    info!(%filename, "frame added");
    state.store.add(filename);
    StatusCode::CREATED
}

async fn remove_frame(
    State(state): State<AppState>,
    form: Result<Form<IndexForm>, FormRejection>,
) -> StatusCode {
    let Ok(index) = form_field(form, |f| f.index).trim().parse::<usize>() else {
        return StatusCode::BAD_REQUEST;
    };
    // Index 0 is the sentinel; keeping it guarantees the rotation never empties.
    if index == 0 {
        return StatusCode::FORBIDDEN;
    }
    if index >= state.store.count() {
        return StatusCode::CONFLICT;
    }
    match state.store.remove_at(index) {
        Ok(removed) => {
            info!(index, %removed, "frame removed");
            StatusCode::NO_CONTENT
        }
        Err(StoreError::OutOfRange { index, len }) => {
            debug!(index, len, "frame vanished before removal");
            StatusCode::CONFLICT
        }
    }
}

async fn get_delay(State(state): State<AppState>) -> String {
    state.delay.get().as_millis().to_string()
}

async fn set_delay(
    State(state): State<AppState>,
    form: Result<Form<DelayForm>, FormRejection>,
) -> StatusCode {
    match form_field(form, |f| f.delay).trim().parse::<u64>() {
        Ok(ms) if ms > 0 => {
            state.delay.set(Duration::from_millis(ms));
            StatusCode::NO_CONTENT
        }
        _ => StatusCode::BAD_REQUEST,
    }
}

async fn system_stop(State(state): State<AppState>) -> StatusCode {
    power(&state, PowerAction::Stop).await
}

async fn system_restart(State(state): State<AppState>) -> StatusCode {
    power(&state, PowerAction::Restart).await
}

async fn system_shutdown(State(state): State<AppState>) -> StatusCode {
    power(&state, PowerAction::Shutdown).await
}

async fn power(state: &AppState, action: PowerAction) -> StatusCode {
    match state.power.perform(action).await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            error!(error = %err, "power action failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
