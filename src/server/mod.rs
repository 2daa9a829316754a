//! HTTP front end: the HTML form at `/` and the JSON API at `/generate`.

use axum::{
    extract::{rejection::JsonRejection, Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::{
    choice::{self, Choice, LegendEntry},
    color::{Palette, PaletteEntry},
    error::{ChoiceError, GenerateError},
    generate::{self, Artwork, Grid, GridConfig},
    page::{self, PageView},
};

mod form;
pub use form::*;


pub const DEFAULT_MAX_EDGE_PX: u32 = 4096;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Largest accepted output width or height, in pixels.
    pub max_edge_px: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            max_edge_px: DEFAULT_MAX_EDGE_PX,
        }
    }
}

pub struct AppState {
    pub config: ServerConfig,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Choice(#[from] ChoiceError),
    #[error("invalid request body: {0}")]
    Body(String),
    #[error("output of {width}x{height} px exceeds the {max} px limit")]
    TooLarge { width: u64, height: u64, max: u32 },
    #[error("failed to generate image: {0}")]
    Generate(#[from] GenerateError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Generate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl AppState {
    fn check_size(&self, cfg: GridConfig) -> Result<(), ApiError> {
        let width = cfg.width as u64 * cfg.block_px as u64;
        let height = cfg.height as u64 * cfg.block_px as u64;
        let max = self.config.max_edge_px;
        if width > max as u64 || height > max as u64 {
            return Err(ApiError::TooLarge { width, height, max });
        }
        Ok(())
    }

    /// Validates, generates and encodes in one step.
    fn produce(&self, cfg: GridConfig, choices: &[Choice]) -> Result<(String, Artwork), ApiError> {
        choice::validate(choices)?;
        self.check_size(cfg)?;
        let artwork = generate::render(cfg, choices, &mut rand::rng())?;
        let img_b64 = artwork.png_base64()?;
        tracing::info!(
            "Generated {}x{} blocks at {} px ({} choices)",
            cfg.width,
            cfg.height,
            cfg.block_px,
            choices.len()
        );
        Ok((img_b64, artwork))
    }
}

fn default_dim() -> f64 {
    16.
}

/// Accepts numbers and numeric strings. Anything else, `null` included, falls
/// back to the default so the generator can clamp it.
fn lenient_dim<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(default_dim))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default = "default_dim", deserialize_with = "lenient_dim")]
    pub width: f64,
    #[serde(default = "default_dim", deserialize_with = "lenient_dim")]
    pub height: f64,
    #[serde(default = "default_dim", deserialize_with = "lenient_dim")]
    pub block_px: f64,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub img_b64: String,
    pub legend: Vec<LegendEntry>,
    pub grid: Grid,
}

async fn generate_json(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(req) = payload.inspect_err(|e| tracing::warn!("Rejected /generate body: {e}"))?;
    let cfg = GridConfig::new(req.width, req.height, req.block_px);

    let (img_b64, artwork) = state
        .produce(cfg, &req.choices)
        .inspect_err(|e| tracing::warn!("Rejected /generate request: {e}"))?;

    Ok(Json(GenerateResponse {
        img_b64,
        legend: choice::legend(&req.choices),
        grid: artwork.grid,
    }))
}

fn form_page(state: &AppState, req: &FormRequest) -> Response {
    let legend = choice::legend(&req.choices);
    let mut view = PageView {
        width: &req.width,
        height: &req.height,
        block_px: &req.block_px,
        subset: &req.subset,
        slots: &req.choices,
        legend: &legend,
        ..Default::default()
    };

    match state.produce(req.grid_config(), &req.choices) {
        Ok((img_b64, artwork)) => {
            view.img_b64 = Some(img_b64.as_str());
            view.grid = Some(&artwork.grid);
            Html(page::render(&view)).into_response()
        }
        Err(e) => {
            tracing::warn!("Rejected form submission: {e}");
            let msg = e.to_string();
            view.error = Some(msg.as_str());
            (e.status(), Html(page::render(&view))).into_response()
        }
    }
}

async fn index_page(State(state): State<Arc<AppState>>) -> Response {
    form_page(&state, &FormRequest::default())
}

async fn index_submit(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    form_page(&state, &FormRequest::from_fields(&fields))
}

async fn palette_json() -> Json<Vec<PaletteEntry>> {
    Json(Palette.entries())
}

const SCRIPT_JS: &str = include_str!("../../static/script.js");

async fn script_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript; charset=utf-8")], SCRIPT_JS)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page).post(index_submit))
        .route("/generate", axum::routing::post(generate_json))
        .route("/palette", get(palette_json))
        .route(page::SCRIPT_PATH, get(script_js))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}

pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((config.bind_address.as_str(), config.port)).await?;

    tracing::info!("Starting dye grid server on http://{}", listener.local_addr()?);
    tracing::info!("Output edge limit: {} px", config.max_edge_px);

    let app = router(Arc::new(AppState { config }));
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}
