//! Servidor web Axum expondo alinhamento, pós-processamento e avaliação NER via JSON

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use ner_align_core::{
    corpus::demo_examples, AlignConfig, AlignError, AlignInput, AlignPipeline, Encoding, LabelledRow,
    Report,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: AlignPipeline,
}

#[derive(Deserialize)]
struct AlignRequest {
    rows: Vec<AlignInput>,
}

#[derive(Serialize)]
struct AlignResponse {
    labels: Vec<Vec<i64>>,
}

#[derive(Deserialize)]
struct PostprocessRequest {
    predictions: Vec<Vec<i64>>,
    labels: Vec<Vec<i64>>,
}

#[derive(Serialize)]
struct PostprocessResponse {
    rows: Vec<LabelledRow>,
}

/// Aceita predições já decodificadas ou logits crus (`[lote, seq, rótulos]`).
#[derive(Deserialize)]
struct EvaluateRequest {
    #[serde(default)]
    predictions: Option<Vec<Vec<i64>>>,
    #[serde(default)]
    logits: Option<Vec<Vec<Vec<f32>>>>,
    labels: Vec<Vec<i64>>,
}

#[derive(Serialize)]
struct DemoItem {
    text: &'static str,
    words: Vec<&'static str>,
    word_labels: Vec<i64>,
    encoding: Encoding,
    aligned: Vec<i64>,
}

/// Erro da biblioteca convertido em `400 {"error": ...}`
struct ApiError(AlignError);

impl From<AlignError> for ApiError {
    fn from(err: AlignError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!("requisição rejeitada: {}", self.0);
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

fn load_config() -> Result<AlignConfig, AlignError> {
    match std::env::var("NER_ALIGN_CONFIG") {
        Ok(path) => {
            info!("carregando configuração de {path}");
            AlignConfig::from_path(path)
        }
        Err(_) => Ok(AlignConfig::default()),
    }
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/scheme", get(scheme_handler))
        .route("/align", post(align_handler))
        .route("/postprocess", post(postprocess_handler))
        .route("/evaluate", post(evaluate_handler))
        .route("/demo", get(demo_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = load_config()?;
    info!(
        labels = config.scheme.len(),
        strategy = ?config.strategy,
        "esquema de rótulos carregado"
    );
    let state = Arc::new(AppState {
        pipeline: AlignPipeline::new(config),
    });

    let addr = std::env::var("NER_ALIGN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Servidor de alinhamento NER iniciado em http://{addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Configuração ativa (esquema + estratégia)
async fn scheme_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.pipeline.config().clone())
}

/// Alinha um lote de sentenças
async fn align_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AlignRequest>,
) -> Result<Json<AlignResponse>, ApiError> {
    let labels = state.pipeline.align_batch(&req.rows)?;
    Ok(Json(AlignResponse { labels }))
}

async fn postprocess_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PostprocessRequest>,
) -> Result<Json<PostprocessResponse>, ApiError> {
    let rows = state.pipeline.postprocess(&req.predictions, &req.labels)?;
    Ok(Json(PostprocessResponse { rows }))
}

/// Métricas por span a partir de predições ou logits
async fn evaluate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Response, ApiError> {
    let report: Report = match (req.predictions, req.logits) {
        (Some(predictions), None) => state.pipeline.compute_metrics(&predictions, &req.labels)?,
        (None, Some(logits)) => state
            .pipeline
            .compute_metrics_from_logits(&logits, &req.labels)?,
        _ => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "informe exatamente um entre `predictions` e `logits`"
                })),
            )
                .into_response())
        }
    };
    Ok(Json(report).into_response())
}

/// Exemplos de demonstração já alinhados
async fn demo_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<DemoItem>>, ApiError> {
    let pipeline = &state.pipeline;
    let items = demo_examples()
        .into_iter()
        .map(|example| -> Result<DemoItem, AlignError> {
            let word_labels = example.word_labels(pipeline.scheme())?;
            let encoding = example.encoding();
            let aligned = pipeline.align_encoding(&word_labels, &encoding)?;
            Ok(DemoItem {
                text: example.text,
                words: example.words(),
                word_labels,
                encoding,
                aligned,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(items))
}
