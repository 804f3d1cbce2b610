//! Servidor web Axum com WebSocket para acompanhar a etiquetagem semântica em tempo real

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use ciall_core::{
    config::{InputFormat, PipelineConfig},
    corpus::{demo_documents, demo_lemma_frequency},
    lemmafreq::LemmaFrequency,
    parole::pos_to_parole,
    pipeline::{CiallPipeline, Coverage, PipelineEvent},
    taxonomy::{self, describe_symbol},
    token::Token,
    tsv::{document_to_tsv, parse_field_list, TsvField},
    CompoundTag,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const DEFAULT_OUTPUT_FIELDS: &str = "ID|TOKEN|LEMMA|PAR_SHORT|MWE|USAS|USAS_DESCRIPTION";

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: CiallPipeline,
    accuracy_pipeline: CiallPipeline,
    freqs: LemmaFrequency,
    output_fields: Vec<TsvField>,
}

impl AppState {
    /// Carrega a configuração de `CIALL_CONFIG`, ou usa os dados de demonstração.
    fn load() -> anyhow::Result<Self> {
        let Some(path) = std::env::var_os("CIALL_CONFIG").map(PathBuf::from) else {
            info!("CIALL_CONFIG não definido, usando léxicos de demonstração");
            return Self::demo();
        };

        info!(config = %path.display(), "carregando configuração");
        let config = PipelineConfig::from_file(&path)?;
        let pipeline = CiallPipeline::from_config(&config, false)?;
        let output_fields = match config.output.fields {
            Some(_) => config.output_fields()?,
            None => parse_field_list(DEFAULT_OUTPUT_FIELDS)?,
        };
        Ok(Self {
            accuracy_pipeline: pipeline.clone().with_accuracy(true),
            pipeline,
            freqs: config.lemma_frequency()?,
            output_fields,
        })
    }

    fn demo() -> anyhow::Result<Self> {
        let pipeline = CiallPipeline::demo();
        Ok(Self {
            accuracy_pipeline: pipeline.clone().with_accuracy(true),
            pipeline,
            freqs: demo_lemma_frequency(),
            output_fields: parse_field_list(DEFAULT_OUTPUT_FIELDS)?,
        })
    }

    fn pipeline(&self, accuracy: bool) -> &CiallPipeline {
        if accuracy {
            &self.accuracy_pipeline
        } else {
            &self.pipeline
        }
    }
}

#[derive(Deserialize)]
struct TagRequest {
    input: String,
    #[serde(default)]
    format: InputFormat,
    /// Campos TSV separados por `|`; ausente = cabeçalho na primeira linha.
    #[serde(default)]
    fields: Option<String>,
    #[serde(default)]
    accuracy: bool,
}

#[derive(Serialize)]
struct TagResponse {
    tokens: Vec<Token>,
    coverage: Coverage,
    accuracy: Option<String>,
    tsv: String,
    processing_ms: u64,
}

#[derive(Deserialize)]
struct ParoleRequest {
    /// Traços do analisador (ex: `["Noun", "Masc", "Com", "Sg"]`).
    features: Vec<String>,
}

#[derive(Deserialize)]
struct DescribeQuery {
    tag: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let state = Arc::new(AppState::load()?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/tag", post(tag_handler))
        .route("/parole", post(parole_handler))
        .route("/describe", get(describe_handler))
        .route("/categories", get(categories_handler))
        .route("/ws", get(ws_handler))
        .route("/demo", get(demo_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Servidor Ciall iniciado em http://localhost:3000");
    axum::serve(listener, app).await?;
    Ok(())
}

fn bad_request(message: impl ToString) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message.to_string()})),
    )
        .into_response()
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("index.html"))
}

/// Etiquetagem via HTTP POST (sem streaming)
async fn tag_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TagRequest>,
) -> Response {
    if req.input.trim().is_empty() {
        return bad_request("Entrada vazia");
    }

    let start = std::time::Instant::now();
    let fields = match req.fields.as_deref().map(parse_field_list).transpose() {
        Ok(fields) => fields.unwrap_or_default(),
        Err(err) => return bad_request(err),
    };
    let doc = match req.format.read(&req.input, &fields, &state.freqs) {
        Ok(doc) => doc,
        Err(err) => return bad_request(err),
    };
    let doc = match state.pipeline(req.accuracy).run(doc) {
        Ok(doc) => doc,
        Err(err) => return bad_request(err),
    };
    let tsv = match document_to_tsv(&doc, &state.output_fields) {
        Ok(tsv) => tsv,
        Err(err) => return bad_request(err),
    };

    Json(TagResponse {
        coverage: Coverage::of(&doc.tokens),
        accuracy: doc.accuracy_report.as_ref().map(|r| r.summary()),
        tokens: doc.tokens,
        tsv,
        processing_ms: start.elapsed().as_millis() as u64,
    })
    .into_response()
}

/// Compila traços morfológicos em PAROLE
async fn parole_handler(Json(req): Json<ParoleRequest>) -> impl IntoResponse {
    Json(pos_to_parole(&req.features))
}

/// Descrição de uma tag composta e de seus modificadores (ex: `/describe?tag=Q1.2/S2mf`)
async fn describe_handler(Query(query): Query<DescribeQuery>) -> Response {
    let tag = match CompoundTag::parse(&query.tag) {
        Ok(tag) => tag,
        Err(err) => return bad_request(err),
    };
    let description = match tag.description() {
        Ok(description) => description,
        Err(err) => return bad_request(err),
    };
    let symbols: Vec<serde_json::Value> = tag
        .tags()
        .iter()
        .flat_map(|t| t.symbols_str().chars())
        .filter_map(|c| {
            describe_symbol(c).map(|d| serde_json::json!({"symbol": c, "description": d}))
        })
        .collect();

    Json(serde_json::json!({
        "tag": query.tag,
        "description": description,
        "symbols": symbols,
    }))
    .into_response()
}

/// Tabela completa da taxonomia USAS
async fn categories_handler() -> impl IntoResponse {
    let categories: Vec<serde_json::Value> = taxonomy::categories()
        .filter_map(|c| {
            taxonomy::describe(c)
                .ok()
                .map(|d| serde_json::json!({"category": c, "description": d}))
        })
        .collect();
    Json(categories)
}

/// Retorna os documentos CG3 de demonstração
async fn demo_handler() -> impl IntoResponse {
    let docs: Vec<serde_json::Value> = demo_documents()
        .iter()
        .map(|(title, cg3)| {
            serde_json::json!({
                "title": title,
                "format": "cg3",
                "input": cg3
            })
        })
        .collect();
    Json(docs)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Recebe um documento, executa o pipeline e envia os eventos passo a passo
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // JSON {input, format, fields, accuracy}; senão o texto é um TSV com cabeçalho
                let req = serde_json::from_str::<TagRequest>(&text).unwrap_or(TagRequest {
                    input: text.clone(),
                    format: InputFormat::Tsv,
                    fields: None,
                    accuracy: false,
                });
                if req.input.trim().is_empty() {
                    continue;
                }

                let events = run_pipeline(Arc::clone(&state), req).await;
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para animação visual (passo a passo)
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

/// Executa o pipeline (síncrono) em uma thread bloqueante e coleta os eventos.
async fn run_pipeline(state: Arc<AppState>, req: TagRequest) -> Vec<PipelineEvent> {
    let handle = tokio::task::spawn_blocking(move || {
        let fields = match req.fields.as_deref().map(parse_field_list).transpose() {
            Ok(fields) => fields.unwrap_or_default(),
            Err(err) => return vec![PipelineEvent::Error { message: err.to_string() }],
        };
        let doc = match req.format.read(&req.input, &fields, &state.freqs) {
            Ok(doc) => doc,
            Err(err) => return vec![PipelineEvent::Error { message: err.to_string() }],
        };
        info!(tokens = doc.len(), format = ?req.format, "etiquetando via WebSocket");

        let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
        state.pipeline(req.accuracy).run_streaming(doc, tx);
        rx.try_iter().collect()
    });

    match handle.await {
        Ok(events) => events,
        Err(err) => {
            warn!(error = %err, "falha na thread do pipeline");
            vec![PipelineEvent::Error {
                message: "falha interna no pipeline".to_string(),
            }]
        }
    }
}
