//! HTTP routes for reading the ledger and recording checkouts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::chain::AppendOutcome;
use crate::crypto::book_id;
use crate::model::{Block, Book, BookCheckout};
use crate::AppState;

/// Build the router with every endpoint wired to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_blockchain).post(write_block))
        .route("/new", post(new_book))
        .route("/blocks/:pos", get(get_block))
        .route("/validate", get(validate_chain))
        .route("/health", get(health))
        .route("/version", get(version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /
pub async fn get_blockchain(State(state): State<AppState>) -> Json<Vec<Block>> {
    Json(state.ledger.snapshot())
}

#[derive(Serialize)]
pub struct WriteOutput {
    pub position: u64,
    pub hash: String,
    pub checkout: BookCheckout,
}

/// POST /: append a checkout. Rejections come back as 409.
pub async fn write_block(
    State(state): State<AppState>,
    Json(checkout): Json<BookCheckout>,
) -> Result<Json<WriteOutput>, (StatusCode, String)> {
    let outcome = state.ledger.append(checkout.clone()).map_err(|e| {
        error!("could not write block: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    match outcome {
        AppendOutcome::Accepted { position, hash } => Ok(Json(WriteOutput {
            position,
            hash,
            checkout,
        })),
        AppendOutcome::Rejected(reason) => Err((StatusCode::CONFLICT, reason.to_string())),
    }
}

/// POST /new: register a book, filling in its derived id.
pub async fn new_book(Json(mut book): Json<Book>) -> Json<Book> {
    book.id = book_id(&book);
    info!(id = %book.id, isbn = %book.isbn, "book registered");
    Json(book)
}

/// GET /blocks/:pos
pub async fn get_block(
    State(state): State<AppState>,
    Path(pos): Path<u64>,
) -> Result<Json<Block>, (StatusCode, String)> {
    state
        .ledger
        .block(pos)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "not found".into()))
}

/// GET /validate: re-check every link and hash; returns { ok, errors[] }
#[derive(Serialize)]
pub struct ValidateResp {
    pub ok: bool,
    pub errors: Vec<String>,
}
pub async fn validate_chain(State(state): State<AppState>) -> Json<ValidateResp> {
    let errors = state.ledger.verify();
    Json(ValidateResp {
        ok: errors.is_empty(),
        errors,
    })
}

/// GET /health
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub blocks: usize,
}
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        blocks: state.ledger.len(),
    })
}

/// GET /version
#[derive(Serialize)]
pub struct Version {
    pub version: &'static str,
    pub git_sha: Option<&'static str>,
}
pub async fn version() -> Json<Version> {
    Json(Version {
        version: env!("CARGO_PKG_VERSION"),
        git_sha: option_env!("GIT_SHA"),
    })
}
