//! Endpoints API REST de la passerelle
//!
//! Les handlers ne renvoient jamais d'erreur amont : le client absorbe les
//! échecs (miroir, puis résultat vide). Seules la validation (400), l'absence
//! de flux (404) et une panique (500) produisent un corps `{error, ...}`.

use crate::client::DramaboxClient;
use crate::models::{CatalogPage, StreamLookup};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use serde_json::{Value, json};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

/// Préfixe sous lequel le router est monté
pub const API_PREFIX: &str = "/api/dramabox";

/// Paires `clé=valeur` de la query string, dans l'ordre d'arrivée
///
/// Une clé répétée (`?page=1&page=2`) n'est pas une erreur : seule la
/// première occurrence compte.
#[derive(Debug, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// Première valeur de `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Première valeur non vide de `key`
    pub fn required(&self, key: &str) -> Option<&str> {
        self.first(key).filter(|v| !v.is_empty())
    }
}

/// Crée le router Axum avec les quatre endpoints
pub fn create_router(client: Arc<DramaboxClient>) -> Router {
    Router::new()
        .route("/trending", guarded(get(trending), "Failed to fetch trending"))
        .route("/latest", guarded(get(latest), "Failed to fetch latest"))
        .route("/search", guarded(get(search), "Failed to search"))
        .route("/stream", guarded(get(stream), "Failed to get stream"))
        .with_state(client)
}

/// Description du service servie sur `/`
pub fn service_descriptor() -> Value {
    json!({
        "name": "DramaBox API",
        "version": "1.0.0",
        "endpoints": {
            "trending": format!("GET {}/trending", API_PREFIX),
            "latest": format!("GET {}/latest", API_PREFIX),
            "search": format!("GET {}/search?query=...", API_PREFIX),
            "stream": format!("GET {}/stream?bookId=...&episode=...", API_PREFIX),
        }
    })
}

/// Entier tolérant : préfixe numérique, sinon 1 (0 compris)
///
/// `" 3abc"` donne 3, `"0x1f"` donne 31, `"abc"` et `"0"` donnent 1.
pub fn lenient_int(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else { return 1 };
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let mut value: Option<i64> = None;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(radix as i64)
                .saturating_add(d as i64),
        );
    }

    match value {
        Some(0) | None => 1,
        Some(v) if negative => -v,
        Some(v) => v,
    }
}

// ============ Handlers ============

async fn trending(
    State(client): State<Arc<DramaboxClient>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<CatalogPage> {
    let params = QueryParams::new(pairs);
    Json(client.trending(lenient_int(params.first("page"))).await)
}

async fn latest(
    State(client): State<Arc<DramaboxClient>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<CatalogPage> {
    let params = QueryParams::new(pairs);
    Json(client.latest(lenient_int(params.first("page"))).await)
}

async fn search(
    State(client): State<Arc<DramaboxClient>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CatalogPage>, ApiError> {
    let params = QueryParams::new(pairs);
    let query = params
        .required("query")
        .ok_or(ApiError::BadRequest("Query parameter is required"))?;
    Ok(Json(client.search(query).await))
}

async fn stream(
    State(client): State<Arc<DramaboxClient>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<StreamLookup>, ApiError> {
    let params = QueryParams::new(pairs);
    let book_id = params
        .required("bookId")
        .ok_or(ApiError::BadRequest("bookId parameter is required"))?;
    let episode = lenient_int(params.first("episode"));

    client
        .stream(book_id, episode)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Stream not found"))
}

// ============ Error handling ============

/// Erreur HTTP rendue en `{ "error": ... }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(&'static str),
    NotFound(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Convertit une panique du handler en 500 `{error: label, message}`
pub fn guarded<S>(route: MethodRouter<S>, label: &'static str) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.layer(CatchPanicLayer::custom(
        move |panic: Box<dyn Any + Send + 'static>| panic_response(label, panic),
    ))
}

fn panic_response(label: &'static str, panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };

    error!("{}: {}", label, message);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": label, "message": message })),
    )
        .into_response()
}
