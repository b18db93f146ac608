use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use stock_index::{IndexError, Observation, StockBook, Symbol};
use thiserror::Error as ThisError;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::external::{DailySource, FetchError};

#[derive(Clone)]
pub struct AppState {
    pub book: StockBook,
    pub source: Arc<dyn DailySource>,
}

#[derive(Serialize)]
pub struct Message {
    message: String,
}

#[derive(Serialize)]
pub struct StockData {
    stock_data: Vec<Observation>,
}

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Failed to add stock {symbol}.")]
    Rejected {
        symbol: String,
        #[source]
        source: IndexError,
    },

    #[error("Failed to add stock {symbol}.")]
    Upstream {
        symbol: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Lookup(#[from] IndexError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Rejected { .. } => StatusCode::BAD_REQUEST,
            AppError::Upstream { source: FetchError::Unavailable(_), .. } => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Lookup(IndexError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Lookup(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Rejected { source, .. } => warn!(error = %source, "{}", self),
            AppError::Upstream { source, .. } if status.is_server_error() => {
                error!(error = %source, "{}", self)
            }
            AppError::Upstream { source, .. } => warn!(error = %source, "{}", self),
            AppError::Lookup(_) => {}
        }
        let body = Message {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(|| async { "Stock index is up." }))
        .route("/add_stock/:symbol", get(add_stock))
        .route("/get_stock_data/:symbol", get(get_stock_data))
        .route("/get_symbols", get(get_symbols))
        .layer(cors)
        .with_state(state)
}

async fn add_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Message>, AppError> {
    let parsed = Symbol::parse(&symbol).map_err(|source| AppError::Rejected {
        symbol: symbol.clone(),
        source,
    })?;

    // The lock is only taken once the fetch has completed.
    let observations = state
        .source
        .fetch_daily(&parsed)
        .await
        .map_err(|source| AppError::Upstream {
            symbol: parsed.to_string(),
            source,
        })?;

    let count = state
        .book
        .add_symbol(parsed.as_str(), observations)
        .map_err(|source| AppError::Rejected {
            symbol: parsed.to_string(),
            source,
        })?;

    info!(symbol = %parsed, observations = count, "stock added");
    Ok(Json(Message {
        message: format!("Stock {parsed} added successfully."),
    }))
}

async fn get_stock_data(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<StockData>, AppError> {
    let stock_data = state.book.get_symbol_data(&symbol)?;
    Ok(Json(StockData { stock_data }))
}

async fn get_symbols(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.book.list_symbols())
}
