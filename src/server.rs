use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::{config::ConnectionString, EngineOptions, LoadCommand, LoadEngine};

/// Read-only per-process state shared by request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub connection: ConnectionString,
    pub options: EngineOptions,
}

impl AppState {
    pub fn new(connection: ConnectionString) -> Self {
        Self {
            connection,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/load", post(load))
        .with_state(state)
}

/// `POST /v1/load` — validate the command, run its derived batch against
/// one warehouse session, answer with the terminal statement's rows.
///
/// Invalid commands answer 400 with the validator's message before any
/// warehouse interaction. Every engine failure answers 500 with the error's
/// display text; full detail is logged here and nowhere else.
async fn load(State(state): State<AppState>, Json(command): Json<LoadCommand>) -> Response {
    if let Err(message) = command.validate() {
        return (StatusCode::BAD_REQUEST, message).into_response();
    }

    let engine = LoadEngine::new(state.connection.clone()).with_options(state.options.clone());
    match engine.load(&command).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            tracing::error!(error = ?err, table = %command.target_table, "load request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
