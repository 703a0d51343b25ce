use api_types::{ErrorResponse, FieldErrorView};
use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use cors::{CorsOrigin, DEFAULT_ORIGIN};
pub use server::{router, run_with_listener};

mod contributions;
mod cors;
mod guests;
mod health;
mod server;
mod statistics;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::InvalidId(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Engine keys read `"<entity> <id>"`.
fn not_found_message(key: &str) -> &'static str {
    match key.split_whitespace().next() {
        Some("guest") => "Participant non trouvé",
        Some("contribution") => "Contribution non trouvée",
        _ => "Ressource non trouvée",
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorResponse {
    let (error, details) = match err {
        EngineError::Validation(errors) => {
            let details = errors
                .into_iter()
                .map(|e| FieldErrorView {
                    field: e.field.to_string(),
                    message: e.message,
                })
                .collect();
            ("Données invalides".to_string(), Some(details))
        }
        EngineError::InvalidId(_) => ("ID invalide".to_string(), None),
        EngineError::KeyNotFound(key) => (not_found_message(&key).to_string(), None),
        EngineError::ExistingKey(_) => ("Un participant avec ce nom existe déjà".to_string(), None),
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ("Une erreur interne est survenue".to_string(), None)
        }
    };

    ErrorResponse {
        success: false,
        error,
        details,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error,
                    details: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        tracing::debug!("rejected body: {value}");
        Self::Generic("Corps de requête JSON invalide".to_string())
    }
}
