use aula_core::Error as WireError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errori delle operazioni esposte via HTTP, mappati sugli status code.
/// I fallimenti di notifica non passano mai di qui: sono best-effort e
/// vengono inghiottiti alla fonte (lo store resta la fonte di verità).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Campi obbligatori mancanti nel body → 400
    #[error("{0}")]
    Validation(String),

    /// Token mancante o non valido → 401
    #[error("{0}")]
    Unauthorized(String),

    /// Operazione fuori dal proprio ruolo (es. valutare compiti altrui) → 403
    #[error("{0}")]
    Forbidden(String),

    /// Id di messaggio/utente/compito sconosciuto → 404
    #[error("{0}")]
    NotFound(String),

    /// Conflitto con lo stato esistente (nome già registrato) → 409
    #[error("{0}")]
    Conflict(String),

    /// Guasto dello store → 500, dettaglio solo nel log
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Documento salvato non decodificabile → 500, dettaglio solo nel log
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Persistence(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Persistence(_) | ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // i dettagli dei guasti interni restano nel log, mai nel body
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {}", self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(WireError::new(self.code(), message))).into_response()
    }
}
