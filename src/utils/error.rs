// utils/error.rs
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Erreurs d'authentification
    #[error("Authentication failed")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Erreurs utilisateur
    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Username already taken")]
    UsernameTaken,

    // Erreurs OTP
    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("OTP has expired")]
    OtpExpired,

    #[error("No pending registration for this email")]
    PendingRegistrationNotFound,

    // Erreurs de données
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("No predictions to export")]
    NothingToExport,

    // Erreurs du modèle de prédiction
    #[error("Model artifact error: {0}")]
    ModelArtifact(String),

    // Erreurs d'export
    #[error("Export error: {0}")]
    ExportError(String),

    // Erreurs de base de données
    #[error("Database error: {0}")]
    Database(String),

    // Erreurs de notification
    #[error("Notification error: {0}")]
    NotificationError(String),

    // Erreurs système
    #[error("Internal server error")]
    Internal,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            // 400 - Bad Request
            AppError::Validation(_) => HttpResponse::BadRequest().json(json!({
                "error": self.to_string(),
                "code": "BAD_REQUEST"
            })),

            // 401 - Unauthorized
            AppError::Unauthorized
            | AppError::InvalidToken
            | AppError::TokenExpired
            | AppError::InvalidCredentials => HttpResponse::Unauthorized().json(json!({
                "error": self.to_string(),
                "code": "UNAUTHORIZED"
            })),

            // 404 - Not Found
            AppError::NotFound(_) | AppError::UserNotFound | AppError::NothingToExport => {
                HttpResponse::NotFound().json(json!({
                    "error": self.to_string(),
                    "code": "NOT_FOUND"
                }))
            }

            // 409 - Conflict
            AppError::EmailAlreadyRegistered | AppError::UsernameTaken => {
                HttpResponse::Conflict().json(json!({
                    "error": self.to_string(),
                    "code": "CONFLICT"
                }))
            }

            // 410 - Gone : le code a existé mais n'est plus utilisable
            AppError::OtpExpired => HttpResponse::Gone().json(json!({
                "error": self.to_string(),
                "code": "OTP_EXPIRED"
            })),

            // 422 - Unprocessable Entity
            AppError::InvalidOtp | AppError::PendingRegistrationNotFound => {
                HttpResponse::UnprocessableEntity().json(json!({
                    "error": self.to_string(),
                    "code": "UNPROCESSABLE_ENTITY"
                }))
            }

            // 500 - Internal Server Error
            _ => {
                tracing::error!("Internal server error: {}", self);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error",
                    "code": "INTERNAL_ERROR"
                }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializeError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ModelArtifact(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let error_messages: Vec<String> = errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect();

        AppError::Validation(messages.join("; "))
    }
}

// Type de résultat standard
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            AppError::Unauthorized.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::EmailAlreadyRegistered.error_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidOtp.error_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::OtpExpired.error_response().status(),
            StatusCode::GONE
        );
        assert_eq!(
            AppError::NothingToExport.error_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
