// utils/config.rs
use crate::utils::error::{AppError, Result};
use dotenv::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Environnement et serveur
    pub run_mode: String,
    pub server_host: String,
    pub server_port: u16,
    pub workers: usize,
    pub log_level: String,
    pub logging_format: String,

    // Base de données
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connection_timeout: u64,

    // Sécurité
    pub jwt_secret: String,
    pub jwt_access_token_expiry_hours: i64,
    pub jwt_refresh_token_expiry_days: i64,

    // OTP
    pub otp_expiry_minutes: i64,
    pub otp_delivery: String,

    // Modèle de prédiction
    pub model_path: String,

    // Email (utilisé seulement si otp_delivery = "email")
    pub email_from: String,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,

    // Maintenance
    pub cleanup_interval_seconds: u64,
    pub pending_registration_retention_hours: i64,
}

impl Config {
    /// Charger la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self> {
        // Charger le fichier .env si présent
        let _ = dotenv().ok();

        // Variables requises
        let required_vars = ["DATABASE_URL", "JWT_SECRET"];

        for var in &required_vars {
            if env::var(var).is_err() {
                return Err(AppError::Validation(format!(
                    "Variable d'environnement requise manquante: {}",
                    var
                )));
            }
        }

        let config = Config {
            // Environnement et serveur
            run_mode: env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| AppError::Validation("SERVER_PORT must be a number".to_string()))?,
            workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .map_err(|_| AppError::Validation("WORKERS must be a number".to_string()))?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            logging_format: env::var("LOGGING_FORMAT").unwrap_or_else(|_| "compact".to_string()),

            // Base de données
            database_url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Validation("DATABASE_URL missing".to_string()))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("DATABASE_MAX_CONNECTIONS must be a number".to_string())
                })?,
            database_min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("DATABASE_MIN_CONNECTIONS must be a number".to_string())
                })?,
            database_connection_timeout: env::var("DATABASE_CONNECTION_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("DATABASE_CONNECTION_TIMEOUT must be a number".to_string())
                })?,

            // Sécurité
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| AppError::Validation("JWT_SECRET missing".to_string()))?,
            jwt_access_token_expiry_hours: env::var("JWT_ACCESS_TOKEN_EXPIRY_HOURS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("JWT_ACCESS_TOKEN_EXPIRY_HOURS must be a number".to_string())
                })?,
            jwt_refresh_token_expiry_days: env::var("JWT_REFRESH_TOKEN_EXPIRY_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("JWT_REFRESH_TOKEN_EXPIRY_DAYS must be a number".to_string())
                })?,

            // OTP
            otp_expiry_minutes: env::var("OTP_EXPIRY_MINUTES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("OTP_EXPIRY_MINUTES must be a number".to_string())
                })?,
            otp_delivery: env::var("OTP_DELIVERY").unwrap_or_else(|_| "console".to_string()),

            // Modèle de prédiction
            model_path: env::var("MODEL_PATH").unwrap_or_else(|_| "loan_model.json".to_string()),

            // Email
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@loan-prediction.io".to_string()),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT").ok().and_then(|p| p.parse().ok()),
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),

            // Maintenance
            cleanup_interval_seconds: env::var("CLEANUP_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation("CLEANUP_INTERVAL_SECONDS must be a number".to_string())
                })?,
            pending_registration_retention_hours: env::var("PENDING_REGISTRATION_RETENTION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Validation(
                        "PENDING_REGISTRATION_RETENTION_HOURS must be a number".to_string(),
                    )
                })?,
        };

        Ok(config)
    }

    /// Vérifier si on est en production
    pub fn is_production(&self) -> bool {
        self.run_mode == "production"
    }

    /// Vérifier si on est en développement
    pub fn is_development(&self) -> bool {
        self.run_mode == "development"
    }
}
