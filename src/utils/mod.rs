// utils/mod.rs
pub mod config;
pub mod error;
pub mod security;
pub mod validation;

// Ré-exports pour faciliter l'import
pub use config::Config;
pub use error::{AppError, Result};
pub use security::{
    generate_access_token, generate_otp_code, generate_refresh_token, hash_password, otp_digest,
    validate_password_strength, verify_access_token, verify_password, verify_refresh_token,
};
