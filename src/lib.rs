// src/lib.rs
// Modules principaux
pub mod api;
pub mod core;
pub mod infrastructure;
pub mod models;
pub mod utils;
pub mod workers;

// Ré-exports pour faciliter l'utilisation
pub use infrastructure::{Database, LoanClassifier};
pub use utils::{AppError, Config, Result};

// Version de l'application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Loan Prediction Platform";

// Types communs
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;

// Configuration par défaut pour les tests
#[cfg(test)]
pub mod test_utils {
    use std::sync::Once;

    static INIT: Once = Once::new();

    pub fn init_test_logging() {
        INIT.call_once(|| {
            tracing_subscriber::fmt().with_test_writer().init();
        });
    }
}
