// core/mod.rs
pub mod export_service;
pub mod insight_service;
pub mod notification_service;
pub mod otp_service;
pub mod prediction_service;
pub mod user_service;

// Ré-exports pour faciliter l'import
pub use export_service::ExportService;
pub use insight_service::InsightService;
pub use notification_service::{ConsoleDelivery, NotificationService, OtpDelivery};
pub use otp_service::OtpService;
pub use prediction_service::PredictionService;
pub use user_service::{JwtSettings, UserService};
