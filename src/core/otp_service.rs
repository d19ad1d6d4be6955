// core/otp_service.rs
use crate::core::notification_service::NotificationService;
use crate::infrastructure::database::Database;
use crate::models::{OtpChallenge, OtpPurpose};
use crate::utils::error::{AppError, Result};
use crate::utils::security::{generate_otp_code, otp_digest};
use chrono::{Duration, Utc};
use uuid::Uuid;

/// Gestion des codes OTP : émission, remise et vérification.
/// Un seul code actif par email ; l'émission invalide les codes précédents.
#[derive(Clone)]
pub struct OtpService {
    db: Database,
    notifier: NotificationService,
    expiry_minutes: i64,
}

impl OtpService {
    pub fn new(db: Database, notifier: NotificationService, expiry_minutes: i64) -> Self {
        Self {
            db,
            notifier,
            expiry_minutes,
        }
    }

    /// Émet un nouveau code pour cet email et le remet à l'utilisateur
    pub async fn issue(&self, email: &str, purpose: OtpPurpose) -> Result<()> {
        // Invalider les codes précédents (un seul code actif à la fois)
        self.db.invalidate_unused_otps(email).await?;

        let code = generate_otp_code();
        let now = Utc::now();

        let challenge = OtpChallenge {
            id: Uuid::new_v4(),
            email: email.to_string(),
            code_digest: otp_digest(&code),
            purpose,
            created_at: now,
            expires_at: now + Duration::minutes(self.expiry_minutes),
            is_used: false,
        };

        self.db.create_otp(&challenge).await?;

        tracing::info!("OTP émis pour {} ({})", email, purpose.label());
        self.notifier.send_otp(email, &code, purpose).await
    }

    /// Vérifie un code et le consomme en cas de succès
    pub async fn verify(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<()> {
        let challenge = self
            .db
            .find_active_otp(email, &otp_digest(code), purpose)
            .await?
            .ok_or(AppError::InvalidOtp)?;

        if challenge.is_expired(Utc::now()) {
            return Err(AppError::OtpExpired);
        }

        self.db.mark_otp_used(challenge.id).await?;
        Ok(())
    }
}
