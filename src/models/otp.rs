use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Finalité d'un code OTP
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "otp_purpose", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Register, // Vérification d'une inscription
    Login,    // Second facteur de connexion
}

impl OtpPurpose {
    /// Libellé affiché dans la bannière console
    pub fn label(&self) -> &'static str {
        match self {
            OtpPurpose::Register => "REGISTRATION",
            OtpPurpose::Login => "LOGIN",
        }
    }
}

/// Code OTP stocké en base (empreinte uniquement, jamais le code en clair)
#[derive(Debug, Clone, FromRow)]
pub struct OtpChallenge {
    pub id: Uuid,
    pub email: String,
    pub code_digest: String,
    pub purpose: OtpPurpose,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
}

impl OtpChallenge {
    /// Vérifie si le code est encore dans sa fenêtre de validité
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
