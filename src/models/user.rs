use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Représente un utilisateur du système
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identifiant unique de l'utilisateur (UUID)
    pub id: Uuid,

    /// Email de l'utilisateur (unique) - utilisé pour la connexion
    pub email: String,

    /// Nom d'utilisateur public (unique)
    pub username: String,

    /// Hash du mot de passe (stocké sécurisé)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Compte vérifié par OTP
    pub is_verified: bool,

    /// Date de création du compte
    pub created_at: DateTime<Utc>,

    /// Date de dernière connexion
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Inscription en attente de vérification OTP
#[derive(Debug, Clone, FromRow)]
pub struct PendingRegistration {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Données requises pour démarrer une inscription
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email(message = "Format d'email invalide"))]
    pub email: String,

    #[validate(length(min = 3, max = 80, message = "Le nom d'utilisateur doit contenir entre 3 et 80 caractères"))]
    pub username: String,

    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub password: String,
}

/// Données pour la connexion d'un utilisateur
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserLogin {
    #[validate(email(message = "Format d'email invalide"))]
    pub email: String,

    pub password: String,
}

/// Vérification d'un code OTP (inscription ou connexion)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OtpVerification {
    #[validate(email(message = "Format d'email invalide"))]
    pub email: String,

    #[validate(custom = "crate::utils::validation::validate_otp_code")]
    pub code: String,
}

/// Changement de mot de passe (utilisateur connecté)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePassword {
    pub current_password: String,

    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub new_password: String,
}

/// Token JWT pour l'authentification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Données du profil utilisateur
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Convertit en profil public
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            is_verified: self.is_verified,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new_user() -> NewUser {
        NewUser {
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            password: "securepassword".to_string(),
        }
    }

    #[test]
    fn test_new_user_validation() {
        assert!(valid_new_user().validate().is_ok());

        let mut bad_email = valid_new_user();
        bad_email.email = "pas-un-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_password = valid_new_user();
        short_password.password = "court".to_string();
        assert!(short_password.validate().is_err());

        let mut short_username = valid_new_user();
        short_username.username = "ab".to_string();
        assert!(short_username.validate().is_err());
    }

    #[test]
    fn test_otp_verification_validation() {
        let ok = OtpVerification {
            email: "test@example.com".to_string(),
            code: "123456".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = OtpVerification {
            email: "test@example.com".to_string(),
            code: "12ab56".to_string(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_profile_hides_nothing_needed() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            password_hash: "$argon2id$...".to_string(),
            is_verified: true,
            created_at: Utc::now(),
            last_login_at: None,
        };

        let profile = user.to_profile();
        assert_eq!(profile.email, user.email);
        assert_eq!(profile.username, user.username);

        // Le hash ne doit jamais apparaître dans la sérialisation de l'utilisateur
        let serialized = serde_json::to_string(&user).unwrap();
        assert!(!serialized.contains("argon2id"));
        assert!(!serialized.contains("password_hash"));
    }
}
