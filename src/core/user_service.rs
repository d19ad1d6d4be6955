// core/user_service.rs
use crate::core::otp_service::OtpService;
use crate::infrastructure::database::Database;
use crate::models::{AuthToken, NewUser, OtpPurpose, User, UserProfile};
use crate::utils::error::{AppError, Result};
use crate::utils::security::{self, hash_password, verify_password};
use chrono::Utc;
use uuid::Uuid;

/// Paramètres JWT injectés depuis la configuration
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_expiry_hours: i64,
    pub refresh_expiry_days: i64,
}

/// Cycle de vie des comptes : inscription et connexion en deux temps
/// (mot de passe puis OTP), émission et rafraîchissement des tokens.
#[derive(Clone)]
pub struct UserService {
    db: Database,
    otp: OtpService,
    jwt: JwtSettings,
}

impl UserService {
    pub fn new(db: Database, otp: OtpService, jwt: JwtSettings) -> Self {
        Self { db, otp, jwt }
    }

    /// Démarre une inscription : contrôle d'unicité puis émission d'un OTP.
    /// Le compte n'est créé qu'après vérification du code.
    pub async fn begin_registration(&self, new_user: &NewUser) -> Result<()> {
        if self.db.user_exists_by_email(&new_user.email).await? {
            return Err(AppError::EmailAlreadyRegistered);
        }

        if self.db.username_taken(&new_user.username).await? {
            return Err(AppError::UsernameTaken);
        }

        security::validate_password_strength(&new_user.password)?;

        let password_hash = hash_password(&new_user.password)?;
        self.db
            .upsert_pending_registration(&new_user.email, &new_user.username, &password_hash)
            .await?;

        self.otp.issue(&new_user.email, OtpPurpose::Register).await
    }

    /// Termine une inscription : vérifie le code puis crée le compte
    pub async fn complete_registration(&self, email: &str, code: &str) -> Result<User> {
        self.otp.verify(email, code, OtpPurpose::Register).await?;

        let pending = self.db.get_pending_registration(email).await?;

        // Re-contrôle d'unicité : l'email ou le nom a pu être pris entre-temps
        if self.db.user_exists_by_email(&pending.email).await? {
            return Err(AppError::EmailAlreadyRegistered);
        }
        if self.db.username_taken(&pending.username).await? {
            return Err(AppError::UsernameTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: pending.email.clone(),
            username: pending.username.clone(),
            password_hash: pending.password_hash.clone(),
            is_verified: true,
            created_at: Utc::now(),
            last_login_at: None,
        };

        let user = self.db.create_user(&user).await?;
        self.db.delete_pending_registration(email).await?;

        tracing::info!("Compte créé pour {}", user.email);
        Ok(user)
    }

    /// Démarre une connexion : vérifie le mot de passe puis émet un OTP.
    /// Aucun token n'est délivré avant la vérification du code.
    pub async fn begin_login(&self, email: &str, password: &str) -> Result<()> {
        let user = match self.db.get_user_by_email(email).await {
            Ok(user) => user,
            // Ne pas révéler si l'email existe ou non
            Err(AppError::UserNotFound) => return Err(AppError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        self.otp.issue(email, OtpPurpose::Login).await
    }

    /// Termine une connexion : vérifie le code puis délivre les tokens
    pub async fn complete_login(&self, email: &str, code: &str) -> Result<(User, AuthToken)> {
        self.otp.verify(email, code, OtpPurpose::Login).await?;

        let user = self.db.get_user_by_email(email).await?;
        self.db.update_user_last_login(user.id).await?;

        let token = self.generate_auth_token(&user);
        Ok((user, token))
    }

    /// Générer une paire de tokens JWT
    pub fn generate_auth_token(&self, user: &User) -> AuthToken {
        let access_token = security::generate_access_token(
            user.id,
            &user.email,
            &self.jwt.secret,
            self.jwt.access_expiry_hours,
        );

        let refresh_token = security::generate_refresh_token(
            user.id,
            &self.jwt.secret,
            self.jwt.refresh_expiry_days,
        );

        AuthToken {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_expiry_hours * 3600,
        }
    }

    /// Rafraîchir une paire de tokens
    pub async fn refresh_auth_token(&self, refresh_token: &str) -> Result<AuthToken> {
        let claims = security::verify_refresh_token(refresh_token, &self.jwt.secret)?;

        let user = self.db.get_user_by_id(claims.claims.sub).await?;
        Ok(self.generate_auth_token(&user))
    }

    /// Obtenir le profil utilisateur
    pub async fn get_user_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        let user = self.db.get_user_by_id(user_id).await?;
        Ok(user.to_profile())
    }

    /// Changer le mot de passe (avec vérification de l'actuel)
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self.db.get_user_by_id(user_id).await?;

        if !verify_password(current_password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        security::validate_password_strength(new_password)?;

        let password_hash = hash_password(new_password)?;
        self.db.update_user_password(user_id, &password_hash).await?;

        Ok(())
    }
}
