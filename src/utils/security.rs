// utils/security.rs
use crate::utils::error::{AppError, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims JWT pour les tokens d'accès
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: Uuid,        // User ID
    pub email: String,    // User email
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at timestamp
    pub jti: String,      // Token ID (pour invalidation)
}

/// Claims JWT pour les refresh tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: Uuid,        // User ID
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at timestamp
    pub jti: String,      // Token ID
}

/// Générer un token d'accès JWT
pub fn generate_access_token(user_id: Uuid, email: &str, secret: &str, expiry_hours: i64) -> String {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::hours(expiry_hours);

    let claims = AccessTokenClaims {
        sub: user_id,
        email: email.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to generate access token")
}

/// Générer un refresh token JWT
pub fn generate_refresh_token(user_id: Uuid, secret: &str, expiry_days: i64) -> String {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::days(expiry_days);

    let claims = RefreshTokenClaims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to generate refresh token")
}

/// Vérifier un token d'accès
pub fn verify_access_token(token: &str, secret: &str) -> Result<TokenData<AccessTokenClaims>> {
    let token_data = decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data)
}

/// Vérifier un refresh token
pub fn verify_refresh_token(token: &str, secret: &str) -> Result<TokenData<RefreshTokenClaims>> {
    let token_data = decode::<RefreshTokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data)
}

/// Générer un hash de mot de passe avec Argon2
pub fn hash_password(password: &str) -> Result<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
        Argon2,
    };

    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Vérifier un mot de passe contre un hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    use argon2::{
        password_hash::{PasswordHash, PasswordVerifier},
        Argon2,
    };

    let argon2 = Argon2::default();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Générer un code OTP à 6 chiffres
pub fn generate_otp_code() -> String {
    use rand::Rng;

    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", code)
}

/// Empreinte SHA256 d'un code OTP (jamais stocké en clair)
pub fn otp_digest(code: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Valider la force d'un mot de passe
pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    let score = [has_lowercase, has_uppercase, has_digit, has_special]
        .iter()
        .filter(|&&x| x)
        .count();

    if score < 3 {
        return Err(AppError::Validation(
            "Password must contain at least 3 of: lowercase, uppercase, digits, special characters"
                .to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "une-clef-de-test-suffisamment-longue";

    #[test]
    fn test_access_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "test@example.com", SECRET, 2);

        let data = verify_access_token(&token, SECRET).unwrap();
        assert_eq!(data.claims.sub, user_id);
        assert_eq!(data.claims.email, "test@example.com");
    }

    #[test]
    fn test_access_token_rejects_wrong_secret() {
        let token = generate_access_token(Uuid::new_v4(), "test@example.com", SECRET, 2);
        assert!(verify_access_token(&token, "autre-secret-completement-different").is_err());
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = generate_refresh_token(user_id, SECRET, 7);

        let data = verify_refresh_token(&token, SECRET).unwrap();
        assert_eq!(data.claims.sub, user_id);
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("S3cure!pass").unwrap();
        assert!(verify_password("S3cure!pass", &hash).unwrap());
        assert!(!verify_password("wrongpass", &hash).unwrap());
    }

    #[test]
    fn test_otp_code_format() {
        for _ in 0..50 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_otp_digest_is_stable_and_hex() {
        let a = otp_digest("123456");
        let b = otp_digest("123456");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, otp_digest("654321"));
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Abcdef1!").is_ok());
        assert!(validate_password_strength("short").is_err());
        assert!(validate_password_strength("alllowercase").is_err());
    }
}
