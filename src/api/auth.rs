// api/auth.rs
use crate::core::user_service::UserService;
use crate::models::{NewUser, OtpVerification, UserLogin};
use crate::utils::error::Result;
use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

/// Configure les routes d'authentification
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            // Inscription (étape 1 : mot de passe, étape 2 : OTP)
            .route("/register", web::post().to(register))
            .route("/register/verify", web::post().to(verify_registration))
            // Connexion (étape 1 : mot de passe, étape 2 : OTP)
            .route("/login", web::post().to(login))
            .route("/login/verify", web::post().to(verify_login))
            // Rafraîchir token
            .route("/refresh", web::post().to(refresh_token))
            // Déconnexion
            .route("/logout", web::post().to(logout)),
    );
}

/// Démarre une inscription : le code OTP part vers la console (ou l'email)
async fn register(
    user_service: web::Data<UserService>,
    new_user: web::Json<NewUser>,
) -> Result<HttpResponse> {
    new_user.validate()?;

    user_service.begin_registration(&new_user).await?;

    Ok(HttpResponse::Accepted().json(json!({
        "message": "OTP sent to your email! Check console for demo."
    })))
}

/// Termine une inscription avec le code OTP
async fn verify_registration(
    user_service: web::Data<UserService>,
    verification: web::Json<OtpVerification>,
) -> Result<HttpResponse> {
    verification.validate()?;

    let user = user_service
        .complete_registration(&verification.email, &verification.code)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Registration successful! Please login.",
        "user": user.to_profile()
    })))
}

/// Démarre une connexion : mot de passe puis OTP
async fn login(
    user_service: web::Data<UserService>,
    credentials: web::Json<UserLogin>,
) -> Result<HttpResponse> {
    credentials.validate()?;

    user_service
        .begin_login(&credentials.email, &credentials.password)
        .await?;

    Ok(HttpResponse::Accepted().json(json!({
        "message": "OTP sent to your email! Check console for demo."
    })))
}

/// Termine une connexion : vérifie le code et délivre les tokens
async fn verify_login(
    user_service: web::Data<UserService>,
    verification: web::Json<OtpVerification>,
) -> Result<HttpResponse> {
    verification.validate()?;

    let (_user, token) = user_service
        .complete_login(&verification.email, &verification.code)
        .await?;

    Ok(HttpResponse::Ok().json(token))
}

/// Rafraîchir la paire de tokens JWT
async fn refresh_token(
    user_service: web::Data<UserService>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse> {
    let token = user_service
        .refresh_auth_token(&request.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(token))
}

/// Déconnexion : l'invalidation réelle se fait côté client en supprimant
/// les tokens
async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Logged out successfully!" }))
}

// Structures de requête spécifiques
#[derive(Debug, serde::Deserialize)]
struct RefreshTokenRequest {
    refresh_token: String,
}
