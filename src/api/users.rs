// api/users.rs
use crate::api::extractors::AuthenticatedUser;
use crate::core::user_service::UserService;
use crate::models::ChangePassword;
use crate::utils::error::Result;
use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

/// Configure les routes du profil utilisateur
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/me", web::get().to(me))
            .route("/me/password", web::put().to(change_password)),
    );
}

/// Profil de l'utilisateur connecté
async fn me(
    user: AuthenticatedUser,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse> {
    let profile = user_service.get_user_profile(user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Changement de mot de passe avec vérification de l'actuel
async fn change_password(
    user: AuthenticatedUser,
    user_service: web::Data<UserService>,
    request: web::Json<ChangePassword>,
) -> Result<HttpResponse> {
    request.validate()?;

    user_service
        .change_password(user.user_id, &request.current_password, &request.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}
