// api/eligibility.rs
use crate::api::extractors::AuthenticatedUser;
use crate::core::insight_service::check_eligibility;
use crate::models::EligibilityRequest;
use crate::utils::error::Result;
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Configure la route de pré-qualification rapide
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/eligibility").route("", web::post().to(calculate_eligibility)));
}

/// Vérification d'éligibilité rapide, sans passer par le classifieur
async fn calculate_eligibility(
    _user: AuthenticatedUser,
    request: web::Json<EligibilityRequest>,
) -> Result<HttpResponse> {
    request.validate()?;

    let report = check_eligibility(&request);
    Ok(HttpResponse::Ok().json(report))
}
