// api/predictions.rs
use crate::api::extractors::AuthenticatedUser;
use crate::core::insight_service::{calculate_feature_importance, generate_recommendations};
use crate::core::prediction_service::PredictionService;
use crate::models::{LoanApplication, PredictionReport};
use crate::utils::error::Result;
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Configure les routes de prédiction
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/predictions")
            // Soumettre un formulaire au classifieur
            .route("", web::post().to(predict))
            // Historique complet
            .route("", web::get().to(history))
            // Tableau de bord (statistiques + séries graphiques)
            .route("/dashboard", web::get().to(dashboard))
            // Analyse détaillée de l'historique
            .route("/analytics", web::get().to(analytics)),
    );
}

/// Exécute l'inférence, enregistre le résultat et retourne le rapport
/// complet : verdict, probabilité, recommandations et importance des
/// variables
async fn predict(
    user: AuthenticatedUser,
    prediction_service: web::Data<PredictionService>,
    application: web::Json<LoanApplication>,
) -> Result<HttpResponse> {
    application.validate()?;

    let saved = prediction_service
        .predict(user.user_id, &application)
        .await?;

    let (recommendations, tips) = generate_recommendations(&application, saved.outcome);
    let feature_importance = calculate_feature_importance(&application);

    let report = PredictionReport {
        prediction_id: saved.id,
        outcome: saved.outcome,
        probability: saved.probability,
        recommendations,
        tips,
        feature_importance,
    };

    Ok(HttpResponse::Created().json(report))
}

/// Historique de l'utilisateur, du plus récent au plus ancien
async fn history(
    user: AuthenticatedUser,
    prediction_service: web::Data<PredictionService>,
) -> Result<HttpResponse> {
    let predictions = prediction_service.history(user.user_id).await?;
    Ok(HttpResponse::Ok().json(predictions))
}

/// Tableau de bord de l'utilisateur
async fn dashboard(
    user: AuthenticatedUser,
    prediction_service: web::Data<PredictionService>,
) -> Result<HttpResponse> {
    let data = prediction_service.dashboard(user.user_id).await?;
    Ok(HttpResponse::Ok().json(data))
}

/// Données de la page analytics
async fn analytics(
    user: AuthenticatedUser,
    prediction_service: web::Data<PredictionService>,
) -> Result<HttpResponse> {
    let data = prediction_service.analytics(user.user_id).await?;
    Ok(HttpResponse::Ok().json(data))
}
