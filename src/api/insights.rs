// api/insights.rs
use crate::api::extractors::AuthenticatedUser;
use crate::core::insight_service::{InsightService, DEFAULT_TREND_DAYS};
use crate::models::NewScoreEntry;
use crate::utils::error::{AppError, Result};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

/// Configure les routes d'analyse du profil de crédit
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/insights")
            .route("/credit-health", web::get().to(credit_health))
            .route("/issues", web::get().to(issues))
            .route("/readiness", web::get().to(readiness))
            .route("/improvement-plan", web::get().to(improvement_plan))
            .route("/score-trend", web::get().to(score_trend))
            .route("/score", web::post().to(record_score)),
    );
}

/// Score de santé de crédit global (0 à 100)
async fn credit_health(
    user: AuthenticatedUser,
    insight_service: web::Data<InsightService>,
) -> Result<HttpResponse> {
    let health = insight_service.credit_health(user.user_id).await?;
    Ok(HttpResponse::Ok().json(health))
}

/// Problèmes identifiés sur le profil
async fn issues(
    user: AuthenticatedUser,
    insight_service: web::Data<InsightService>,
) -> Result<HttpResponse> {
    let issues = insight_service.issues(user.user_id).await?;
    Ok(HttpResponse::Ok().json(issues))
}

/// Niveau de préparation au prêt avec la checklist des facteurs
async fn readiness(
    user: AuthenticatedUser,
    insight_service: web::Data<InsightService>,
) -> Result<HttpResponse> {
    let readiness = insight_service.readiness(user.user_id).await?;
    Ok(HttpResponse::Ok().json(readiness))
}

/// Plan d'amélioration personnalisé
async fn improvement_plan(
    user: AuthenticatedUser,
    insight_service: web::Data<InsightService>,
) -> Result<HttpResponse> {
    let plan = insight_service.improvement_plan(user.user_id).await?;
    Ok(HttpResponse::Ok().json(plan))
}

#[derive(Debug, Deserialize)]
struct TrendQuery {
    days: Option<i64>,
}

/// Courbe de tendance du score CIBIL (saisies manuelles + prédictions)
async fn score_trend(
    user: AuthenticatedUser,
    insight_service: web::Data<InsightService>,
    query: web::Query<TrendQuery>,
) -> Result<HttpResponse> {
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);
    if !(1..=3650).contains(&days) {
        return Err(AppError::Validation(
            "days must be between 1 and 3650".to_string(),
        ));
    }

    let trend = insight_service.score_trend(user.user_id, days).await?;
    Ok(HttpResponse::Ok().json(trend))
}

/// Enregistre une saisie manuelle de score CIBIL
async fn record_score(
    user: AuthenticatedUser,
    insight_service: web::Data<InsightService>,
    entry: web::Json<NewScoreEntry>,
) -> Result<HttpResponse> {
    entry.validate()?;

    let recorded = insight_service
        .record_score(user.user_id, entry.cibil_score)
        .await?;

    Ok(HttpResponse::Created().json(recorded))
}
