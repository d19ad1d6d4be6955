// api/exports.rs
use crate::api::extractors::AuthenticatedUser;
use crate::core::export_service::ExportService;
use crate::core::prediction_service::PredictionService;
use crate::core::user_service::UserService;
use crate::utils::error::Result;
use actix_web::{http::header, web, HttpResponse};

/// Configure les routes d'export de rapports
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/export")
            .route("/pdf", web::get().to(export_pdf))
            .route("/excel", web::get().to(export_excel)),
    );
}

/// Télécharge l'historique au format PDF
async fn export_pdf(
    user: AuthenticatedUser,
    user_service: web::Data<UserService>,
    prediction_service: web::Data<PredictionService>,
) -> Result<HttpResponse> {
    let profile = user_service.get_user_profile(user.user_id).await?;
    let predictions = prediction_service.history(user.user_id).await?;

    let bytes = ExportService::export_pdf(&profile, &predictions)?;
    let filename = ExportService::pdf_filename(&profile.username);

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/pdf"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes))
}

/// Télécharge l'historique au format Excel
async fn export_excel(
    user: AuthenticatedUser,
    user_service: web::Data<UserService>,
    prediction_service: web::Data<PredictionService>,
) -> Result<HttpResponse> {
    let profile = user_service.get_user_profile(user.user_id).await?;
    let predictions = prediction_service.history(user.user_id).await?;

    let bytes = ExportService::export_excel(&profile, &predictions)?;
    let filename = ExportService::excel_filename(&profile.username);

    Ok(HttpResponse::Ok()
        .insert_header((
            header::CONTENT_TYPE,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes))
}
