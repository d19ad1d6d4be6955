pub mod auth;
pub mod eligibility;
pub mod exports;
pub mod extractors;
pub mod insights;
pub mod predictions;
pub mod users;

pub use extractors::AuthenticatedUser;

use actix_web::web;

/// Configure toutes les routes de l'API
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Routes publiques (authentification en deux temps)
            .configure(auth::configure_routes)
            // Routes protégées : chaque handler exige un AuthenticatedUser
            .configure(users::configure_routes)
            .configure(predictions::configure_routes)
            .configure(exports::configure_routes)
            .configure(insights::configure_routes)
            .configure(eligibility::configure_routes),
    );

    // Endpoint de santé
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

/// Endpoint de santé pour monitoring
async fn health_check() -> impl actix_web::Responder {
    actix_web::HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("RUN_MODE").unwrap_or_else(|_| "production".to_string())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test::init_service(
            App::new().service(web::resource("/health").route(web::get().to(health_check))),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["version"].is_string());
    }
}
