// api/extractors.rs
use crate::utils::config::Config;
use crate::utils::error::AppError;
use crate::utils::security::verify_access_token;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

/// Utilisateur authentifié, extrait du token Bearer de la requête.
/// Les handlers protégés le prennent en paramètre ; une requête sans token
/// valide est rejetée en 401 avant d'atteindre le handler.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = extract(req).map_err(actix_web::Error::from);
        ready(result)
    }
}

fn extract(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or(AppError::Internal)?;

    let token_data = verify_access_token(token, &config.jwt_secret)?;

    Ok(AuthenticatedUser {
        user_id: token_data.claims.sub,
        email: token_data.claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::security::generate_access_token;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    fn test_config() -> Config {
        Config {
            run_mode: "test".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            workers: 1,
            log_level: "info".to_string(),
            logging_format: "compact".to_string(),
            database_url: "postgres://localhost/test".to_string(),
            database_max_connections: 5,
            database_min_connections: 1,
            database_connection_timeout: 5,
            jwt_secret: "une-clef-de-test-suffisamment-longue".to_string(),
            jwt_access_token_expiry_hours: 2,
            jwt_refresh_token_expiry_days: 7,
            otp_expiry_minutes: 10,
            otp_delivery: "console".to_string(),
            model_path: "loan_model.json".to_string(),
            email_from: "noreply@test".to_string(),
            smtp_host: None,
            smtp_port: None,
            smtp_username: None,
            smtp_password: None,
            cleanup_interval_seconds: 300,
            pending_registration_retention_hours: 24,
        }
    }

    async fn protected(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "email": user.email }))
    }

    #[actix_web::test]
    async fn test_valid_token_is_accepted() {
        let config = test_config();
        let token = generate_access_token(
            Uuid::new_v4(),
            "test@example.com",
            &config.jwt_secret,
            2,
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .route("/me", web::get().to(protected)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_missing_header_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .route("/me", web::get().to(protected)),
        )
        .await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_malformed_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .route("/me", web::get().to(protected)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((header::AUTHORIZATION, "Bearer pas-un-jwt"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .route("/me", web::get().to(protected)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
