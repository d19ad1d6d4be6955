use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loan_prediction_platform::api;
use loan_prediction_platform::core::{
    InsightService, JwtSettings, NotificationService, OtpService, PredictionService, UserService,
};
use loan_prediction_platform::workers::{start_cleanup_worker, CleanupConfig};
use loan_prediction_platform::{Config, Database, LoanClassifier};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialisation du logging
    setup_tracing();
    info!("🚀 Démarrage de Loan Prediction Platform Backend");

    // Chargement de la configuration
    let config = Config::from_env().expect("❌ Impossible de charger la configuration");
    info!("✅ Configuration chargée avec succès");
    info!("🔧 Mode: {}", config.run_mode);

    // Initialisation de la base de données
    let db = Database::new(&config)
        .await
        .expect("❌ Impossible de se connecter à la base de données");

    db.run_migrations()
        .await
        .expect("❌ Impossible d'exécuter les migrations");
    info!("✅ Migrations exécutées");

    // Chargement de l'artefact du classifieur (une fois, au démarrage)
    let classifier = Arc::new(
        LoanClassifier::load(&config.model_path)
            .expect("❌ Impossible de charger l'artefact du modèle"),
    );
    info!(
        "✅ Artefact du modèle chargé: {} arbres ({})",
        classifier.forest.len(),
        config.model_path
    );

    // Construction des services
    let notifier = NotificationService::from_config(&config);
    let otp_service = OtpService::new(db.clone(), notifier, config.otp_expiry_minutes);

    let jwt = JwtSettings {
        secret: config.jwt_secret.clone(),
        access_expiry_hours: config.jwt_access_token_expiry_hours,
        refresh_expiry_days: config.jwt_refresh_token_expiry_days,
    };

    let user_service = web::Data::new(UserService::new(db.clone(), otp_service, jwt));
    let prediction_service = web::Data::new(PredictionService::new(db.clone(), classifier));
    let insight_service = web::Data::new(InsightService::new(db.clone()));
    let config_data = web::Data::new(config.clone());

    // Démarrage du worker de nettoyage background
    start_cleanup_worker(
        CleanupConfig {
            pending_retention_hours: config.pending_registration_retention_hours,
            interval_seconds: config.cleanup_interval_seconds,
        },
        db.clone(),
    );

    // Configuration du serveur Actix-Web
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .app_data(config_data.clone())
            .app_data(user_service.clone())
            .app_data(prediction_service.clone())
            .app_data(insight_service.clone())
            .configure(api::config)
            .default_service(web::route().to(|| async {
                "🚀 Loan Prediction Platform Backend est en cours d'exécution!"
            }))
    })
    .bind(format!("{}:{}", config.server_host, config.server_port))?
    .workers(config.workers)
    .shutdown_timeout(10);

    info!("✅ Backend démarré avec succès!");
    info!(
        "🔗 API disponible sur http://{}:{}",
        config.server_host, config.server_port
    );

    server.run().await
}

/// Configure le tracing pour le logging structuré
fn setup_tracing() {
    let log_level = env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".into());

    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with(if log_format == "json" {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        } else {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_line_number(true)
                    .with_file(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        });

    subscriber.init();
}
