// core/notification_service.rs
use crate::models::OtpPurpose;
use crate::utils::config::Config;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Canal de remise d'un code OTP
#[async_trait]
pub trait OtpDelivery: Send + Sync {
    async fn deliver(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<()>;
}

/// Remise console : affiche le code en clair dans le terminal du serveur.
/// C'est le canal par défaut (flux de démonstration, pas d'infrastructure email).
pub struct ConsoleDelivery {
    expiry_minutes: i64,
}

impl ConsoleDelivery {
    pub fn new(expiry_minutes: i64) -> Self {
        Self { expiry_minutes }
    }
}

#[async_trait]
impl OtpDelivery for ConsoleDelivery {
    async fn deliver(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<()> {
        let banner = "=".repeat(70);

        println!(
            r#"
{banner}

    🔐 LOAN PREDICTION SYSTEM - OTP VERIFICATION

    Email: {email}
    Purpose: {purpose}

    ╔═══════════════════════════════════════════╗
    ║                                           ║
    ║          YOUR OTP CODE: {code}            ║
    ║                                           ║
    ╚═══════════════════════════════════════════╝

    ⏰ This OTP is valid for {expiry} minutes
    🔒 Do not share this code with anyone

{banner}
"#,
            banner = banner,
            email = email,
            purpose = purpose.label(),
            code = code,
            expiry = self.expiry_minutes,
        );

        // Aussi sur stderr pour rester visible selon le mode du terminal
        eprintln!("\n⚡ OTP GENERATED: {} for {}\n", code, email);

        Ok(())
    }
}

/// Remise par email SMTP (feature `email`)
#[cfg(feature = "email")]
pub struct SmtpDelivery {
    mailer: lettre::SmtpTransport,
    from: lettre::message::Mailbox,
    expiry_minutes: i64,
}

#[cfg(feature = "email")]
impl SmtpDelivery {
    pub fn from_config(config: &Config) -> Result<Self> {
        use crate::utils::error::AppError;
        use lettre::transport::smtp::authentication::Credentials;

        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| AppError::NotificationError("SMTP_HOST missing".to_string()))?;

        let mut builder = lettre::SmtpTransport::relay(host)
            .map_err(|e| AppError::NotificationError(e.to_string()))?;

        if let Some(port) = config.smtp_port {
            builder = builder.port(port);
        }

        if let (Some(username), Some(password)) =
            (config.smtp_username.clone(), config.smtp_password.clone())
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        let from = config
            .email_from
            .parse()
            .map_err(|_| AppError::NotificationError("EMAIL_FROM invalide".to_string()))?;

        Ok(Self {
            mailer: builder.build(),
            from,
            expiry_minutes: config.otp_expiry_minutes,
        })
    }
}

#[cfg(feature = "email")]
#[async_trait]
impl OtpDelivery for SmtpDelivery {
    async fn deliver(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<()> {
        use crate::utils::error::AppError;
        use lettre::{Message, Transport};

        let message = Message::builder()
            .from(self.from.clone())
            .to(email
                .parse()
                .map_err(|_| AppError::NotificationError("adresse invalide".to_string()))?)
            .subject(format!("Your OTP code ({})", purpose.label()))
            .body(format!(
                "Your OTP code: {}\n\nThis code is valid for {} minutes.\nDo not share it with anyone.",
                code, self.expiry_minutes
            ))
            .map_err(|e| AppError::NotificationError(e.to_string()))?;

        self.mailer
            .send(&message)
            .map_err(|e| AppError::NotificationError(e.to_string()))?;

        Ok(())
    }
}

/// Service de notification : choisit le canal selon la configuration
#[derive(Clone)]
pub struct NotificationService {
    delivery: Arc<dyn OtpDelivery>,
}

impl NotificationService {
    pub fn new(delivery: Arc<dyn OtpDelivery>) -> Self {
        Self { delivery }
    }

    /// Construit le service depuis la configuration (console par défaut)
    pub fn from_config(config: &Config) -> Self {
        #[cfg(feature = "email")]
        if config.otp_delivery == "email" {
            match SmtpDelivery::from_config(config) {
                Ok(delivery) => {
                    return Self {
                        delivery: Arc::new(delivery),
                    }
                }
                Err(e) => {
                    tracing::warn!("⚠️  SMTP indisponible ({}), bascule en mode console", e);
                }
            }
        }

        #[cfg(not(feature = "email"))]
        if config.otp_delivery == "email" {
            tracing::warn!(
                "⚠️  OTP_DELIVERY=email mais la feature 'email' n'est pas compilée - mode console"
            );
        }

        Self {
            delivery: Arc::new(ConsoleDelivery::new(config.otp_expiry_minutes)),
        }
    }

    /// Remet un code OTP à l'utilisateur
    pub async fn send_otp(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<()> {
        self.delivery.deliver(email, code, purpose).await
    }
}
