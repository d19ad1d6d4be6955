use std::time::Duration;
use tracing::{error, info};

use crate::infrastructure::database::Database;
use crate::utils::error::Result;

/// Configuration du worker de nettoyage
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Durée de rétention des inscriptions jamais vérifiées (heures)
    pub pending_retention_hours: i64,
    /// Intervalle entre les cycles de nettoyage (secondes)
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            pending_retention_hours: 24,
            interval_seconds: 300, // 5 minutes
        }
    }
}

/// Worker de nettoyage background : purge les codes OTP expirés ou
/// consommés et les inscriptions jamais vérifiées
pub struct CleanupWorker {
    config: CleanupConfig,
    db: Database,
}

impl CleanupWorker {
    /// Crée une nouvelle instance du worker
    pub fn new(config: CleanupConfig, db: Database) -> Self {
        Self { config, db }
    }

    /// Démarre le worker en boucle infinie
    pub async fn start(self) {
        info!("🔧 Worker de nettoyage démarré avec config: {:?}", self.config);

        loop {
            match self.run_cleanup_cycle().await {
                Ok(_) => {
                    info!("✅ Cycle de nettoyage terminé avec succès");
                }
                Err(e) => {
                    error!("❌ Erreur lors du cycle de nettoyage: {}", e);
                }
            }

            // Attendre avant le prochain cycle
            tokio::time::sleep(Duration::from_secs(self.config.interval_seconds)).await;
        }
    }

    /// Exécute un cycle complet de nettoyage
    async fn run_cleanup_cycle(&self) -> Result<()> {
        info!("🔄 Démarrage du cycle de nettoyage...");

        // 1. Purger les codes OTP expirés ou consommés
        self.cleanup_otps().await?;

        // 2. Purger les inscriptions jamais vérifiées
        self.cleanup_pending_registrations().await?;

        Ok(())
    }

    /// Purger les codes OTP expirés ou déjà consommés
    async fn cleanup_otps(&self) -> Result<()> {
        let deleted = self.db.delete_expired_otps(chrono::Utc::now()).await?;

        if deleted > 0 {
            info!("🧹 {} codes OTP purgés", deleted);
        }

        Ok(())
    }

    /// Purger les inscriptions en attente plus anciennes que la rétention
    async fn cleanup_pending_registrations(&self) -> Result<()> {
        let cutoff =
            chrono::Utc::now() - chrono::Duration::hours(self.config.pending_retention_hours);

        let deleted = self.db.delete_stale_pending_registrations(cutoff).await?;

        if deleted > 0 {
            info!("🧹 {} inscriptions jamais vérifiées purgées", deleted);
        }

        Ok(())
    }
}

/// Démarrage du worker de nettoyage dans une tâche Tokio séparée
pub fn start_cleanup_worker(config: CleanupConfig, db: Database) {
    info!("🔧 Initialisation du worker de nettoyage...");

    let worker = CleanupWorker::new(config, db);

    tokio::spawn(async move {
        worker.start().await;
    });
}
