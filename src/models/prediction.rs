use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::insight::{FeatureWeight, Recommendation};

/// Nombre de variables d'entrée du classifieur
pub const FEATURE_COUNT: usize = 11;

/// Verdict du classifieur
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "prediction_outcome", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Approved,
    Rejected,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Approved => write!(f, "Approved"),
            Outcome::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Formulaire de demande de prêt soumis au classifieur
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoanApplication {
    #[validate(range(min = 0, max = 20, message = "no_of_dependents hors limites"))]
    pub no_of_dependents: i32,

    #[validate(custom = "crate::utils::validation::validate_education")]
    pub education: String,

    #[validate(custom = "crate::utils::validation::validate_self_employed")]
    pub self_employed: String,

    #[validate(range(min = 0.0, message = "income_annum doit être positif"))]
    pub income_annum: f64,

    #[validate(range(min = 0.0, message = "loan_amount doit être positif"))]
    pub loan_amount: f64,

    #[validate(range(min = 1, max = 40, message = "loan_term hors limites (années)"))]
    pub loan_term: i32,

    #[validate(range(min = 300, max = 900, message = "cibil_score hors limites"))]
    pub cibil_score: i32,

    #[validate(range(min = 0.0))]
    pub residential_assets_value: f64,

    #[validate(range(min = 0.0))]
    pub commercial_assets_value: f64,

    #[validate(range(min = 0.0))]
    pub luxury_assets_value: f64,

    #[validate(range(min = 0.0))]
    pub bank_asset_value: f64,
}

impl LoanApplication {
    /// Vecteur de variables dans l'ordre attendu par l'artefact du modèle
    pub fn to_feature_vector(&self) -> [f64; FEATURE_COUNT] {
        let education_val = if self.education == "Graduate" { 1.0 } else { 0.0 };
        let self_employed_val = if self.self_employed == "Yes" { 1.0 } else { 0.0 };

        [
            self.no_of_dependents as f64,
            education_val,
            self_employed_val,
            self.income_annum,
            self.loan_amount,
            self.loan_term as f64,
            self.cibil_score as f64,
            self.residential_assets_value,
            self.commercial_assets_value,
            self.luxury_assets_value,
            self.bank_asset_value,
        ]
    }

    /// Somme de tous les actifs déclarés
    pub fn total_assets(&self) -> f64 {
        self.residential_assets_value
            + self.commercial_assets_value
            + self.luxury_assets_value
            + self.bank_asset_value
    }
}

/// Prédiction persistée dans l'historique
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub no_of_dependents: i32,
    pub education: String,
    pub self_employed: String,
    pub income_annum: f64,
    pub loan_amount: f64,
    pub loan_term: i32,
    pub cibil_score: i32,
    pub residential_assets_value: f64,
    pub commercial_assets_value: f64,
    pub luxury_assets_value: f64,
    pub bank_asset_value: f64,
    pub outcome: Outcome,
    /// Probabilité d'approbation en pourcentage, arrondie à 2 décimales
    pub probability: f64,
    pub created_at: DateTime<Utc>,
}

impl Prediction {
    pub fn is_approved(&self) -> bool {
        self.outcome == Outcome::Approved
    }

    /// Somme de tous les actifs déclarés
    pub fn total_assets(&self) -> f64 {
        self.residential_assets_value
            + self.commercial_assets_value
            + self.luxury_assets_value
            + self.bank_asset_value
    }

    /// Reconstruit le formulaire d'origine (pour les analyses a posteriori)
    pub fn to_application(&self) -> LoanApplication {
        LoanApplication {
            no_of_dependents: self.no_of_dependents,
            education: self.education.clone(),
            self_employed: self.self_employed.clone(),
            income_annum: self.income_annum,
            loan_amount: self.loan_amount,
            loan_term: self.loan_term,
            cibil_score: self.cibil_score,
            residential_assets_value: self.residential_assets_value,
            commercial_assets_value: self.commercial_assets_value,
            luxury_assets_value: self.luxury_assets_value,
            bank_asset_value: self.bank_asset_value,
        }
    }
}

/// Réponse complète d'une prédiction (verdict + explications)
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub prediction_id: Uuid,
    pub outcome: Outcome,
    pub probability: f64,
    pub recommendations: Vec<Recommendation>,
    pub tips: Vec<String>,
    pub feature_importance: Vec<FeatureWeight>,
}

/// Point de la série "tendance d'approbation" (10 dernières prédictions)
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub approved: u8,
}

/// Point de la série "montants demandés"
#[derive(Debug, Clone, Serialize)]
pub struct AmountPoint {
    pub date: String,
    pub amount: f64,
}

/// Point de la série "scores CIBIL"
#[derive(Debug, Clone, Serialize)]
pub struct ScorePoint {
    pub score: i32,
    pub result: Outcome,
}

/// Séries de données pour les graphiques du tableau de bord
#[derive(Debug, Clone, Serialize, Default)]
pub struct ChartData {
    pub approval_trend: Vec<TrendPoint>,
    pub loan_amounts: Vec<AmountPoint>,
    pub cibil_scores: Vec<ScorePoint>,
}

/// Tableau de bord utilisateur
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub total_predictions: usize,
    pub approved_count: usize,
    pub approval_rate: f64,
    pub recent_predictions: Vec<Prediction>,
    pub chart_data: ChartData,
}

/// Point détaillé pour la page analytics
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsPoint {
    pub date: String,
    pub result: Outcome,
    pub probability: f64,
    pub cibil_score: i32,
    pub loan_amount: f64,
    pub income: f64,
}

/// Agrégats de la page analytics
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    pub avg_cibil: f64,
    pub avg_loan: f64,
    pub predictions: Vec<AnalyticsPoint>,
}

/// Réponse analytics (has_data = false quand l'historique est vide)
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsData {
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalyticsSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_application() -> LoanApplication {
        LoanApplication {
            no_of_dependents: 2,
            education: "Graduate".to_string(),
            self_employed: "No".to_string(),
            income_annum: 900_000.0,
            loan_amount: 2_000_000.0,
            loan_term: 12,
            cibil_score: 720,
            residential_assets_value: 1_500_000.0,
            commercial_assets_value: 500_000.0,
            luxury_assets_value: 200_000.0,
            bank_asset_value: 300_000.0,
        }
    }

    #[test]
    fn test_application_validation() {
        assert!(sample_application().validate().is_ok());

        let mut bad = sample_application();
        bad.cibil_score = 1000;
        assert!(bad.validate().is_err());

        let mut bad = sample_application();
        bad.education = "College".to_string();
        assert!(bad.validate().is_err());

        let mut bad = sample_application();
        bad.loan_amount = -1.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_feature_vector_order() {
        let app = sample_application();
        let v = app.to_feature_vector();

        assert_eq!(v.len(), FEATURE_COUNT);
        assert_eq!(v[0], 2.0); // dépendants
        assert_eq!(v[1], 1.0); // Graduate
        assert_eq!(v[2], 0.0); // self_employed = No
        assert_eq!(v[3], 900_000.0);
        assert_eq!(v[6], 720.0); // CIBIL
        assert_eq!(v[10], 300_000.0);
    }

    #[test]
    fn test_feature_vector_categorical_encoding() {
        let mut app = sample_application();
        app.education = "Not Graduate".to_string();
        app.self_employed = "Yes".to_string();

        let v = app.to_feature_vector();
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], 1.0);
    }

    #[test]
    fn test_total_assets() {
        assert_eq!(sample_application().total_assets(), 2_500_000.0);
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(serde_json::to_string(&Outcome::Approved).unwrap(), "\"approved\"");
        assert_eq!(Outcome::Rejected.to_string(), "Rejected");
    }
}
