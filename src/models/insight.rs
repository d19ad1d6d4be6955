use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Bloc de recommandations associé à un verdict
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub icon: String,
    pub priority: String,
    pub items: Vec<String>,
}

/// Poids normalisé d'une variable dans la décision
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureWeight {
    pub name: String,
    pub weight: f64,
}

/// Requête de pré-qualification rapide
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EligibilityRequest {
    #[validate(range(min = 0.0))]
    pub income: f64,

    #[validate(range(min = 300, max = 900, message = "cibil hors limites"))]
    pub cibil: i32,

    #[validate(range(min = 0.0))]
    pub loan_amount: f64,
}

/// Retour d'une vérification d'éligibilité
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityFeedback {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub score: u32,
    pub feedback: Vec<EligibilityFeedback>,
    pub recommendation: String,
}

/// Score de santé de crédit global (0 à 100)
#[derive(Debug, Clone, Serialize)]
pub struct CreditHealth {
    pub score: u32,
}

/// Problème identifié sur le profil de crédit
#[derive(Debug, Clone, Serialize)]
pub struct CreditIssue {
    pub icon: String,
    pub issue: String,
    pub explanation: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

/// Élément de la checklist de préparation au prêt
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessFactor {
    pub name: String,
    pub status: bool,
}

/// Niveau de préparation au prêt
#[derive(Debug, Clone, Serialize)]
pub struct LoanReadiness {
    pub score: u32,
    pub level: String,
    pub color: String,
    pub factors: Vec<ReadinessFactor>,
}

/// Action du plan d'amélioration personnalisé
#[derive(Debug, Clone, Serialize)]
pub struct ImprovementAction {
    pub priority: String,
    pub action: String,
    pub description: String,
    pub timeline: String,
    pub impact: String,
}

/// Origine d'une entrée d'historique de score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "credit_score_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Manual,
    Prediction,
}

impl ScoreSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreSource::Manual => "manual",
            ScoreSource::Prediction => "prediction",
        }
    }
}

/// Entrée persistée de l'historique de score CIBIL
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CreditScoreEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cibil_score: i32,
    pub recorded_at: DateTime<Utc>,
    pub source: ScoreSource,
}

/// Saisie manuelle d'un score CIBIL
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewScoreEntry {
    #[validate(range(min = 300, max = 900, message = "cibil_score hors limites"))]
    pub cibil_score: i32,
}

/// Point de la courbe de tendance du score (historique + prédictions)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreTrendPoint {
    pub date: String,
    pub score: i32,
    pub source: String,
}
