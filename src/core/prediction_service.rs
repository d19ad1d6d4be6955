// core/prediction_service.rs
use crate::infrastructure::classifier::LoanClassifier;
use crate::infrastructure::database::Database;
use crate::models::{
    AmountPoint, AnalyticsData, AnalyticsPoint, AnalyticsSummary, ChartData, DashboardData,
    LoanApplication, Outcome, Prediction, ScorePoint, TrendPoint,
};
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Nombre de prédictions récentes affichées sur le tableau de bord
const RECENT_COUNT: usize = 5;

/// Nombre de points des séries graphiques
const CHART_POINTS: usize = 10;

/// Inférence du classifieur et agrégats d'historique
#[derive(Clone)]
pub struct PredictionService {
    db: Database,
    classifier: Arc<LoanClassifier>,
}

impl PredictionService {
    pub fn new(db: Database, classifier: Arc<LoanClassifier>) -> Self {
        Self { db, classifier }
    }

    /// Exécute l'inférence et enregistre le résultat dans l'historique
    pub async fn predict(&self, user_id: Uuid, application: &LoanApplication) -> Result<Prediction> {
        let features = application.to_feature_vector();

        let proba = self.classifier.predict_proba(&features);
        let outcome = if proba >= 0.5 {
            Outcome::Approved
        } else {
            Outcome::Rejected
        };

        let record = Prediction {
            id: Uuid::new_v4(),
            user_id,
            no_of_dependents: application.no_of_dependents,
            education: application.education.clone(),
            self_employed: application.self_employed.clone(),
            income_annum: application.income_annum,
            loan_amount: application.loan_amount,
            loan_term: application.loan_term,
            cibil_score: application.cibil_score,
            residential_assets_value: application.residential_assets_value,
            commercial_assets_value: application.commercial_assets_value,
            luxury_assets_value: application.luxury_assets_value,
            bank_asset_value: application.bank_asset_value,
            outcome,
            probability: round2(proba * 100.0),
            created_at: Utc::now(),
        };

        let saved = self.db.insert_prediction(&record).await?;

        tracing::info!(
            "Prédiction {} pour l'utilisateur {}: {} ({}%)",
            saved.id,
            user_id,
            saved.outcome,
            saved.probability
        );

        Ok(saved)
    }

    /// Historique complet, du plus récent au plus ancien
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<Prediction>> {
        self.db.get_user_predictions(user_id).await
    }

    /// Tableau de bord : statistiques + séries graphiques
    pub async fn dashboard(&self, user_id: Uuid) -> Result<DashboardData> {
        let predictions = self.db.get_user_predictions(user_id).await?;
        Ok(build_dashboard(predictions))
    }

    /// Données de la page analytics
    pub async fn analytics(&self, user_id: Uuid) -> Result<AnalyticsData> {
        let predictions = self.db.get_user_predictions(user_id).await?;
        Ok(build_analytics(&predictions))
    }
}

/// Arrondi à 2 décimales (probabilités stockées en pourcentage)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Construit le tableau de bord depuis l'historique trié du plus récent
/// au plus ancien
pub fn build_dashboard(predictions: Vec<Prediction>) -> DashboardData {
    let total_predictions = predictions.len();
    let approved_count = predictions.iter().filter(|p| p.is_approved()).count();
    let approval_rate = if total_predictions > 0 {
        round2(approved_count as f64 / total_predictions as f64 * 100.0)
    } else {
        0.0
    };

    let mut chart_data = ChartData::default();

    // Les 10 dernières prédictions, remises en ordre chronologique
    for prediction in predictions.iter().take(CHART_POINTS).rev() {
        let date = prediction.created_at.format("%m/%d").to_string();

        chart_data.approval_trend.push(TrendPoint {
            date: date.clone(),
            approved: if prediction.is_approved() { 1 } else { 0 },
        });
        chart_data.loan_amounts.push(AmountPoint {
            date,
            amount: prediction.loan_amount,
        });
        chart_data.cibil_scores.push(ScorePoint {
            score: prediction.cibil_score,
            result: prediction.outcome,
        });
    }

    let recent_predictions = predictions.into_iter().take(RECENT_COUNT).collect();

    DashboardData {
        total_predictions,
        approved_count,
        approval_rate,
        recent_predictions,
        chart_data,
    }
}

/// Construit les données analytics depuis l'historique
pub fn build_analytics(predictions: &[Prediction]) -> AnalyticsData {
    if predictions.is_empty() {
        return AnalyticsData {
            has_data: false,
            data: None,
        };
    }

    let total = predictions.len();
    let approved = predictions.iter().filter(|p| p.is_approved()).count();
    let avg_cibil =
        predictions.iter().map(|p| p.cibil_score as f64).sum::<f64>() / total as f64;
    let avg_loan = predictions.iter().map(|p| p.loan_amount).sum::<f64>() / total as f64;

    let points = predictions
        .iter()
        .map(|p| AnalyticsPoint {
            date: p.created_at.format("%Y-%m-%d").to_string(),
            result: p.outcome,
            probability: p.probability,
            cibil_score: p.cibil_score,
            loan_amount: p.loan_amount,
            income: p.income_annum,
        })
        .collect();

    AnalyticsData {
        has_data: true,
        data: Some(AnalyticsSummary {
            total,
            approved,
            rejected: total - approved,
            avg_cibil,
            avg_loan,
            predictions: points,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    pub(crate) fn prediction_at(days_ago: i64, outcome: Outcome, cibil: i32) -> Prediction {
        Prediction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            no_of_dependents: 1,
            education: "Graduate".to_string(),
            self_employed: "No".to_string(),
            income_annum: 600_000.0,
            loan_amount: 1_000_000.0,
            loan_term: 10,
            cibil_score: cibil,
            residential_assets_value: 500_000.0,
            commercial_assets_value: 0.0,
            luxury_assets_value: 0.0,
            bank_asset_value: 100_000.0,
            outcome,
            probability: 75.0,
            created_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(99.995), 100.0);
    }

    #[test]
    fn test_empty_dashboard() {
        let dashboard = build_dashboard(vec![]);

        assert_eq!(dashboard.total_predictions, 0);
        assert_eq!(dashboard.approved_count, 0);
        assert_eq!(dashboard.approval_rate, 0.0);
        assert!(dashboard.recent_predictions.is_empty());
        assert!(dashboard.chart_data.approval_trend.is_empty());
    }

    #[test]
    fn test_dashboard_statistics() {
        // Historique trié du plus récent au plus ancien
        let predictions = vec![
            prediction_at(0, Outcome::Approved, 780),
            prediction_at(1, Outcome::Rejected, 580),
            prediction_at(2, Outcome::Approved, 760),
            prediction_at(3, Outcome::Approved, 720),
        ];

        let dashboard = build_dashboard(predictions);

        assert_eq!(dashboard.total_predictions, 4);
        assert_eq!(dashboard.approved_count, 3);
        assert_eq!(dashboard.approval_rate, 75.0);
        assert_eq!(dashboard.recent_predictions.len(), 4);
    }

    #[test]
    fn test_dashboard_chart_is_chronological_and_capped() {
        let predictions: Vec<Prediction> = (0..15)
            .map(|i| prediction_at(i, Outcome::Approved, 700 + i as i32))
            .collect();

        let dashboard = build_dashboard(predictions);

        // Limité aux 10 dernières, en ordre chronologique
        assert_eq!(dashboard.chart_data.approval_trend.len(), 10);
        assert_eq!(dashboard.chart_data.cibil_scores.len(), 10);

        // La plus ancienne des 10 (i=9) vient en premier
        assert_eq!(dashboard.chart_data.cibil_scores[0].score, 709);
        assert_eq!(dashboard.chart_data.cibil_scores[9].score, 700);

        // 5 prédictions récentes seulement
        assert_eq!(dashboard.recent_predictions.len(), 5);
    }

    #[test]
    fn test_analytics_empty() {
        let analytics = build_analytics(&[]);
        assert!(!analytics.has_data);
        assert!(analytics.data.is_none());
    }

    #[test]
    fn test_analytics_aggregates() {
        let predictions = vec![
            prediction_at(0, Outcome::Approved, 800),
            prediction_at(1, Outcome::Rejected, 600),
        ];

        let analytics = build_analytics(&predictions);
        assert!(analytics.has_data);

        let data = analytics.data.unwrap();
        assert_eq!(data.total, 2);
        assert_eq!(data.approved, 1);
        assert_eq!(data.rejected, 1);
        assert_eq!(data.avg_cibil, 700.0);
        assert_eq!(data.avg_loan, 1_000_000.0);
        assert_eq!(data.predictions.len(), 2);
    }
}
