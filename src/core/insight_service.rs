// core/insight_service.rs
//
// Analyses dérivées de l'historique : recommandations, importance des
// variables, santé de crédit, préparation au prêt et plan d'amélioration.
// Les barèmes (bandes CIBIL, ratios prêt/revenu, couverture d'actifs)
// sont ceux du système d'origine.

use crate::infrastructure::database::Database;
use crate::models::{
    CreditHealth, CreditIssue, CreditScoreEntry, EligibilityFeedback, EligibilityReport,
    EligibilityRequest, FeatureWeight, ImprovementAction, LoanApplication, LoanReadiness,
    Outcome, Prediction, ReadinessFactor, Recommendation, ScoreSource, ScoreTrendPoint,
};
use crate::utils::error::Result;
use chrono::{Duration, Utc};
use uuid::Uuid;

/// Fenêtre par défaut de la courbe de tendance du score (jours)
pub const DEFAULT_TREND_DAYS: i64 = 180;

/// Conseils généraux affichés avec chaque prédiction
const GENERAL_TIPS: [&str; 5] = [
    "Pay all credit card bills in full each month",
    "Don't apply for multiple loans simultaneously",
    "Keep old credit accounts active (longer credit history helps)",
    "Check your credit report annually for errors",
    "Maintain a healthy debt-to-income ratio (below 40%)",
];

#[derive(Clone)]
pub struct InsightService {
    db: Database,
}

impl InsightService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Score de santé de crédit global (0 à 100)
    pub async fn credit_health(&self, user_id: Uuid) -> Result<CreditHealth> {
        let latest = self.db.get_latest_prediction(user_id).await?;
        Ok(CreditHealth {
            score: credit_health_score(latest.as_ref()),
        })
    }

    /// Problèmes identifiés sur le profil
    pub async fn issues(&self, user_id: Uuid) -> Result<Vec<CreditIssue>> {
        let latest = self.db.get_latest_prediction(user_id).await?;
        Ok(analyze_credit_issues(latest.as_ref()))
    }

    /// Niveau de préparation au prêt
    pub async fn readiness(&self, user_id: Uuid) -> Result<LoanReadiness> {
        let latest = self.db.get_latest_prediction(user_id).await?;
        Ok(loan_readiness(latest.as_ref()))
    }

    /// Plan d'amélioration personnalisé
    pub async fn improvement_plan(&self, user_id: Uuid) -> Result<Vec<ImprovementAction>> {
        let latest = self.db.get_latest_prediction(user_id).await?;
        Ok(improvement_plan(latest.as_ref()))
    }

    /// Courbe de tendance du score : historique manuel + prédictions
    pub async fn score_trend(&self, user_id: Uuid, days: i64) -> Result<Vec<ScoreTrendPoint>> {
        let cutoff = Utc::now() - Duration::days(days);

        let history = self.db.get_credit_scores_since(user_id, cutoff).await?;
        let predictions = self.db.get_user_predictions_since(user_id, cutoff).await?;

        Ok(score_trend(&history, &predictions))
    }

    /// Enregistrer une saisie manuelle de score CIBIL
    pub async fn record_score(&self, user_id: Uuid, cibil_score: i32) -> Result<CreditScoreEntry> {
        self.db
            .insert_credit_score(user_id, cibil_score, ScoreSource::Manual)
            .await
    }
}

/// Formate un montant en roupies avec séparateurs de milliers (₹1,234,567)
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

/// Recommandations et conseils pour un formulaire et son verdict
pub fn generate_recommendations(
    application: &LoanApplication,
    outcome: Outcome,
) -> (Vec<Recommendation>, Vec<String>) {
    let mut recommendations = Vec::new();

    let cibil = application.cibil_score;
    let loan_amount = application.loan_amount;
    let income = application.income_annum;
    let assets_total = application.total_assets();

    match outcome {
        Outcome::Rejected => {
            let mut credit_items = Vec::new();
            if cibil < 750 {
                credit_items.push(format!(
                    "Your CIBIL score is {}. Aim for 750+ for better approval chances.",
                    cibil
                ));
                credit_items.push(format!(
                    "Pay all bills on time for the next 6-12 months to improve your score by {} points.",
                    750 - cibil
                ));
            }
            recommendations.push(Recommendation {
                title: "Credit Score Improvement".to_string(),
                icon: "📈".to_string(),
                priority: "high".to_string(),
                items: credit_items,
            });

            if loan_amount > income * 3.0 {
                let suggested_amount = income * 2.5;
                recommendations.push(Recommendation {
                    title: "Loan Amount Adjustment".to_string(),
                    icon: "💰".to_string(),
                    priority: "high".to_string(),
                    items: vec![
                        format!(
                            "Your requested amount ({}) is high relative to your income.",
                            format_inr(loan_amount)
                        ),
                        format!(
                            "Consider reducing to {} for better approval odds.",
                            format_inr(suggested_amount)
                        ),
                        "This keeps your loan-to-income ratio within acceptable limits."
                            .to_string(),
                    ],
                });
            }

            if assets_total < loan_amount * 0.5 {
                recommendations.push(Recommendation {
                    title: "Build Your Assets".to_string(),
                    icon: "🏠".to_string(),
                    priority: "medium".to_string(),
                    items: vec![
                        format!(
                            "Total assets: {}. Banks prefer assets worth at least 50% of the loan.",
                            format_inr(assets_total)
                        ),
                        format!(
                            "Consider building savings or assets worth {} more.",
                            format_inr(loan_amount * 0.5 - assets_total)
                        ),
                        "Assets show financial stability and improve approval chances significantly."
                            .to_string(),
                    ],
                });
            }
        }
        Outcome::Approved => {
            let mut items = vec![
                "Your loan is likely to be approved! Here are some tips:".to_string(),
                "Maintain your CIBIL score by making timely payments.".to_string(),
                "Keep your credit utilization below 30% of available credit.".to_string(),
                "Consider setting up auto-pay to never miss a payment.".to_string(),
            ];

            if cibil >= 800 {
                items.push(
                    "Excellent CIBIL score! You may be eligible for lower interest rates."
                        .to_string(),
                );
            }

            recommendations.push(Recommendation {
                title: "Congratulations! Optimization Tips".to_string(),
                icon: "🎉".to_string(),
                priority: "info".to_string(),
                items,
            });
        }
    }

    let tips = GENERAL_TIPS.iter().map(|t| t.to_string()).collect();

    (recommendations, tips)
}

/// Importance heuristique des variables, normalisée à 100, triée décroissante
pub fn calculate_feature_importance(application: &LoanApplication) -> Vec<FeatureWeight> {
    let assets_total = application.total_assets();

    let raw = [
        (
            "CIBIL Score",
            (application.cibil_score as f64 / 900.0 * 100.0).min(100.0),
        ),
        (
            "Income Level",
            (application.income_annum / 2_000_000.0 * 100.0).min(100.0),
        ),
        (
            "Total Assets",
            (assets_total / 5_000_000.0 * 100.0).min(100.0),
        ),
        (
            "Loan Amount",
            100.0 - (application.loan_amount / 5_000_000.0 * 100.0).min(100.0),
        ),
        (
            "Employment",
            if application.self_employed == "No" { 80.0 } else { 60.0 },
        ),
        (
            "Education",
            if application.education == "Graduate" { 85.0 } else { 65.0 },
        ),
    ];

    let total: f64 = raw.iter().map(|(_, w)| w).sum();

    let mut weights: Vec<FeatureWeight> = raw
        .iter()
        .map(|(name, weight)| FeatureWeight {
            name: name.to_string(),
            weight: if total > 0.0 { weight / total * 100.0 } else { 0.0 },
        })
        .collect();

    weights.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    weights
}

/// Score de santé de crédit (0 à 100) depuis la dernière prédiction
pub fn credit_health_score(latest: Option<&Prediction>) -> u32 {
    let Some(prediction) = latest else {
        return 0;
    };

    let mut score = 0u32;

    // Score CIBIL (40 points)
    let cibil = prediction.cibil_score;
    score += if cibil >= 750 {
        40
    } else if cibil >= 700 {
        30
    } else if cibil >= 650 {
        20
    } else {
        10
    };

    // Ratio prêt / revenu mensuel (30 points)
    let loan_to_income = prediction.loan_amount / (prediction.income_annum / 12.0);
    score += if loan_to_income <= 3.0 {
        30
    } else if loan_to_income <= 5.0 {
        20
    } else if loan_to_income <= 10.0 {
        10
    } else {
        0
    };

    // Couverture par les actifs (20 points)
    let asset_ratio = if prediction.loan_amount > 0.0 {
        prediction.total_assets() / prediction.loan_amount
    } else {
        0.0
    };
    score += if asset_ratio >= 1.5 {
        20
    } else if asset_ratio >= 1.0 {
        15
    } else if asset_ratio >= 0.5 {
        10
    } else {
        0
    };

    // Stabilité de l'emploi (10 points)
    score += if prediction.self_employed == "No" { 10 } else { 5 };

    score.min(100)
}

/// Identifie les problèmes du profil de crédit
pub fn analyze_credit_issues(latest: Option<&Prediction>) -> Vec<CreditIssue> {
    let Some(prediction) = latest else {
        return vec![CreditIssue {
            icon: "📊".to_string(),
            issue: "No Credit History".to_string(),
            explanation: "Make your first loan prediction to see personalized insights."
                .to_string(),
            severity: "info".to_string(),
            impact: None,
        }];
    };

    let mut issues = Vec::new();
    let cibil = prediction.cibil_score;

    if cibil < 650 {
        issues.push(CreditIssue {
            icon: "🔴".to_string(),
            issue: "Poor Credit Score".to_string(),
            explanation: format!(
                "Your CIBIL score of {} is below the recommended 650. This significantly reduces loan approval chances.",
                cibil
            ),
            severity: "critical".to_string(),
            impact: Some("Very High".to_string()),
        });
    } else if cibil < 700 {
        issues.push(CreditIssue {
            icon: "🟡".to_string(),
            issue: "Below Average Credit Score".to_string(),
            explanation: format!(
                "Your CIBIL score of {} is below the ideal 750+. Improving this can unlock better interest rates.",
                cibil
            ),
            severity: "warning".to_string(),
            impact: Some("High".to_string()),
        });
    }

    let monthly_income = prediction.income_annum / 12.0;
    let loan_amount = prediction.loan_amount;
    if loan_amount > monthly_income * 10.0 {
        issues.push(CreditIssue {
            icon: "💰".to_string(),
            issue: "High Loan-to-Income Ratio".to_string(),
            explanation: format!(
                "Your loan amount ({}) is very high compared to your monthly income ({}).",
                format_inr(loan_amount),
                format_inr(monthly_income)
            ),
            severity: "warning".to_string(),
            impact: Some("High".to_string()),
        });
    }

    let total_assets = prediction.total_assets();
    if total_assets < loan_amount * 0.3 {
        issues.push(CreditIssue {
            icon: "🏠".to_string(),
            issue: "Low Asset Coverage".to_string(),
            explanation: format!(
                "Your assets ({}) are less than 30% of your loan amount. This increases risk perception.",
                format_inr(total_assets)
            ),
            severity: "warning".to_string(),
            impact: Some("Medium".to_string()),
        });
    }

    if prediction.no_of_dependents > 3 {
        issues.push(CreditIssue {
            icon: "👨‍👩‍👧‍👦".to_string(),
            issue: "Multiple Dependents".to_string(),
            explanation: format!(
                "With {} dependents, your disposable income may be limited.",
                prediction.no_of_dependents
            ),
            severity: "info".to_string(),
            impact: Some("Low".to_string()),
        });
    }

    if issues.is_empty() {
        issues.push(CreditIssue {
            icon: "✅".to_string(),
            issue: "Healthy Credit Profile".to_string(),
            explanation: "Your credit profile looks strong! Keep maintaining good financial habits."
                .to_string(),
            severity: "success".to_string(),
            impact: Some("None".to_string()),
        });
    }

    issues
}

/// Pourcentage de préparation au prêt avec la checklist des facteurs
pub fn loan_readiness(latest: Option<&Prediction>) -> LoanReadiness {
    let Some(prediction) = latest else {
        return LoanReadiness {
            score: 0,
            level: "Not Ready".to_string(),
            color: "#e74c3c".to_string(),
            factors: vec![ReadinessFactor {
                name: "No data available".to_string(),
                status: false,
            }],
        };
    };

    let mut readiness = 0u32;
    let mut factors = Vec::new();

    // Score CIBIL
    if prediction.cibil_score >= 750 {
        readiness += 30;
        factors.push(ReadinessFactor {
            name: "Excellent CIBIL Score (750+)".to_string(),
            status: true,
        });
    } else if prediction.cibil_score >= 700 {
        readiness += 20;
        factors.push(ReadinessFactor {
            name: "Good CIBIL Score (700+)".to_string(),
            status: true,
        });
    } else {
        factors.push(ReadinessFactor {
            name: format!("CIBIL Score {} (Need 700+)", prediction.cibil_score),
            status: false,
        });
    }

    // Revenu mensuel
    let monthly_income = prediction.income_annum / 12.0;
    if monthly_income >= 50_000.0 {
        readiness += 25;
        factors.push(ReadinessFactor {
            name: format!("Stable Income {}/month", format_inr(monthly_income)),
            status: true,
        });
    } else {
        factors.push(ReadinessFactor {
            name: format!(
                "Income {} (Recommended: {}+)",
                format_inr(monthly_income),
                format_inr(50_000.0)
            ),
            status: false,
        });
    }

    // Ratio prêt / revenu
    let loan_to_income = prediction.loan_amount / (prediction.income_annum / 12.0);
    if loan_to_income <= 5.0 {
        readiness += 25;
        factors.push(ReadinessFactor {
            name: "Manageable Loan Amount".to_string(),
            status: true,
        });
    } else {
        factors.push(ReadinessFactor {
            name: "Loan Amount Too High vs Income".to_string(),
            status: false,
        });
    }

    // Couverture par les actifs
    if prediction.total_assets() >= prediction.loan_amount * 0.5 {
        readiness += 20;
        factors.push(ReadinessFactor {
            name: "Sufficient Asset Coverage".to_string(),
            status: true,
        });
    } else {
        factors.push(ReadinessFactor {
            name: "Need More Asset Documentation".to_string(),
            status: false,
        });
    }

    let (level, color) = if readiness >= 80 {
        ("Excellent", "#2ecc71")
    } else if readiness >= 60 {
        ("Good", "#3498db")
    } else if readiness >= 40 {
        ("Fair", "#f39c12")
    } else {
        ("Needs Improvement", "#e74c3c")
    };

    LoanReadiness {
        score: readiness,
        level: level.to_string(),
        color: color.to_string(),
        factors,
    }
}

/// Plan d'amélioration priorisé
pub fn improvement_plan(latest: Option<&Prediction>) -> Vec<ImprovementAction> {
    let Some(prediction) = latest else {
        return vec![ImprovementAction {
            priority: "high".to_string(),
            action: "Complete Your First Loan Prediction".to_string(),
            description: "Use our prediction tool to assess your loan eligibility.".to_string(),
            timeline: "1 day".to_string(),
            impact: "Get personalized insights".to_string(),
        }];
    };

    let mut plan = Vec::new();
    let cibil = prediction.cibil_score;

    if cibil < 700 {
        plan.push(ImprovementAction {
            priority: "critical".to_string(),
            action: "Improve Your CIBIL Score".to_string(),
            description:
                "Pay all dues on time, reduce credit utilization below 30%, avoid multiple loan applications."
                    .to_string(),
            timeline: "3-6 months".to_string(),
            impact: format!("+{} points potential", 750 - cibil),
        });
    }

    // EMI approximative à 9% annuel
    let monthly_income = prediction.income_annum / 12.0;
    let emi_estimate = (prediction.loan_amount * 0.09) / 12.0;
    if emi_estimate / monthly_income > 0.4 {
        plan.push(ImprovementAction {
            priority: "high".to_string(),
            action: "Reduce Loan Amount or Increase Income".to_string(),
            description:
                "EMI should not exceed 40% of monthly income. Consider reducing loan amount or exploring income sources."
                    .to_string(),
            timeline: "1-3 months".to_string(),
            impact: "Improve approval chances by 40%".to_string(),
        });
    }

    if prediction.total_assets() < prediction.loan_amount * 0.5 {
        plan.push(ImprovementAction {
            priority: "medium".to_string(),
            action: "Build Your Asset Base".to_string(),
            description:
                "Increase savings, document existing assets properly, consider fixed deposits."
                    .to_string(),
            timeline: "6-12 months".to_string(),
            impact: "Strengthen application security".to_string(),
        });
    }

    plan.push(ImprovementAction {
        priority: "low".to_string(),
        action: "Gather Required Documents".to_string(),
        description:
            "Keep PAN, Aadhaar, salary slips, bank statements, property papers ready.".to_string(),
        timeline: "1 week".to_string(),
        impact: "Faster processing".to_string(),
    });

    plan
}

/// Fusionne l'historique manuel et les prédictions en une courbe datée
pub fn score_trend(
    history: &[CreditScoreEntry],
    predictions: &[Prediction],
) -> Vec<ScoreTrendPoint> {
    let mut trend: Vec<ScoreTrendPoint> = history
        .iter()
        .map(|entry| ScoreTrendPoint {
            date: entry.recorded_at.format("%Y-%m-%d").to_string(),
            score: entry.cibil_score,
            source: entry.source.as_str().to_string(),
        })
        .collect();

    trend.extend(predictions.iter().map(|prediction| ScoreTrendPoint {
        date: prediction.created_at.format("%Y-%m-%d").to_string(),
        score: prediction.cibil_score,
        source: ScoreSource::Prediction.as_str().to_string(),
    }));

    trend.sort_by(|a, b| a.date.cmp(&b.date));
    trend
}

/// Pré-qualification rapide (sans passer par le classifieur)
pub fn check_eligibility(request: &EligibilityRequest) -> EligibilityReport {
    let mut eligible = true;
    let mut score = 0u32;
    let mut feedback = Vec::new();

    if request.cibil >= 750 {
        score += 40;
        feedback.push(EligibilityFeedback {
            text: "Excellent CIBIL score!".to_string(),
            kind: "success".to_string(),
        });
    } else if request.cibil >= 650 {
        score += 25;
        feedback.push(EligibilityFeedback {
            text: "Good CIBIL score".to_string(),
            kind: "info".to_string(),
        });
    } else {
        eligible = false;
        feedback.push(EligibilityFeedback {
            text: "CIBIL score too low (need 650+)".to_string(),
            kind: "warning".to_string(),
        });
    }

    if request.loan_amount <= request.income * 3.0 {
        score += 30;
        feedback.push(EligibilityFeedback {
            text: "Loan amount is reasonable".to_string(),
            kind: "success".to_string(),
        });
    } else {
        score += 10;
        feedback.push(EligibilityFeedback {
            text: "High loan-to-income ratio".to_string(),
            kind: "warning".to_string(),
        });
    }

    if request.income >= 300_000.0 {
        score += 30;
        feedback.push(EligibilityFeedback {
            text: "Good income level".to_string(),
            kind: "success".to_string(),
        });
    } else {
        score += 15;
        feedback.push(EligibilityFeedback {
            text: "Modest income level".to_string(),
            kind: "info".to_string(),
        });
    }

    let recommendation = if score >= 70 {
        "Proceed with full application"
    } else {
        "Consider improving factors"
    };

    EligibilityReport {
        eligible,
        score,
        feedback,
        recommendation: recommendation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn application(cibil: i32, income: f64, loan: f64) -> LoanApplication {
        LoanApplication {
            no_of_dependents: 2,
            education: "Graduate".to_string(),
            self_employed: "No".to_string(),
            income_annum: income,
            loan_amount: loan,
            loan_term: 10,
            cibil_score: cibil,
            residential_assets_value: 500_000.0,
            commercial_assets_value: 0.0,
            luxury_assets_value: 0.0,
            bank_asset_value: 100_000.0,
        }
    }

    fn prediction(cibil: i32, income: f64, loan: f64, self_employed: &str) -> Prediction {
        Prediction {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            no_of_dependents: 1,
            education: "Graduate".to_string(),
            self_employed: self_employed.to_string(),
            income_annum: income,
            loan_amount: loan,
            loan_term: 10,
            cibil_score: cibil,
            residential_assets_value: 2_000_000.0,
            commercial_assets_value: 500_000.0,
            luxury_assets_value: 0.0,
            bank_asset_value: 500_000.0,
            outcome: Outcome::Approved,
            probability: 80.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(1_000.0), "₹1,000");
        assert_eq!(format_inr(2_500_000.0), "₹2,500,000");
        assert_eq!(format_inr(1_234_567.4), "₹1,234,567");
    }

    #[test]
    fn test_rejected_recommendations() {
        // Score faible, montant > 3x revenu, actifs < 50% du montant
        let app = application(580, 400_000.0, 3_000_000.0);
        let (recs, tips) = generate_recommendations(&app, Outcome::Rejected);

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].title, "Credit Score Improvement");
        assert!(recs[0].items[0].contains("580"));
        assert!(recs[0].items[1].contains("170 points"));
        assert_eq!(recs[1].title, "Loan Amount Adjustment");
        assert_eq!(recs[2].title, "Build Your Assets");
        assert_eq!(tips.len(), 5);
    }

    #[test]
    fn test_rejected_with_good_profile_keeps_empty_credit_block() {
        // Rejet malgré un bon score : le bloc crédit existe mais reste vide
        let app = application(780, 2_000_000.0, 1_000_000.0);
        let (recs, _) = generate_recommendations(&app, Outcome::Rejected);

        assert_eq!(recs[0].title, "Credit Score Improvement");
        assert!(recs[0].items.is_empty());
    }

    #[test]
    fn test_approved_recommendations() {
        let app = application(820, 1_000_000.0, 1_500_000.0);
        let (recs, _) = generate_recommendations(&app, Outcome::Approved);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Congratulations! Optimization Tips");
        // 4 conseils fixes + mention taux réduits (CIBIL >= 800)
        assert_eq!(recs[0].items.len(), 5);
    }

    #[test]
    fn test_feature_importance_normalized_and_sorted() {
        let app = application(720, 900_000.0, 2_000_000.0);
        let weights = calculate_feature_importance(&app);

        assert_eq!(weights.len(), 6);

        let total: f64 = weights.iter().map(|w| w.weight).sum();
        assert!((total - 100.0).abs() < 1e-9);

        for pair in weights.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
    }

    #[test]
    fn test_credit_health_bands() {
        assert_eq!(credit_health_score(None), 0);

        // Profil idéal : 40 + 30 + 20 + 10 = 100
        let strong = prediction(800, 12_000_000.0, 2_000_000.0, "No");
        assert_eq!(credit_health_score(Some(&strong)), 100);

        // Profil faible : CIBIL < 650 (10), ratio élevé (0),
        // actifs couvrants (20), indépendant (5)
        let weak = prediction(600, 120_000.0, 2_000_000.0, "Yes");
        assert_eq!(credit_health_score(Some(&weak)), 35);
    }

    #[test]
    fn test_issues_for_weak_profile() {
        let weak = prediction(600, 120_000.0, 12_000_000.0, "Yes");
        let issues = analyze_credit_issues(Some(&weak));

        let titles: Vec<&str> = issues.iter().map(|i| i.issue.as_str()).collect();
        assert!(titles.contains(&"Poor Credit Score"));
        assert!(titles.contains(&"High Loan-to-Income Ratio"));
        assert!(titles.contains(&"Low Asset Coverage"));
    }

    #[test]
    fn test_issues_healthy_profile() {
        let strong = prediction(800, 12_000_000.0, 2_000_000.0, "No");
        let issues = analyze_credit_issues(Some(&strong));

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue, "Healthy Credit Profile");
        assert_eq!(issues[0].severity, "success");
    }

    #[test]
    fn test_issues_without_history() {
        let issues = analyze_credit_issues(None);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue, "No Credit History");
    }

    #[test]
    fn test_readiness_levels() {
        let none = loan_readiness(None);
        assert_eq!(none.score, 0);
        assert_eq!(none.level, "Not Ready");

        // 30 + 25 + 25 + 20 = 100 -> Excellent
        let strong = prediction(800, 12_000_000.0, 2_000_000.0, "No");
        let readiness = loan_readiness(Some(&strong));
        assert_eq!(readiness.score, 100);
        assert_eq!(readiness.level, "Excellent");
        assert_eq!(readiness.color, "#2ecc71");
        assert!(readiness.factors.iter().all(|f| f.status));
    }

    #[test]
    fn test_improvement_plan_contents() {
        let plan = improvement_plan(None);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].action, "Complete Your First Loan Prediction");

        // CIBIL faible + EMI lourde + actifs insuffisants -> plan complet
        let weak = Prediction {
            residential_assets_value: 0.0,
            commercial_assets_value: 0.0,
            luxury_assets_value: 0.0,
            bank_asset_value: 0.0,
            ..prediction(620, 240_000.0, 5_000_000.0, "Yes")
        };
        let plan = improvement_plan(Some(&weak));

        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0].priority, "critical");
        assert_eq!(plan[0].impact, "+130 points potential");
        assert_eq!(plan.last().unwrap().action, "Gather Required Documents");
    }

    #[test]
    fn test_score_trend_merges_and_sorts() {
        let now = Utc::now();

        let history = vec![CreditScoreEntry {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            cibil_score: 680,
            recorded_at: now - Duration::days(30),
            source: ScoreSource::Manual,
        }];

        let mut old_prediction = prediction(700, 600_000.0, 1_000_000.0, "No");
        old_prediction.created_at = now - Duration::days(60);

        let trend = score_trend(&history, &[old_prediction]);

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].score, 700); // la plus ancienne d'abord
        assert_eq!(trend[0].source, "prediction");
        assert_eq!(trend[1].score, 680);
        assert_eq!(trend[1].source, "manual");
    }

    #[test]
    fn test_eligibility_strong_profile() {
        let report = check_eligibility(&EligibilityRequest {
            income: 800_000.0,
            cibil: 780,
            loan_amount: 1_500_000.0,
        });

        assert!(report.eligible);
        assert_eq!(report.score, 100);
        assert_eq!(report.recommendation, "Proceed with full application");
    }

    #[test]
    fn test_eligibility_low_cibil_blocks() {
        let report = check_eligibility(&EligibilityRequest {
            income: 800_000.0,
            cibil: 600,
            loan_amount: 1_500_000.0,
        });

        assert!(!report.eligible);
        // 0 + 30 + 30
        assert_eq!(report.score, 60);
        assert_eq!(report.recommendation, "Consider improving factors");
        assert!(report
            .feedback
            .iter()
            .any(|f| f.kind == "warning" && f.text.contains("650+")));
    }
}
