// Modèle: user.rs
pub mod user;
pub use user::{
    AuthToken, ChangePassword, NewUser, OtpVerification, PendingRegistration, User, UserLogin,
    UserProfile,
};

// Modèle: otp.rs
pub mod otp;
pub use otp::{OtpChallenge, OtpPurpose};

// Modèle: prediction.rs
pub mod prediction;
pub use prediction::{
    AmountPoint, AnalyticsData, AnalyticsPoint, AnalyticsSummary, ChartData, DashboardData,
    LoanApplication, Outcome, Prediction, PredictionReport, ScorePoint, TrendPoint, FEATURE_COUNT,
};

// Modèle: insight.rs
pub mod insight;
pub use insight::{
    CreditHealth, CreditIssue, CreditScoreEntry, EligibilityFeedback, EligibilityReport,
    EligibilityRequest, FeatureWeight, ImprovementAction, LoanReadiness, NewScoreEntry,
    ReadinessFactor, Recommendation, ScoreSource, ScoreTrendPoint,
};

