mod config;
mod rules;

pub use config::AssessmentConfig;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{BorrowerId, LoanApplication, RiskLevel};

/// Stateless engine applying the rubric configuration to an application.
pub struct AssessmentEngine {
    config: AssessmentConfig,
}

impl AssessmentEngine {
    pub fn new(config: AssessmentConfig) -> Self {
        Self { config }
    }

    pub fn assess(
        &self,
        borrower_id: &BorrowerId,
        application: &LoanApplication,
        analyzed_on: NaiveDate,
    ) -> RiskAssessment {
        let (factors, total) = rules::score_application(application, &self.config);
        let credit_score = total.clamp(0, 100) as u8;
        let risk_level = self.band(credit_score);
        let default_probability = f32::from(100 - credit_score) / 100.0;
        let default_prediction = default_probability >= self.config.default_cutoff;

        RiskAssessment {
            borrower_id: borrower_id.clone(),
            credit_score,
            risk_level,
            default_probability,
            default_prediction,
            factors,
            analyzed_on,
        }
    }

    fn band(&self, credit_score: u8) -> RiskLevel {
        if credit_score >= self.config.low_risk_floor {
            RiskLevel::Low
        } else if credit_score >= self.config.medium_risk_floor {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// Discrete contribution to an assessment, keeping the rubric auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub kind: FactorKind,
    pub score: i16,
    pub notes: String,
}

/// Factors permitted in the scoring rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    RateExposure,
    SecuredShare,
    RecentBorrowing,
    ActiveLoanLoad,
    TierStanding,
}

/// Engine output: the composite score, its banding, and the derived default
/// signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub borrower_id: BorrowerId,
    pub credit_score: u8,
    pub risk_level: RiskLevel,
    /// `(100 - score) / 100`, so banding and probability always agree.
    pub default_probability: f32,
    pub default_prediction: bool,
    pub factors: Vec<ScoreFactor>,
    pub analyzed_on: NaiveDate,
}
