use serde::{Deserialize, Serialize};

/// Dials for the scoring rubric and risk banding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Every application starts from this score before factor contributions.
    pub base_score: i16,
    /// Scores at or above this band as low risk.
    pub low_risk_floor: u8,
    /// Scores at or above this (but below the low floor) band as medium risk.
    pub medium_risk_floor: u8,
    /// Default is predicted once the derived probability reaches this value.
    pub default_cutoff: f32,
    /// Annual rates above this percentage count against the applicant.
    pub comfortable_rate_ceiling: f32,
    /// Active loans beyond this count count against the applicant.
    pub active_loan_allowance: u8,
}
