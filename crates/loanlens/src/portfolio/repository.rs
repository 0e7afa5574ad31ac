use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::assessment::RiskAssessment;
use super::domain::{BorrowerId, BorrowerRecord, LoanProfile, RiskLevel};

/// Repository entry: the listing row plus, when the borrower arrived through
/// intake, the detail-side profile and the latest assessment. Rows imported
/// from a borrower book carry the record only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerFile {
    pub record: BorrowerRecord,
    pub profile: Option<LoanProfile>,
    pub assessment: Option<RiskAssessment>,
}

impl BorrowerFile {
    /// Wrap a listing-only row, as produced by a borrower book import.
    pub fn from_record(record: BorrowerRecord) -> Self {
        Self {
            record,
            profile: None,
            assessment: None,
        }
    }

    pub fn detail_view(&self) -> BorrowerDetailView {
        BorrowerDetailView {
            id: self.record.id.clone(),
            name: self.record.name.clone(),
            email: self.record.email.clone(),
            loan_amount: self.record.loan_amount,
            loan_term_months: self.record.loan_term_months,
            credit_score: self.record.credit_score,
            risk_level: self.record.risk_level,
            risk_label: self.record.risk_level.display_label(),
            last_analyzed: self.record.last_analyzed,
            profile: self.profile.clone(),
            assessment: self.assessment.clone(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait BorrowerRepository: Send + Sync {
    fn insert(&self, file: BorrowerFile) -> Result<BorrowerFile, RepositoryError>;
    fn update(&self, file: BorrowerFile) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &BorrowerId) -> Result<Option<BorrowerFile>, RepositoryError>;
    /// Listing rows, ordered by borrower id. Repeated calls against an
    /// unchanged book must return the same order: the query pipeline's
    /// identity guarantee depends on it.
    fn list(&self) -> Result<Vec<BorrowerRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("borrower already exists")]
    Conflict,
    #[error("borrower not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Serialized payload for the per-borrower detail view.
#[derive(Debug, Clone, Serialize)]
pub struct BorrowerDetailView {
    pub id: BorrowerId,
    pub name: String,
    pub email: String,
    pub loan_amount: u32,
    pub loan_term_months: u16,
    pub credit_score: u8,
    pub risk_level: RiskLevel,
    pub risk_label: &'static str,
    pub last_analyzed: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<LoanProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<RiskAssessment>,
}
