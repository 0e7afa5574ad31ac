//! Borrower portfolio: intake, risk assessment, storage, and the query
//! pipeline behind the listing and detail screens.

pub mod assessment;
pub mod domain;
pub mod import;
pub mod intake;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use assessment::{
    AssessmentConfig, AssessmentEngine, FactorKind, RiskAssessment, ScoreFactor,
};
pub use domain::{
    BorrowerId, BorrowerRecord, CustomerTier, EmploymentType, Gender, InvalidRecord,
    LoanApplication, LoanProfile, ResidenceType, RiskLevel,
};
pub use import::{BorrowerBookImporter, BorrowerImportError};
pub use intake::IntakeError;
pub use query::{query, QueryError, QuerySpec, RiskFilter, SortDirection, SortField, SortKey};
pub use repository::{BorrowerDetailView, BorrowerFile, BorrowerRepository, RepositoryError};
pub use router::portfolio_router;
pub use service::{PortfolioPage, PortfolioService, PortfolioServiceError};
