use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use super::assessment::{AssessmentConfig, AssessmentEngine, RiskAssessment};
use super::domain::{BorrowerId, BorrowerRecord, LoanApplication, LoanProfile};
use super::intake::{self, IntakeError};
use super::query::{self, QuerySpec};
use super::repository::{BorrowerFile, BorrowerRepository, RepositoryError};

/// Service composing intake validation, the assessment engine, the query
/// pipeline, and the repository.
pub struct PortfolioService<R> {
    repository: Arc<R>,
    engine: Arc<AssessmentEngine>,
}

static BORROWER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_borrower_id() -> BorrowerId {
    let id = BORROWER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BorrowerId(format!("b-{id:06}"))
}

impl<R> PortfolioService<R>
where
    R: BorrowerRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: AssessmentConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(AssessmentEngine::new(config)),
        }
    }

    /// Validate, assess, and store a new borrower from an intake application.
    pub fn submit(
        &self,
        application: LoanApplication,
        today: NaiveDate,
    ) -> Result<BorrowerFile, PortfolioServiceError> {
        intake::validate(&application)?;

        let borrower_id = next_borrower_id();
        let assessment = self.engine.assess(&borrower_id, &application, today);
        let emi = application.emi.unwrap_or_else(|| {
            intake::monthly_installment(
                application.loan_amount,
                application.rate_of_interest,
                application.loan_term_months,
            )
        });

        let record = BorrowerRecord {
            id: borrower_id,
            name: application.name.trim().to_string(),
            email: application.email.trim().to_string(),
            loan_amount: application.loan_amount,
            loan_term_months: application.loan_term_months,
            credit_score: assessment.credit_score,
            risk_level: assessment.risk_level,
            last_analyzed: today,
        };
        let profile = LoanProfile {
            emi,
            rate_of_interest: application.rate_of_interest,
            customer_age: application.customer_age,
            gender: application.gender,
            employment_type: application.employment_type,
            residence_type: application.residence_type,
            num_loans: application.num_loans,
            secured_loans: application.secured_loans,
            unsecured_loans: application.unsecured_loans,
            new_loans_last_3_months: application.new_loans_last_3_months,
            tier: application.tier,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(BorrowerFile {
            record,
            profile: Some(profile),
            assessment: Some(assessment),
        })?;
        Ok(stored)
    }

    /// Re-run the assessment for a stored borrower and persist the refreshed
    /// score, risk level, and analysis date.
    pub fn analyze(
        &self,
        borrower_id: &BorrowerId,
        today: NaiveDate,
    ) -> Result<RiskAssessment, PortfolioServiceError> {
        let mut file = self
            .repository
            .fetch(borrower_id)?
            .ok_or(RepositoryError::NotFound)?;

        let profile = file
            .profile
            .clone()
            .ok_or_else(|| PortfolioServiceError::MissingProfile(borrower_id.0.clone()))?;
        let application = application_from_parts(&file.record, &profile);
        let assessment = self.engine.assess(borrower_id, &application, today);

        file.record.credit_score = assessment.credit_score;
        file.record.risk_level = assessment.risk_level;
        file.record.last_analyzed = today;
        file.assessment = Some(assessment.clone());
        self.repository.update(file)?;

        Ok(assessment)
    }

    /// Fetch one borrower's full file for the detail view.
    pub fn get(&self, borrower_id: &BorrowerId) -> Result<BorrowerFile, PortfolioServiceError> {
        let file = self
            .repository
            .fetch(borrower_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(file)
    }

    /// Run one portfolio query against the current book.
    pub fn list(&self, spec: &QuerySpec) -> Result<PortfolioPage, PortfolioServiceError> {
        let book = self.repository.list()?;
        let total = book.len();
        let borrowers = query::query(&book, spec);
        let matched = borrowers.len();
        Ok(PortfolioPage {
            borrowers,
            matched,
            total,
        })
    }
}

fn application_from_parts(record: &BorrowerRecord, profile: &LoanProfile) -> LoanApplication {
    LoanApplication {
        name: record.name.clone(),
        email: record.email.clone(),
        loan_amount: record.loan_amount,
        loan_term_months: record.loan_term_months,
        rate_of_interest: profile.rate_of_interest,
        emi: Some(profile.emi),
        customer_age: profile.customer_age,
        gender: profile.gender,
        employment_type: profile.employment_type,
        residence_type: profile.residence_type,
        num_loans: profile.num_loans,
        secured_loans: profile.secured_loans,
        unsecured_loans: profile.unsecured_loans,
        new_loans_last_3_months: profile.new_loans_last_3_months,
        tier: profile.tier,
    }
}

/// One page of query results plus the showing-X-of-Y counts.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioPage {
    pub borrowers: Vec<BorrowerRecord>,
    pub matched: usize,
    pub total: usize,
}

/// Error raised by the portfolio service.
#[derive(Debug, thiserror::Error)]
pub enum PortfolioServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("borrower '{0}' has no intake profile to re-assess")]
    MissingProfile(String),
}
