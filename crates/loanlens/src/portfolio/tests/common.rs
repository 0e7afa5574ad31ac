use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::portfolio::assessment::AssessmentConfig;
use crate::portfolio::domain::{
    BorrowerId, BorrowerRecord, CustomerTier, EmploymentType, Gender, LoanApplication,
    ResidenceType, RiskLevel,
};
use crate::portfolio::repository::{BorrowerFile, BorrowerRepository, RepositoryError};
use crate::portfolio::service::PortfolioService;

pub(super) fn assessment_config() -> AssessmentConfig {
    AssessmentConfig {
        base_score: 50,
        low_risk_floor: 70,
        medium_risk_floor: 50,
        default_cutoff: 0.5,
        comfortable_rate_ceiling: 12.0,
        active_loan_allowance: 4,
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn record(
    id: &str,
    name: &str,
    email: &str,
    loan_amount: u32,
    loan_term_months: u16,
    credit_score: u8,
    risk_level: RiskLevel,
    last_analyzed: NaiveDate,
) -> BorrowerRecord {
    BorrowerRecord {
        id: BorrowerId(id.to_string()),
        name: name.to_string(),
        email: email.to_string(),
        loan_amount,
        loan_term_months,
        credit_score,
        risk_level,
        last_analyzed,
    }
}

/// The five-row demo book the listing screen ships with.
pub(super) fn sample_book() -> Vec<BorrowerRecord> {
    vec![
        record(
            "b001",
            "Alex Johnson",
            "alex.j@example.com",
            25000,
            36,
            82,
            RiskLevel::Low,
            date(2025, 3, 25),
        ),
        record(
            "b002",
            "Maya Rodriguez",
            "maya.r@example.com",
            15000,
            24,
            68,
            RiskLevel::Medium,
            date(2025, 3, 28),
        ),
        record(
            "b003",
            "David Chen",
            "david.c@example.com",
            50000,
            60,
            39,
            RiskLevel::High,
            date(2025, 3, 20),
        ),
        record(
            "b004",
            "Sarah Williams",
            "sarah.w@example.com",
            10000,
            12,
            94,
            RiskLevel::Low,
            date(2025, 3, 24),
        ),
        record(
            "b005",
            "James Taylor",
            "james.t@example.com",
            30000,
            48,
            52,
            RiskLevel::Medium,
            date(2025, 3, 22),
        ),
    ]
}

/// Four records whose credit scores (80, 40, 40, 60) exercise tie-breaking.
pub(super) fn score_fixture() -> Vec<BorrowerRecord> {
    vec![
        record(
            "1",
            "First Borrower",
            "first@example.com",
            1000,
            12,
            80,
            RiskLevel::Low,
            date(2025, 1, 1),
        ),
        record(
            "2",
            "Second Borrower",
            "second@example.com",
            1000,
            12,
            40,
            RiskLevel::High,
            date(2025, 1, 2),
        ),
        record(
            "3",
            "Third Borrower",
            "third@example.com",
            1000,
            12,
            40,
            RiskLevel::High,
            date(2025, 1, 3),
        ),
        record(
            "4",
            "Fourth Borrower",
            "fourth@example.com",
            1000,
            12,
            60,
            RiskLevel::Medium,
            date(2025, 1, 4),
        ),
    ]
}

pub(super) fn ids(records: &[BorrowerRecord]) -> Vec<&str> {
    records.iter().map(|record| record.id.0.as_str()).collect()
}

pub(super) fn application() -> LoanApplication {
    LoanApplication {
        name: "Nina Patel".to_string(),
        email: "nina.p@example.com".to_string(),
        loan_amount: 100000,
        loan_term_months: 48,
        rate_of_interest: 9.8,
        emi: None,
        customer_age: 60,
        gender: Gender::Female,
        employment_type: EmploymentType::Retired,
        residence_type: ResidenceType::Own,
        num_loans: 6,
        secured_loans: 4,
        unsecured_loans: 2,
        new_loans_last_3_months: 0,
        tier: CustomerTier::Tier1,
    }
}

pub(super) fn build_service() -> (
    PortfolioService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PortfolioService::new(repository.clone(), assessment_config());
    (service, repository)
}

pub(super) fn seeded_service() -> (
    PortfolioService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    for record in sample_book() {
        repository
            .insert(BorrowerFile::from_record(record))
            .expect("seed record inserts");
    }
    let service = PortfolioService::new(repository.clone(), assessment_config());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    files: Arc<Mutex<BTreeMap<BorrowerId, BorrowerFile>>>,
}

impl BorrowerRepository for MemoryRepository {
    fn insert(&self, file: BorrowerFile) -> Result<BorrowerFile, RepositoryError> {
        let mut guard = self.files.lock().expect("repository mutex poisoned");
        if guard.contains_key(&file.record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(file.record.id.clone(), file.clone());
        Ok(file)
    }

    fn update(&self, file: BorrowerFile) -> Result<(), RepositoryError> {
        let mut guard = self.files.lock().expect("repository mutex poisoned");
        if guard.contains_key(&file.record.id) {
            guard.insert(file.record.id.clone(), file);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &BorrowerId) -> Result<Option<BorrowerFile>, RepositoryError> {
        let guard = self.files.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<BorrowerRecord>, RepositoryError> {
        let guard = self.files.lock().expect("repository mutex poisoned");
        Ok(guard.values().map(|file| file.record.clone()).collect())
    }
}

pub(super) struct ConflictRepository;

impl BorrowerRepository for ConflictRepository {
    fn insert(&self, _file: BorrowerFile) -> Result<BorrowerFile, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _file: BorrowerFile) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &BorrowerId) -> Result<Option<BorrowerFile>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<BorrowerRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl BorrowerRepository for UnavailableRepository {
    fn insert(&self, _file: BorrowerFile) -> Result<BorrowerFile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _file: BorrowerFile) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &BorrowerId) -> Result<Option<BorrowerFile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<BorrowerRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
