use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use loanlens::accounts::{Account, AccountRepository, AccountRepositoryError};
use loanlens::portfolio::{
    intake::monthly_installment, AssessmentConfig, BorrowerFile, BorrowerId, BorrowerRecord,
    BorrowerRepository, CustomerTier, EmploymentType, Gender, LoanProfile, RepositoryError,
    ResidenceType, RiskLevel,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBorrowerRepository {
    files: Arc<Mutex<BTreeMap<BorrowerId, BorrowerFile>>>,
}

impl InMemoryBorrowerRepository {
    pub(crate) fn seeded(files: Vec<BorrowerFile>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.files.lock().expect("repository mutex poisoned");
            for file in files {
                guard.insert(file.record.id.clone(), file);
            }
        }
        repository
    }

    pub(crate) fn from_records(records: Vec<BorrowerRecord>) -> Self {
        Self::seeded(records.into_iter().map(BorrowerFile::from_record).collect())
    }
}

impl BorrowerRepository for InMemoryBorrowerRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryAccountRepository {
    accounts: Arc<Mutex<BTreeMap<String, Account>>>,
}

impl AccountRepository for InMemoryAccountRepository {
    fn insert(&self, account: Account) -> Result<Account, AccountRepositoryError> {
        let mut guard = self.accounts.lock().expect("account mutex poisoned");
        let key = account.email.to_lowercase();
        if guard.contains_key(&key) {
            return Err(AccountRepositoryError::DuplicateEmail);
        }
        guard.insert(key, account.clone());
        Ok(account)
    }

    fn fetch_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard.get(&email.trim().to_lowercase()).cloned())
    }
}

pub(crate) fn default_assessment_config() -> AssessmentConfig {
    AssessmentConfig {
        base_score: 50,
        low_risk_floor: 70,
        medium_risk_floor: 50,
        default_cutoff: 0.5,
        comfortable_rate_ceiling: 12.0,
        active_loan_allowance: 4,
    }
}

/// The five-row demo book the listing screen ships with.
pub(crate) fn sample_borrower_files() -> Vec<BorrowerFile> {
    vec![
        sample_file(
            "b001",
            "Alex Johnson",
            "alex.j@example.com",
            25000,
            36,
            82,
            RiskLevel::Low,
            date(2025, 3, 25),
            sample_profile(25000, 36, 8.4, 34, Gender::Male, EmploymentType::Salaried,
                ResidenceType::Rent, 2, 1, 1, 0, CustomerTier::Tier2),
        ),
        sample_file(
            "b002",
            "Maya Rodriguez",
            "maya.r@example.com",
            15000,
            24,
            68,
            RiskLevel::Medium,
            date(2025, 3, 28),
            sample_profile(15000, 24, 11.2, 29, Gender::Female, EmploymentType::SelfEmployed,
                ResidenceType::Rent, 3, 1, 2, 1, CustomerTier::Tier2),
        ),
        sample_file(
            "b003",
            "David Chen",
            "david.c@example.com",
            50000,
            60,
            39,
            RiskLevel::High,
            date(2025, 3, 20),
            sample_profile(50000, 60, 16.9, 45, Gender::Male, EmploymentType::SelfEmployed,
                ResidenceType::Rent, 6, 2, 4, 3, CustomerTier::Tier3),
        ),
        sample_file(
            "b004",
            "Sarah Williams",
            "sarah.w@example.com",
            10000,
            12,
            94,
            RiskLevel::Low,
            date(2025, 3, 24),
            sample_profile(10000, 12, 7.5, 52, Gender::Female, EmploymentType::Salaried,
                ResidenceType::Own, 1, 1, 0, 0, CustomerTier::Tier1),
        ),
        sample_file(
            "b005",
            "James Taylor",
            "james.t@example.com",
            30000,
            48,
            52,
            RiskLevel::Medium,
            date(2025, 3, 22),
            sample_profile(30000, 48, 13.6, 38, Gender::Male, EmploymentType::Retired,
                ResidenceType::Own, 4, 2, 2, 1, CustomerTier::Tier3),
        ),
    ]
}

fn sample_file(
    id: &str,
    name: &str,
    email: &str,
    loan_amount: u32,
    loan_term_months: u16,
    credit_score: u8,
    risk_level: RiskLevel,
    last_analyzed: NaiveDate,
    profile: LoanProfile,
) -> BorrowerFile {
    BorrowerFile {
        record: BorrowerRecord {
            id: BorrowerId(id.to_string()),
            name: name.to_string(),
            email: email.to_string(),
            loan_amount,
            loan_term_months,
            credit_score,
            risk_level,
            last_analyzed,
        },
        profile: Some(profile),
        assessment: None,
    }
}

fn sample_profile(
    loan_amount: u32,
    loan_term_months: u16,
    rate_of_interest: f32,
    customer_age: u8,
    gender: Gender,
    employment_type: EmploymentType,
    residence_type: ResidenceType,
    num_loans: u8,
    secured_loans: u8,
    unsecured_loans: u8,
    new_loans_last_3_months: u8,
    tier: CustomerTier,
) -> LoanProfile {
    LoanProfile {
        emi: monthly_installment(loan_amount, rate_of_interest, loan_term_months),
        rate_of_interest,
        customer_age,
        gender,
        employment_type,
        residence_type,
        num_loans,
        secured_loans,
        unsecured_loans,
        new_loans_last_3_months,
        tier,
        created_at: Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
