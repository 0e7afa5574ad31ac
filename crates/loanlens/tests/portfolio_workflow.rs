//! Integration specifications for the borrower intake, assessment, and query
//! workflow, driven through the public service facade and HTTP router.

mod common {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use loanlens::portfolio::{
        AssessmentConfig, BorrowerFile, BorrowerId, BorrowerRecord, BorrowerRepository,
        CustomerTier, EmploymentType, Gender, LoanApplication, PortfolioService, RepositoryError,
        ResidenceType, RiskLevel,
    };

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

    pub(super) fn application(name: &str, email: &str) -> LoanApplication {
        LoanApplication {
            name: name.to_string(),
            email: email.to_string(),
            loan_amount: 25000,
            loan_term_months: 36,
            rate_of_interest: 8.4,
            emi: None,
            customer_age: 41,
            gender: Gender::Male,
            employment_type: EmploymentType::Salaried,
            residence_type: ResidenceType::Rent,
            num_loans: 2,
            secured_loans: 1,
            unsecured_loans: 1,
            new_loans_last_3_months: 0,
            tier: CustomerTier::Tier2,
        }
    }

    pub(super) fn risky_application(name: &str, email: &str) -> LoanApplication {
        LoanApplication {
            rate_of_interest: 19.5,
            num_loans: 7,
            secured_loans: 2,
            unsecured_loans: 5,
            new_loans_last_3_months: 4,
            tier: CustomerTier::Tier3,
            ..application(name, email)
        }
    }

    pub(super) fn build_service() -> Arc<PortfolioService<MemoryRepository>> {
        Arc::new(PortfolioService::new(
            Arc::new(MemoryRepository::default()),
            assessment_config(),
        ))
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

    pub(super) fn is_risk(level: RiskLevel) -> impl Fn(&BorrowerRecord) -> bool {
        move |record| record.risk_level == level
    }
}

use chrono::NaiveDate;
use loanlens::portfolio::{
    portfolio_router, QuerySpec, RiskLevel, SortDirection, SortField, SortKey,
};
use serde_json::Value;
use tower::ServiceExt;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn intake_to_query_round_trip() {
    let service = common::build_service();
    let today = day(2025, 4, 2);

    let steady = service
        .submit(common::application("Omar Haddad", "omar.h@example.com"), today)
        .expect("steady applicant accepted");
    let risky = service
        .submit(
            common::risky_application("Lena Fischer", "lena.f@example.com"),
            today,
        )
        .expect("risky applicant accepted");

    assert_ne!(steady.record.id, risky.record.id);
    assert!(steady.record.credit_score > risky.record.credit_score);

    let page = service
        .list(&QuerySpec {
            risk: loanlens::portfolio::RiskFilter::Only(RiskLevel::High),
            ..QuerySpec::default()
        })
        .expect("filtered listing succeeds");
    assert_eq!(page.total, 2);
    assert!(page.borrowers.iter().all(common::is_risk(RiskLevel::High)));
    assert!(page
        .borrowers
        .iter()
        .any(|record| record.name == "Lena Fischer"));

    let sorted = service
        .list(&QuerySpec {
            sort: Some(SortKey {
                field: SortField::CreditScore,
                direction: SortDirection::Descending,
            }),
            ..QuerySpec::default()
        })
        .expect("sorted listing succeeds");
    assert_eq!(sorted.borrowers[0].name, "Omar Haddad");
}

#[test]
fn reanalysis_updates_the_listing_row() {
    let service = common::build_service();
    let submitted = service
        .submit(
            common::application("Omar Haddad", "omar.h@example.com"),
            day(2025, 4, 2),
        )
        .expect("submission succeeds");

    let later = day(2025, 6, 15);
    let outcome = service
        .analyze(&submitted.record.id, later)
        .expect("re-analysis succeeds");

    let file = service.get(&submitted.record.id).expect("detail lookup");
    assert_eq!(file.record.last_analyzed, later);
    assert_eq!(file.record.credit_score, outcome.credit_score);

    let view = file.detail_view();
    let serialized = serde_json::to_value(&view).expect("view serializes");
    assert_eq!(
        serialized.get("risk_label").and_then(Value::as_str),
        Some(outcome.risk_level.display_label())
    );
}

#[tokio::test]
async fn http_surface_covers_intake_query_and_detail() {
    let service = common::build_service();
    let submitted = service
        .submit(
            common::application("Omar Haddad", "omar.h@example.com"),
            day(2025, 4, 2),
        )
        .expect("submission succeeds");

    let router = portfolio_router(service);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/v1/borrowers?search=omar&sort=name&direction=asc")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("list route executes");
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload.get("matched"), Some(&Value::from(1)));

    let response = router
        .oneshot(
            axum::http::Request::get(format!("/api/v1/borrowers/{}", submitted.record.id.0))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("detail route executes");
    assert_eq!(response.status(), axum::http::StatusCode::OK);
}
