use super::domain::LoanApplication;

/// Validation errors raised before an application reaches the assessment
/// engine. Intake fails fast: the first violation found is returned and no
/// record is created.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error("borrower name must not be empty")]
    EmptyName,
    #[error("'{0}' is not a usable contact email")]
    InvalidEmail(String),
    #[error("loan amount must be positive")]
    NonPositiveLoanAmount,
    #[error("loan term must be at least one month")]
    NonPositiveLoanTerm,
    #[error("interest rate must be a positive percentage, got {0}")]
    InvalidInterestRate(f32),
    #[error("applicants must be at least {minimum} years old, got {age}")]
    UnderageApplicant { age: u8, minimum: u8 },
    #[error("loan mix mismatch: {secured} secured + {unsecured} unsecured does not add up to {declared} declared")]
    LoanMixMismatch {
        declared: u8,
        secured: u8,
        unsecured: u8,
    },
    #[error("{recent} loans opened in the last three months exceeds the {declared} declared in total")]
    RecentLoansExceedDeclared { declared: u8, recent: u8 },
}

const MINIMUM_APPLICANT_AGE: u8 = 18;

pub fn validate(application: &LoanApplication) -> Result<(), IntakeError> {
    if application.name.trim().is_empty() {
        return Err(IntakeError::EmptyName);
    }
    if !is_plausible_email(application.email.trim()) {
        return Err(IntakeError::InvalidEmail(application.email.clone()));
    }
    if application.loan_amount == 0 {
        return Err(IntakeError::NonPositiveLoanAmount);
    }
    if application.loan_term_months == 0 {
        return Err(IntakeError::NonPositiveLoanTerm);
    }
    if !application.rate_of_interest.is_finite() || application.rate_of_interest <= 0.0 {
        return Err(IntakeError::InvalidInterestRate(application.rate_of_interest));
    }
    if application.customer_age < MINIMUM_APPLICANT_AGE {
        return Err(IntakeError::UnderageApplicant {
            age: application.customer_age,
            minimum: MINIMUM_APPLICANT_AGE,
        });
    }
    let itemized = u16::from(application.secured_loans) + u16::from(application.unsecured_loans);
    if itemized != u16::from(application.num_loans) {
        return Err(IntakeError::LoanMixMismatch {
            declared: application.num_loans,
            secured: application.secured_loans,
            unsecured: application.unsecured_loans,
        });
    }
    if application.new_loans_last_3_months > application.num_loans {
        return Err(IntakeError::RecentLoansExceedDeclared {
            declared: application.num_loans,
            recent: application.new_loans_last_3_months,
        });
    }
    Ok(())
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Equated monthly installment: flat-rate total repayment spread evenly over
/// the term. Callers must have validated a positive term.
pub fn monthly_installment(loan_amount: u32, rate_of_interest: f32, term_months: u16) -> f64 {
    let principal = f64::from(loan_amount);
    let total = principal + principal * f64::from(rate_of_interest) / 100.0;
    total / f64::from(term_months)
}
